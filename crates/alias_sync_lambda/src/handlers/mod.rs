pub mod job;
pub mod synchronize;
