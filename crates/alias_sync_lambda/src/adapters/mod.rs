pub mod alias_api;
pub mod artifact_source;
pub mod job_reporter;
