//! AWS-oriented adapters and handlers for promoting Lambda aliases from a
//! pipeline job.
//!
//! This crate owns runtime integration details (the pipeline job flow, the
//! alias synchronizer and the adapter seams the AWS binary plugs into) and
//! re-exports the job contract primitives from `alias_sync_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;

pub use alias_sync_core as runtime;

#[cfg(test)]
mod test_support;
