//! Pipeline-facing domain primitives for alias promotion.
//!
//! This crate owns the job contract, job validation, and decoding of the
//! version list carried by the input artifact. It intentionally excludes AWS
//! SDK and Lambda runtime concerns.

pub mod artifact;
pub mod contract;
pub mod job;
