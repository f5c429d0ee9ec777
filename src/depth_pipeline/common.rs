//! Common utilities module
//!
//! Shared error types used across the depth pipeline.

pub mod error;

pub use error::{PipelineError, Result};
