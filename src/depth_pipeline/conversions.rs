//! Pipeline orchestration module
//!
//! Session configuration, per-frame stage composition, and the acquisition
//! session loop.

mod config;
mod frame_pipeline;
mod session;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use frame_pipeline::{FramePipeline, FrameProducts};
pub use session::{SessionSummary, run_session};
