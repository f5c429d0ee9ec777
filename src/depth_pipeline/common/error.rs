use thiserror::Error;

use crate::depth_pipeline::buffer::types::BufferPartKind;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No matching depth sensor found: {0}")]
    DeviceNotFound(String),

    #[error("Missing buffer part: {0}")]
    MissingPart(BufferPartKind),

    #[error("Calibration data rejected: {0}")]
    Calibration(String),

    #[error("Depth/intensity geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("Raster geometry {width}x{height} does not match sample count {samples}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        samples: usize,
    },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Timed out waiting for a finished buffer")]
    Timeout,

    #[error("Failed to encode output artifact: {0}")]
    Encode(String),

    #[error("Failed to write output file: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the per-frame loop may skip the current frame and keep
    /// acquiring, instead of aborting the session.
    pub fn is_frame_recoverable(&self) -> bool {
        matches!(self, PipelineError::MissingPart(_))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
