//! Undistortion module
//!
//! Calibration-driven remap of depth and intensity rasters into an
//! idealized coordinate frame.

mod undistortion;

pub use undistortion::Undistortion;
