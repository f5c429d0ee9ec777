//! Factory calibration module
//!
//! Parses the device's calibration blob into immutable intrinsic and
//! distortion parameters, and rescales intrinsics for binned/ROI'd captures.

mod parser;
pub mod types;

pub use types::{CalibrationParameters, CameraIntrinsics, DistortionCoefficients};
