//! Acquisition boundary module
//!
//! The frame-source trait behind which device discovery, configuration, and
//! buffer queue management live, plus a synthetic in-process source.

mod source;
mod synthetic;

pub use source::{CONFIDENCE_THRESHOLD_MAX, DeviceSettings, FrameSource, SensorProfile};
pub use synthetic::SyntheticFrameSource;
