use std::time::Duration;

use crate::depth_pipeline::buffer::types::MultipartBuffer;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::raster::types::{AcquisitionMetadata, Interval};

/// Maximum accepted confidence threshold (12-bit confidence channel).
pub const CONFIDENCE_THRESHOLD_MAX: u16 = 4095;

/// Device-side capture settings applied before acquisition starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceSettings {
    /// Exposure time in microseconds.
    pub exposure_time_us: f32,
    /// Pixels whose confidence falls below this value are reported with the
    /// sensor's invalid depth code. `None` leaves the device filter off.
    pub confidence_threshold: Option<u16>,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            exposure_time_us: 1000.0,
            confidence_threshold: Some(100),
        }
    }
}

/// Depth-channel constants reported by the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorProfile {
    /// Scale factor converting raw depth codes to metric units.
    pub depth_scale: f32,
    /// Smallest depth axis value the sensor reports as valid.
    pub depth_axis_min: f32,
    /// Largest depth axis value the sensor reports as valid.
    pub depth_axis_max: f32,
}

impl SensorProfile {
    /// The sensor-declared valid metric depth interval.
    pub fn valid_interval(&self) -> Interval {
        Interval::new(self.depth_axis_min, self.depth_axis_max)
    }
}

/// Boundary to the acquisition engine.
///
/// Re-expresses the vendor device/stream lifetime as an explicitly scoped
/// resource: open, configure, hand out buffers, stop. Buffer memory pooling
/// and queueing stay behind this trait; the pipeline only ever holds one
/// buffer at a time and releases it by dropping it.
pub trait FrameSource {
    /// Apply capture settings. Fails with `InvalidParameter` when a setting
    /// is out of the device's accepted range.
    fn apply_settings(&mut self, settings: &DeviceSettings) -> Result<()>;

    fn sensor_profile(&self) -> SensorProfile;

    /// Binning and ROI currently in effect; assumed stable for the session.
    fn acquisition_metadata(&self) -> AcquisitionMetadata;

    /// Read the factory calibration resource.
    fn read_calibration_blob(&mut self) -> Result<Vec<u8>>;

    /// Block until the next finished buffer or the timeout elapses.
    fn next_buffer(&mut self, timeout: Duration) -> Result<MultipartBuffer>;

    /// Stop acquisition and release announced buffers.
    fn stop(&mut self) -> Result<()>;
}
