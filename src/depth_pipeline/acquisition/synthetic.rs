//! In-process frame source producing a deterministic synthetic scene.

use std::time::Duration;

use tracing::debug;

use crate::depth_pipeline::acquisition::source::{
    CONFIDENCE_THRESHOLD_MAX, DeviceSettings, FrameSource, SensorProfile,
};
use crate::depth_pipeline::buffer::types::{
    BufferPart, BufferPartKind, MultipartBuffer, PixelFormat,
};
use crate::depth_pipeline::calibration::types::{
    CalibrationParameters, CameraIntrinsics, DistortionCoefficients,
};
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::raster::types::AcquisitionMetadata;

/// Sensor's "no return" depth code.
const INVALID_DEPTH_CODE: u16 = 0;

/// Stands in for a real depth camera in the sample binary, tests, and
/// benches. Every frame is a tilted plane around one meter with
/// deterministic low-confidence dropouts reported as the invalid depth
/// code, the way the device-side confidence filter behaves.
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    calibration: CalibrationParameters,
    profile: SensorProfile,
    metadata: AcquisitionMetadata,
    settings: DeviceSettings,
    frames_emitted: u64,
    stopped: bool,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        let calibration = CalibrationParameters {
            sensor_width: width,
            sensor_height: height,
            intrinsics: CameraIntrinsics {
                fx: 0.8 * width as f64,
                fy: 0.8 * width as f64,
                cx: (width as f64 - 1.0) / 2.0,
                cy: (height as f64 - 1.0) / 2.0,
            },
            distortion: DistortionCoefficients {
                k1: -0.06,
                k2: 0.004,
                k3: 0.0,
                p1: 0.0003,
                p2: -0.0002,
            },
        };
        Self {
            width,
            height,
            calibration,
            profile: SensorProfile {
                depth_scale: 0.25,
                depth_axis_min: 100.0,
                depth_axis_max: 4000.0,
            },
            metadata: AcquisitionMetadata::full_sensor(width, height),
            settings: DeviceSettings::default(),
            frames_emitted: 0,
            stopped: false,
        }
    }

    pub fn calibration(&self) -> &CalibrationParameters {
        &self.calibration
    }

    /// Deterministic stand-in for the confidence channel.
    fn confidence_at(&self, x: u32, y: u32) -> u16 {
        (((x as u64) * 31 + (y as u64) * 17 + self.frames_emitted * 7) % 4096) as u16
    }

    fn depth_part(&self) -> BufferPart {
        let threshold = self.settings.confidence_threshold.unwrap_or(0);
        let mut data = Vec::with_capacity((self.width * self.height) as usize * 2);
        for y in 0..self.height {
            for x in 0..self.width {
                // Plane tilted along x, roughly 0.9 m to 1.4 m.
                let metric = 900.0 + 500.0 * (x as f32 / self.width.max(1) as f32);
                let code = if self.confidence_at(x, y) < threshold {
                    INVALID_DEPTH_CODE
                } else {
                    (metric / self.profile.depth_scale) as u16
                };
                data.extend_from_slice(&code.to_le_bytes());
            }
        }
        BufferPart {
            kind: BufferPartKind::Image3d,
            format: PixelFormat::Coord3dC16,
            width: self.width,
            height: self.height,
            data,
        }
    }

    fn intensity_part(&self) -> BufferPart {
        let mut data = Vec::with_capacity((self.width * self.height) as usize * 2);
        for y in 0..self.height {
            for x in 0..self.width {
                // Diagonal ramp, scaled into a 12-bit-ish range.
                let sample = (((x + y) * 4093) / (self.width + self.height).max(1)) as u16;
                data.extend_from_slice(&sample.to_le_bytes());
            }
        }
        BufferPart {
            kind: BufferPartKind::Image2d,
            format: PixelFormat::Mono16,
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl FrameSource for SyntheticFrameSource {
    fn apply_settings(&mut self, settings: &DeviceSettings) -> Result<()> {
        if let Some(threshold) = settings.confidence_threshold {
            if threshold > CONFIDENCE_THRESHOLD_MAX {
                return Err(PipelineError::InvalidParameter(format!(
                    "confidence threshold {threshold} exceeds {CONFIDENCE_THRESHOLD_MAX}"
                )));
            }
        }
        if !settings.exposure_time_us.is_finite() || settings.exposure_time_us <= 0.0 {
            return Err(PipelineError::InvalidParameter(format!(
                "exposure time {} us is not a positive duration",
                settings.exposure_time_us
            )));
        }
        self.settings = *settings;
        Ok(())
    }

    fn sensor_profile(&self) -> SensorProfile {
        self.profile
    }

    fn acquisition_metadata(&self) -> AcquisitionMetadata {
        self.metadata
    }

    fn read_calibration_blob(&mut self) -> Result<Vec<u8>> {
        Ok(self.calibration.to_blob())
    }

    fn next_buffer(&mut self, _timeout: Duration) -> Result<MultipartBuffer> {
        if self.stopped {
            return Err(PipelineError::DeviceNotFound(
                "device connection closed".to_string(),
            ));
        }

        let buffer = MultipartBuffer {
            frame_id: self.frames_emitted,
            incomplete: false,
            has_new_data: true,
            parts: vec![self.depth_part(), self.intensity_part()],
        };
        self.frames_emitted += 1;
        debug!(frame = buffer.frame_id, "Synthesized buffer");
        Ok(buffer)
    }

    fn stop(&mut self) -> Result<()> {
        self.stopped = true;
        Ok(())
    }
}
