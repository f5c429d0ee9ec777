//! Session configuration types.

use std::path::PathBuf;

use crate::depth_pipeline::export::default_output_dir;
use crate::depth_pipeline::raster::types::Interval;

/// Configuration for one acquisition session.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Device-side confidence filter; pixels below the threshold come back
    /// as the invalid depth code. `None` disables the filter.
    pub confidence_threshold: Option<u16>,
    /// Camera exposure time in microseconds.
    pub exposure_time_us: f32,
    /// Application-level Z distance filter in millimeters, applied to the
    /// undistorted depth map. `None` disables it.
    pub distance_filter: Option<Interval>,
    /// Number of buffers to acquire and process.
    pub frame_count: usize,
    /// Directory receiving the per-frame artifacts.
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: Some(100),
            exposure_time_us: 1000.0,
            distance_filter: Some(Interval::new(100.0, 1000.0)),
            frame_count: 10,
            output_dir: default_output_dir(),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

/// Builder for PipelineConfig
#[derive(Default)]
pub struct PipelineConfigBuilder {
    confidence_threshold: Option<Option<u16>>,
    exposure_time_us: Option<f32>,
    distance_filter: Option<Option<Interval>>,
    frame_count: Option<usize>,
    output_dir: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    pub fn confidence_threshold(mut self, threshold: Option<u16>) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    pub fn exposure_time_us(mut self, exposure: f32) -> Self {
        self.exposure_time_us = Some(exposure);
        self
    }

    pub fn distance_filter(mut self, interval: Option<Interval>) -> Self {
        self.distance_filter = Some(interval);
        self
    }

    pub fn frame_count(mut self, count: usize) -> Self {
        self.frame_count = Some(count);
        self
    }

    pub fn output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            confidence_threshold: self
                .confidence_threshold
                .unwrap_or(default.confidence_threshold),
            exposure_time_us: self.exposure_time_us.unwrap_or(default.exposure_time_us),
            distance_filter: self.distance_filter.unwrap_or(default.distance_filter),
            frame_count: self.frame_count.unwrap_or(default.frame_count),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
        }
    }
}
