//! Depth processing pipeline module
//!
//! Turns raw multipart sensor buffers into rectified depth and intensity
//! rasters plus a calibrated XYZI point cloud, with separate modules for
//! buffer demultiplexing, calibration, raster filtering, undistortion,
//! projection, export, and session orchestration.

pub mod acquisition;
pub mod buffer;
pub mod calibration;
pub mod cloud;
pub mod common;
pub mod conversions;
pub mod export;
pub mod raster;
pub mod undistort;

mod tests;

pub use common::{PipelineError, Result};

pub use acquisition::{DeviceSettings, FrameSource, SensorProfile, SyntheticFrameSource};

pub use buffer::{BufferPart, BufferPartKind, MultipartBuffer, PixelFormat, demux_parts};

pub use calibration::{CalibrationParameters, CameraIntrinsics, DistortionCoefficients};

pub use cloud::{PointCloud, PointXyzi, project_point_cloud};

pub use conversions::{
    FramePipeline, FrameProducts, PipelineConfig, PipelineConfigBuilder, SessionSummary,
    run_session,
};

pub use export::{
    DepthMapWriter, FrameExporter, IntensityImageWriter, LasPointCloudWriter, PngIntensityWriter,
    PointCloudWriter, TiffDepthMapWriter, default_output_dir,
};

pub use raster::{
    AcquisitionMetadata, Interval, RangeThreshold, Raster, Region, RoiRect, depth_to_metric,
};

pub use undistort::Undistortion;
