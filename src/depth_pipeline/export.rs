//! Artifact export module
//!
//! Writer seams and implementations for the three per-frame artifacts:
//! depth map TIFF, intensity PNG, and XYZI point cloud LAS.

mod frame_exporter;
mod las_cloud_writer;
mod png_intensity_writer;
mod tiff_depth_writer;
mod writer;

pub use frame_exporter::{FrameExporter, default_output_dir};
pub use las_cloud_writer::LasPointCloudWriter;
pub use png_intensity_writer::PngIntensityWriter;
pub use tiff_depth_writer::TiffDepthMapWriter;
pub use writer::{DepthMapWriter, IntensityImageWriter, PointCloudWriter};
