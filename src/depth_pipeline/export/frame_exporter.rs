//! Per-frame artifact export.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::depth_pipeline::cloud::types::PointCloud;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::export::las_cloud_writer::LasPointCloudWriter;
use crate::depth_pipeline::export::png_intensity_writer::PngIntensityWriter;
use crate::depth_pipeline::export::tiff_depth_writer::TiffDepthMapWriter;
use crate::depth_pipeline::export::writer::{
    DepthMapWriter, IntensityImageWriter, PointCloudWriter,
};
use crate::depth_pipeline::raster::types::Raster;

/// Platform-appropriate directory for exported artifacts.
pub fn default_output_dir() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from("C:/Users/Public/Pictures")
    } else {
        PathBuf::from("/tmp")
    }
}

/// Writes the three artifacts of one processed frame under deterministic,
/// frame-indexed names. Re-running with the same index overwrites.
///
/// A failing artifact is logged and does not prevent the remaining
/// artifacts of the frame from being written; in-memory results are never
/// affected by export failures.
pub struct FrameExporter<D, I, P> {
    output_dir: PathBuf,
    depth_writer: D,
    intensity_writer: I,
    cloud_writer: P,
}

impl FrameExporter<TiffDepthMapWriter, PngIntensityWriter, LasPointCloudWriter> {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            depth_writer: TiffDepthMapWriter,
            intensity_writer: PngIntensityWriter,
            cloud_writer: LasPointCloudWriter,
        }
    }
}

impl<D, I, P> FrameExporter<D, I, P>
where
    D: DepthMapWriter,
    I: IntensityImageWriter,
    P: PointCloudWriter,
{
    pub fn with_custom(
        output_dir: PathBuf,
        depth_writer: D,
        intensity_writer: I,
        cloud_writer: P,
    ) -> Self {
        Self {
            output_dir,
            depth_writer,
            intensity_writer,
            cloud_writer,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export one frame's artifacts. Returns how many of the three were
    /// written successfully.
    pub fn export_frame(
        &self,
        depth: &Raster<f32>,
        intensity: &Raster<u16>,
        cloud: &PointCloud,
        frame_index: usize,
    ) -> usize {
        let mut written = 0;

        let depth_path = self
            .output_dir
            .join(format!("undistorted_depth_map_{frame_index}.tiff"));
        written += self.report(
            "depth map",
            &depth_path,
            self.depth_writer.write_depth_map(depth, &depth_path),
        );

        let intensity_path = self
            .output_dir
            .join(format!("undistorted_intensity_image_{frame_index}.png"));
        written += self.report(
            "intensity image",
            &intensity_path,
            self.intensity_writer
                .write_intensity_image(intensity, &intensity_path),
        );

        let cloud_path = self
            .output_dir
            .join(format!("point_cloud_xyzi_{frame_index}.las"));
        written += self.report(
            "point cloud",
            &cloud_path,
            self.cloud_writer.write_point_cloud(cloud, &cloud_path),
        );

        written
    }

    fn report(&self, artifact: &str, path: &Path, result: Result<()>) -> usize {
        match result {
            Ok(()) => {
                info!(path = %path.display(), "Wrote {artifact}");
                1
            }
            Err(e) => {
                error!(path = %path.display(), "Failed to write {artifact}: {e}");
                0
            }
        }
    }
}
