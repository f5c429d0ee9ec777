//! Per-frame stage composition.

use tracing::{info, instrument};

use crate::depth_pipeline::acquisition::SensorProfile;
use crate::depth_pipeline::buffer::demux_parts;
use crate::depth_pipeline::buffer::types::MultipartBuffer;
use crate::depth_pipeline::calibration::types::CalibrationParameters;
use crate::depth_pipeline::cloud::project_point_cloud;
use crate::depth_pipeline::cloud::types::PointCloud;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::raster::types::{AcquisitionMetadata, Interval, Raster};
use crate::depth_pipeline::raster::{RangeThreshold, depth_to_metric};
use crate::depth_pipeline::undistort::Undistortion;

/// In-memory outputs of one processed frame.
#[derive(Debug)]
pub struct FrameProducts {
    pub depth: Raster<f32>,
    pub intensity: Raster<u16>,
    pub cloud: PointCloud,
}

/// Runs one multipart buffer through the full stage sequence:
/// demux, metric conversion, sensor-interval filter, undistortion,
/// distance filter, point-cloud projection.
///
/// The stage order is fixed; the sensor-interval filter sees raw metric
/// depth while the distance filter sees undistorted depth, and swapping
/// them changes results. All stages are pure over immutable inputs; the
/// pipeline holds no per-frame state and is reused across buffers.
pub struct FramePipeline {
    undistortion: Undistortion,
    profile: SensorProfile,
    distance_filter: Option<RangeThreshold>,
}

impl FramePipeline {
    pub fn new(
        calibration: CalibrationParameters,
        profile: SensorProfile,
        distance_filter: Option<Interval>,
    ) -> Self {
        Self {
            undistortion: Undistortion::new(calibration),
            profile,
            distance_filter: distance_filter.map(RangeThreshold::new),
        }
    }

    pub fn calibration(&self) -> &CalibrationParameters {
        self.undistortion.calibration()
    }

    #[instrument(skip(self, buffer, metadata), fields(frame = buffer.frame_id))]
    pub fn process_frame(
        &self,
        buffer: &MultipartBuffer,
        metadata: &AcquisitionMetadata,
    ) -> Result<FrameProducts> {
        let (depth_part, intensity_part) = demux_parts(buffer)?;

        let undistorted_depth = {
            let _span = tracing::info_span!("depth_processing").entered();

            let raw_depth = depth_part.to_depth_raster(metadata)?;
            let mut depth = depth_to_metric(&raw_depth, self.profile.depth_scale);

            // Remove sensor-declared invalid pixels before undistortion.
            let valid_pixels =
                RangeThreshold::new(self.profile.valid_interval()).process(&depth);
            depth.set_region(valid_pixels)?;

            let mut undistorted = self.undistortion.process_depth(&depth)?;

            if let Some(filter) = &self.distance_filter {
                let in_range = filter.process(&undistorted);
                undistorted.set_region(in_range)?;
            }
            undistorted
        };

        let undistorted_intensity = {
            let _span = tracing::info_span!("intensity_processing").entered();

            let intensity = intensity_part.to_intensity_raster(metadata)?;
            self.undistortion.process_intensity(&intensity)?
        };

        let cloud = {
            let _span = tracing::info_span!("point_cloud_projection").entered();

            let intrinsics = self
                .calibration()
                .effective_intrinsics(undistorted_depth.metadata())?;
            project_point_cloud(&undistorted_depth, &undistorted_intensity, &intrinsics)?
        };

        info!(
            frame = buffer.frame_id,
            valid_pixels = undistorted_depth.region().valid_count(),
            points = cloud.len(),
            "Frame processed"
        );

        Ok(FrameProducts {
            depth: undistorted_depth,
            intensity: undistorted_intensity,
            cloud,
        })
    }
}
