//! Back-projection of rectified rasters into a point cloud.

use tracing::debug;

use crate::depth_pipeline::calibration::types::CameraIntrinsics;
use crate::depth_pipeline::cloud::types::{PointCloud, PointXyzi};
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::raster::types::Raster;

/// Project a rectified depth raster and its paired intensity raster into an
/// unordered XYZI point cloud.
///
/// `intrinsics` must be the effective intrinsics of the rectified frame
/// (factory intrinsics rescaled for the rasters' binning/ROI metadata).
/// Every pixel valid in the depth region back-projects through the pinhole
/// model and pairs with the same-location intensity sample; invalid pixels
/// produce no point at all, degenerate or otherwise.
///
/// The rasters must share identical geometry. A mismatch is a caller
/// contract violation and fails fast without producing a partial cloud.
pub fn project_point_cloud(
    depth: &Raster<f32>,
    intensity: &Raster<u16>,
    intrinsics: &CameraIntrinsics,
) -> Result<PointCloud> {
    if depth.width() != intensity.width()
        || depth.height() != intensity.height()
        || depth.metadata() != intensity.metadata()
    {
        return Err(PipelineError::GeometryMismatch(format!(
            "depth is {}x{} {:?}, intensity is {}x{} {:?}",
            depth.width(),
            depth.height(),
            depth.metadata(),
            intensity.width(),
            intensity.height(),
            intensity.metadata()
        )));
    }

    let mut cloud = PointCloud::with_capacity(depth.region().valid_count());

    for v in 0..depth.height() {
        for u in 0..depth.width() {
            let index = depth.index(u, v);
            if !depth.region().is_valid(index) {
                continue;
            }

            let z = depth.data()[index] as f64;
            let x = (u as f64 - intrinsics.cx) * z / intrinsics.fx;
            let y = (v as f64 - intrinsics.cy) * z / intrinsics.fy;

            cloud.push(PointXyzi {
                x: x as f32,
                y: y as f32,
                z: z as f32,
                intensity: intensity.data()[index],
            });
        }
    }

    debug!(points = cloud.len(), "Projected point cloud");
    Ok(cloud)
}
