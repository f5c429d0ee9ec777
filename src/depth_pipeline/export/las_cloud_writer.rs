//! Point cloud export as LAS with per-point intensity.

use std::path::Path;

use las::{Builder, Point, Writer};
use tracing::debug;

use crate::depth_pipeline::cloud::types::PointCloud;
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::export::writer::PointCloudWriter;

/// Millimeter-unit coordinates stored with 0.001 precision.
const COORDINATE_SCALE: f64 = 0.001;

pub struct LasPointCloudWriter;

impl PointCloudWriter for LasPointCloudWriter {
    fn write_point_cloud(&self, cloud: &PointCloud, path: &Path) -> Result<()> {
        debug!(points = cloud.len(), "Encoding LAS point cloud");

        let mut builder = Builder::from((1, 4));
        builder.point_format.is_compressed = false;

        // Center the integer coordinate range on the cloud's bounds.
        if let Some((min, max)) = bounds(cloud) {
            builder.transforms = las::Vector {
                x: las::Transform {
                    scale: COORDINATE_SCALE,
                    offset: (min[0] + max[0]) / 2.0,
                },
                y: las::Transform {
                    scale: COORDINATE_SCALE,
                    offset: (min[1] + max[1]) / 2.0,
                },
                z: las::Transform {
                    scale: COORDINATE_SCALE,
                    offset: (min[2] + max[2]) / 2.0,
                },
            };
        }

        let header = builder
            .into_header()
            .map_err(|e| PipelineError::Encode(format!("LAS header: {e}")))?;

        let mut writer = Writer::from_path(path, header)
            .map_err(|e| PipelineError::Export(format!("{}: {}", path.display(), e)))?;

        for point in cloud.points() {
            let mut las_point = Point::default();
            las_point.x = point.x as f64;
            las_point.y = point.y as f64;
            las_point.z = point.z as f64;
            las_point.intensity = point.intensity;

            writer
                .write_point(las_point)
                .map_err(|e| PipelineError::Encode(format!("LAS point: {e}")))?;
        }

        writer
            .close()
            .map_err(|e| PipelineError::Export(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}

fn bounds(cloud: &PointCloud) -> Option<([f64; 3], [f64; 3])> {
    let mut points = cloud.points().iter();
    let first = points.next()?;
    let mut min = [first.x as f64, first.y as f64, first.z as f64];
    let mut max = min;
    for point in points {
        let p = [point.x as f64, point.y as f64, point.z as f64];
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    Some((min, max))
}
