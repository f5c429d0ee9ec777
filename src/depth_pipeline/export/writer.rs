use std::path::Path;

use crate::depth_pipeline::cloud::types::PointCloud;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::raster::types::Raster;

pub trait DepthMapWriter {
    fn write_depth_map(&self, depth: &Raster<f32>, path: &Path) -> Result<()>;
}

pub trait IntensityImageWriter {
    fn write_intensity_image(&self, intensity: &Raster<u16>, path: &Path) -> Result<()>;
}

pub trait PointCloudWriter {
    fn write_point_cloud(&self, cloud: &PointCloud, path: &Path) -> Result<()>;
}
