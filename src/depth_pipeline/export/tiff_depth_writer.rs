//! Depth map export as single-channel floating-point TIFF.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use tracing::debug;

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::export::writer::DepthMapWriter;
use crate::depth_pipeline::raster::types::Raster;

/// Writes the rectified metric depth raster as an uncompressed Gray32Float
/// TIFF. The validity region is not painted into the file; all physical
/// pixel values are written, invalid ones included.
pub struct TiffDepthMapWriter;

impl DepthMapWriter for TiffDepthMapWriter {
    fn write_depth_map(&self, depth: &Raster<f32>, path: &Path) -> Result<()> {
        debug!(
            width = depth.width(),
            height = depth.height(),
            "Encoding depth map TIFF"
        );

        let mut buffer = Vec::new();
        let mut encoder = tiff::encoder::TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::Encode(e.to_string()))?;

        encoder
            .write_image::<tiff::encoder::colortype::Gray32Float>(
                depth.width(),
                depth.height(),
                depth.data(),
            )
            .map_err(|e| PipelineError::Encode(e.to_string()))?;

        fs::write(path, &buffer)
            .map_err(|e| PipelineError::Export(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}
