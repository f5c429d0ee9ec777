//! Intensity image export as 16-bit grayscale PNG.

use std::path::Path;

use image::{ImageBuffer, Luma};
use tracing::debug;

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::export::writer::IntensityImageWriter;
use crate::depth_pipeline::raster::types::Raster;

pub struct PngIntensityWriter;

impl IntensityImageWriter for PngIntensityWriter {
    fn write_intensity_image(&self, intensity: &Raster<u16>, path: &Path) -> Result<()> {
        debug!(
            width = intensity.width(),
            height = intensity.height(),
            "Encoding intensity PNG"
        );

        let image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(
            intensity.width(),
            intensity.height(),
            intensity.data().to_vec(),
        )
        .ok_or_else(|| {
            PipelineError::Encode("intensity raster does not fit its dimensions".to_string())
        })?;

        image
            .save(path)
            .map_err(|e| PipelineError::Export(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}
