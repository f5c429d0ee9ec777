//! Multipart acquisition buffer types.

use std::fmt;

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::raster::types::{AcquisitionMetadata, Raster};

/// Content tag of one buffer part.
///
/// Parts are dispatched on this tag, so the depth and intensity channels are
/// statically distinguishable instead of being looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPartKind {
    /// 3-D range data (raw depth codes).
    Image3d,
    /// 2-D intensity image.
    Image2d,
    /// Per-pixel confidence channel.
    Confidence,
}

impl fmt::Display for BufferPartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BufferPartKind::Image3d => "Image3D",
            BufferPartKind::Image2d => "Image2D",
            BufferPartKind::Confidence => "Confidence",
        };
        f.write_str(name)
    }
}

/// Sample encoding of a buffer part, following PFNC naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 16-bit raw depth codes.
    Coord3dC16,
    /// 32-bit float metric depth.
    Coord3dC32f,
    /// 8-bit intensity.
    Mono8,
    /// 16-bit intensity.
    Mono16,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Mono8 => 1,
            PixelFormat::Coord3dC16 | PixelFormat::Mono16 => 2,
            PixelFormat::Coord3dC32f => 4,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Coord3dC16 => "Coord3D_C16",
            PixelFormat::Coord3dC32f => "Coord3D_C32f",
            PixelFormat::Mono8 => "Mono8",
            PixelFormat::Mono16 => "Mono16",
        };
        f.write_str(name)
    }
}

/// One typed channel inside a multipart buffer.
///
/// Sample bytes are little-endian, row-major, tightly packed.
#[derive(Debug, Clone)]
pub struct BufferPart {
    pub kind: BufferPartKind,
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl BufferPart {
    fn check_payload(&self) -> Result<()> {
        let expected = (self.width as usize)
            * (self.height as usize)
            * self.format.bytes_per_pixel();
        if self.data.len() != expected {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{} part payload is {} bytes, expected {} for {}x{} {}",
                self.kind,
                self.data.len(),
                expected,
                self.width,
                self.height,
                self.format
            )));
        }
        Ok(())
    }

    /// Materialize the raw depth channel as a 16-bit code raster.
    pub fn to_depth_raster(&self, metadata: &AcquisitionMetadata) -> Result<Raster<u16>> {
        if self.format != PixelFormat::Coord3dC16 {
            return Err(PipelineError::UnsupportedFormat(format!(
                "depth part has format {}, expected {}",
                self.format,
                PixelFormat::Coord3dC16
            )));
        }
        self.check_payload()?;

        let codes: Vec<u16> = self
            .data
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Raster::new(self.width, self.height, codes, *metadata)
    }

    /// Materialize the intensity channel as a 16-bit raster.
    ///
    /// Mono8 samples are widened so downstream stages handle one intensity
    /// type regardless of the sensor's transfer format.
    pub fn to_intensity_raster(&self, metadata: &AcquisitionMetadata) -> Result<Raster<u16>> {
        self.check_payload()?;
        let samples: Vec<u16> = match self.format {
            PixelFormat::Mono8 => self.data.iter().map(|&v| v as u16).collect(),
            PixelFormat::Mono16 => self
                .data
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect(),
            other => {
                return Err(PipelineError::UnsupportedFormat(format!(
                    "intensity part has format {other}, expected Mono8 or Mono16"
                )));
            }
        };
        Raster::new(self.width, self.height, samples, *metadata)
    }
}

/// One acquisition unit as delivered by the data stream.
#[derive(Debug, Clone)]
pub struct MultipartBuffer {
    pub frame_id: u64,
    /// Transfer ended before the buffer was filled; the frame is unusable.
    pub incomplete: bool,
    /// False when the stream re-delivered an already-seen buffer.
    pub has_new_data: bool,
    pub parts: Vec<BufferPart>,
}
