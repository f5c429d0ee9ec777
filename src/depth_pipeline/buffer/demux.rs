//! Multipart buffer demultiplexing.

use crate::depth_pipeline::buffer::types::{BufferPart, BufferPartKind, MultipartBuffer};
use crate::depth_pipeline::common::error::{PipelineError, Result};

/// Locate the depth part and the intensity part of a multipart buffer.
///
/// Returns references into the buffer, not copies; the buffer only has to
/// outlive this call until the rasters are materialized. Parts with other
/// tags (confidence, chunk data) are ignored. Fails with
/// [`PipelineError::MissingPart`] naming the first absent tag.
pub fn demux_parts(buffer: &MultipartBuffer) -> Result<(&BufferPart, &BufferPart)> {
    let find = |kind: BufferPartKind| -> Result<&BufferPart> {
        buffer
            .parts
            .iter()
            .find(|part| part.kind == kind)
            .ok_or(PipelineError::MissingPart(kind))
    };

    let depth = find(BufferPartKind::Image3d)?;
    let intensity = find(BufferPartKind::Image2d)?;
    Ok((depth, intensity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth_pipeline::buffer::types::PixelFormat;

    fn part(kind: BufferPartKind, format: PixelFormat) -> BufferPart {
        BufferPart {
            kind,
            format,
            width: 2,
            height: 2,
            data: vec![0; 4 * format.bytes_per_pixel()],
        }
    }

    fn buffer_with(parts: Vec<BufferPart>) -> MultipartBuffer {
        MultipartBuffer {
            frame_id: 0,
            incomplete: false,
            has_new_data: true,
            parts,
        }
    }

    #[test]
    fn finds_depth_and_intensity_parts() {
        let buffer = buffer_with(vec![
            part(BufferPartKind::Confidence, PixelFormat::Mono16),
            part(BufferPartKind::Image2d, PixelFormat::Mono16),
            part(BufferPartKind::Image3d, PixelFormat::Coord3dC16),
        ]);

        let (depth, intensity) = demux_parts(&buffer).unwrap();
        assert_eq!(depth.kind, BufferPartKind::Image3d);
        assert_eq!(intensity.kind, BufferPartKind::Image2d);
    }

    #[test]
    fn missing_intensity_part_is_reported_by_tag() {
        let buffer = buffer_with(vec![part(BufferPartKind::Image3d, PixelFormat::Coord3dC16)]);

        let err = demux_parts(&buffer).unwrap_err();
        match err {
            PipelineError::MissingPart(kind) => {
                assert_eq!(kind, BufferPartKind::Image2d);
                assert_eq!(err.to_string(), "Missing buffer part: Image2D");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_buffer_reports_depth_part_first() {
        let buffer = buffer_with(Vec::new());
        let err = demux_parts(&buffer).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingPart(BufferPartKind::Image3d)
        ));
    }

    #[test]
    fn unexpected_extra_parts_are_ignored() {
        let buffer = buffer_with(vec![
            part(BufferPartKind::Image3d, PixelFormat::Coord3dC16),
            part(BufferPartKind::Image2d, PixelFormat::Mono16),
            part(BufferPartKind::Confidence, PixelFormat::Mono16),
            part(BufferPartKind::Confidence, PixelFormat::Mono8),
        ]);
        assert!(demux_parts(&buffer).is_ok());
    }
}
