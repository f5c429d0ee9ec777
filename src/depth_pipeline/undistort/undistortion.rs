//! Lens undistortion of depth and intensity rasters.

use tracing::debug;

use crate::depth_pipeline::calibration::types::{CalibrationParameters, CameraIntrinsics};
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::raster::types::{Raster, Region};

/// Remaps rasters from the distorted sensor frame into an idealized
/// (undistorted) frame using factory calibration.
///
/// Owns the parsed calibration for the lifetime of one camera session and
/// never mutates it. The remap is an inverse mapping: every destination
/// pixel is normalized through the intrinsics effective for the raster's
/// binning/ROI metadata, pushed through the forward Brown-Conrady model, and
/// sampled from the source raster at the resulting distorted coordinate.
///
/// Depth and intensity of one frame must be processed with the same
/// acquisition metadata or the two outputs will disagree geometrically.
pub struct Undistortion {
    calibration: CalibrationParameters,
}

/// Tolerance for treating a source coordinate as on-image. Coordinates
/// within half a pixel of the border clamp to the edge sample instead of
/// invalidating, matching nearest-neighbor coverage.
const BORDER: f64 = 0.5;

impl Undistortion {
    pub fn new(calibration: CalibrationParameters) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &CalibrationParameters {
        &self.calibration
    }

    /// Undistort a metric depth raster.
    ///
    /// Samples nearest-neighbor so depth values are never blended across
    /// validity boundaries or depth discontinuities. A destination pixel
    /// whose source lies off the image, or maps to an invalid source pixel,
    /// is marked invalid in the output region rather than defaulted to a
    /// fake depth.
    pub fn process_depth(&self, raster: &Raster<f32>) -> Result<Raster<f32>> {
        let intrinsics = self.calibration.effective_intrinsics(raster.metadata())?;
        let width = raster.width();
        let height = raster.height();
        let len = (width as usize) * (height as usize);

        let mut data = vec![0.0f32; len];
        let mut mask = vec![false; len];

        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = self.source_coordinate(&intrinsics, x, y);
                let dest = raster.index(x, y);

                let nearest_x = sx.round();
                let nearest_y = sy.round();
                if nearest_x < 0.0
                    || nearest_y < 0.0
                    || nearest_x >= width as f64
                    || nearest_y >= height as f64
                {
                    continue;
                }

                let src = raster.index(nearest_x as u32, nearest_y as u32);
                if !raster.region().is_valid(src) {
                    continue;
                }

                data[dest] = raster.data()[src];
                mask[dest] = true;
            }
        }

        let region = Region::from_mask(mask);
        debug!(
            width,
            height,
            valid_before = raster.region().valid_count(),
            valid_after = region.valid_count(),
            "Undistorted depth map"
        );

        Ok(Raster::from_parts(
            width,
            height,
            data,
            region,
            *raster.metadata(),
        ))
    }

    /// Undistort an intensity raster as a standard 2-D image remap.
    ///
    /// Samples bilinearly; destination pixels with no clean source mapping
    /// (outside the image, beyond the border tolerance) are invalidated.
    pub fn process_intensity(&self, raster: &Raster<u16>) -> Result<Raster<u16>> {
        let intrinsics = self.calibration.effective_intrinsics(raster.metadata())?;
        let width = raster.width();
        let height = raster.height();
        let len = (width as usize) * (height as usize);

        let mut data = vec![0u16; len];
        let mut mask = vec![false; len];

        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = self.source_coordinate(&intrinsics, x, y);
                if sx < -BORDER
                    || sy < -BORDER
                    || sx > width as f64 - 1.0 + BORDER
                    || sy > height as f64 - 1.0 + BORDER
                {
                    continue;
                }

                let dest = raster.index(x, y);
                data[dest] = sample_bilinear(raster, sx, sy);
                mask[dest] = true;
            }
        }

        let region = Region::from_mask(mask);
        debug!(
            width,
            height,
            valid_after = region.valid_count(),
            "Undistorted intensity image"
        );

        Ok(Raster::from_parts(
            width,
            height,
            data,
            region,
            *raster.metadata(),
        ))
    }

    /// Distorted source coordinate for an idealized destination pixel.
    fn source_coordinate(&self, intrinsics: &CameraIntrinsics, x: u32, y: u32) -> (f64, f64) {
        let (nx, ny) = intrinsics.pixel_to_normalized(x as f64, y as f64);
        let (dx, dy) = self.calibration.distortion.distort_normalized(nx, ny);
        intrinsics.normalized_to_pixel(dx, dy)
    }
}

/// Bilinear sample with edge clamping; callers guarantee the coordinate is
/// within the border tolerance of the image.
fn sample_bilinear(raster: &Raster<u16>, sx: f64, sy: f64) -> u16 {
    let max_x = (raster.width() - 1) as f64;
    let max_y = (raster.height() - 1) as f64;
    let cx = sx.clamp(0.0, max_x);
    let cy = sy.clamp(0.0, max_y);

    let x0 = cx.floor() as u32;
    let y0 = cy.floor() as u32;
    let x1 = (x0 + 1).min(raster.width() - 1);
    let y1 = (y0 + 1).min(raster.height() - 1);
    let fx = cx - x0 as f64;
    let fy = cy - y0 as f64;

    let v00 = raster.get(x0, y0) as f64;
    let v10 = raster.get(x1, y0) as f64;
    let v01 = raster.get(x0, y1) as f64;
    let v11 = raster.get(x1, y1) as f64;

    let top = v00 * (1.0 - fx) + v10 * fx;
    let bottom = v01 * (1.0 - fx) + v11 * fx;
    (top * (1.0 - fy) + bottom * fy).round() as u16
}
