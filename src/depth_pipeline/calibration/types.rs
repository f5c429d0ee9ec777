//! Factory calibration parameter types.

use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::raster::types::AcquisitionMetadata;

/// Pinhole camera intrinsics, in pixels of the reference sensor frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
}

impl CameraIntrinsics {
    pub fn is_valid(&self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.fx.abs() > 1e-12
            && self.fy.abs() > 1e-12
    }

    /// Convert pixel coordinates to normalized pinhole coordinates.
    #[inline]
    pub fn pixel_to_normalized(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.cx) / self.fx, (y - self.cy) / self.fy)
    }

    /// Convert normalized pinhole coordinates to pixel coordinates.
    #[inline]
    pub fn normalized_to_pixel(&self, nx: f64, ny: f64) -> (f64, f64) {
        (self.fx * nx + self.cx, self.fy * ny + self.cy)
    }
}

/// Brown-Conrady radial-tangential distortion coefficients.
///
/// The model acts on normalized pinhole coordinates, which makes it
/// independent of binning and ROI once intrinsics are rescaled accordingly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub p1: f64,
    pub p2: f64,
}

impl DistortionCoefficients {
    /// Apply forward distortion to normalized coordinates.
    pub fn distort_normalized(&self, nx: f64, ny: f64) -> (f64, f64) {
        let r2 = nx * nx + ny * ny;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * nx * ny + self.p2 * (r2 + 2.0 * nx * nx);
        let y_tan = self.p1 * (r2 + 2.0 * ny * ny) + 2.0 * self.p2 * nx * ny;
        (nx * radial + x_tan, ny * radial + y_tan)
    }
}

/// Complete factory calibration of one depth sensor.
///
/// Parsed once per session from the device's calibration resource and shared
/// read-only across all frames; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParameters {
    /// Sensor width the intrinsics were measured at, in unbinned pixels.
    pub sensor_width: u32,
    /// Sensor height the intrinsics were measured at, in unbinned pixels.
    pub sensor_height: u32,
    pub intrinsics: CameraIntrinsics,
    pub distortion: DistortionCoefficients,
}

impl CalibrationParameters {
    /// Rescale the factory intrinsics into the pixel frame of a raster
    /// captured with the given binning and ROI.
    ///
    /// A raster pixel (x, y) maps to the full sensor as
    /// `(roi.offset_x + x * binning_h, roi.offset_y + y * binning_v)`;
    /// normalized coordinates computed with the returned intrinsics are
    /// identical to those computed with the factory intrinsics on the full
    /// sensor frame, so the distortion coefficients apply unchanged.
    pub fn effective_intrinsics(
        &self,
        metadata: &AcquisitionMetadata,
    ) -> Result<CameraIntrinsics> {
        if metadata.binning_horizontal == 0 || metadata.binning_vertical == 0 {
            return Err(PipelineError::InvalidParameter(format!(
                "binning factors must be non-zero, got {}x{}",
                metadata.binning_horizontal, metadata.binning_vertical
            )));
        }

        let bh = metadata.binning_horizontal as f64;
        let bv = metadata.binning_vertical as f64;
        let ox = metadata.roi.offset_x as f64;
        let oy = metadata.roi.offset_y as f64;

        Ok(CameraIntrinsics {
            fx: self.intrinsics.fx / bh,
            fy: self.intrinsics.fy / bv,
            cx: (self.intrinsics.cx - ox) / bh,
            cy: (self.intrinsics.cy - oy) / bv,
        })
    }
}
