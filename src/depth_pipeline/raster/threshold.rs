//! Range-threshold validity filter.

use tracing::debug;

use crate::depth_pipeline::raster::types::{Interval, Raster, Region};

/// Marks pixels whose value lies outside an inclusive interval as invalid.
///
/// Applied twice per frame with different semantics: once with the sensor's
/// reported valid depth interval on raw metric depth (removes "no return"
/// codes), and once with the user-configured distance interval on the
/// undistorted depth map. Filtering composes by intersection with the
/// raster's current region, so an already-invalid pixel stays invalid no
/// matter its value, and reapplying the same interval changes nothing.
/// Values are never altered.
#[derive(Debug, Clone, Copy)]
pub struct RangeThreshold {
    interval: Interval,
}

impl RangeThreshold {
    pub fn new(interval: Interval) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Compute the updated validity region for `raster`.
    ///
    /// The caller decides whether to attach the result via
    /// [`Raster::set_region`]; the raster itself is left untouched.
    pub fn process(&self, raster: &Raster<f32>) -> Region {
        let region = raster.region();
        let mask: Vec<bool> = raster
            .data()
            .iter()
            .enumerate()
            .map(|(i, &value)| region.is_valid(i) && self.interval.contains(value))
            .collect();
        let filtered = Region::from_mask(mask);

        debug!(
            min = self.interval.min,
            max = self.interval.max,
            valid_before = region.valid_count(),
            valid_after = filtered.valid_count(),
            "Applied range threshold"
        );

        filtered
    }
}
