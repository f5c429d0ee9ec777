//! Raster data module
//!
//! Row-major sample grids with validity regions, metric depth conversion,
//! and range-threshold filtering.

mod convert;
mod threshold;
pub mod types;

pub use convert::depth_to_metric;
pub use threshold::RangeThreshold;
pub use types::{AcquisitionMetadata, Interval, Raster, Region, RoiRect};
