//! Point cloud module
//!
//! XYZI point types and pinhole back-projection of rectified rasters.

mod project;
pub mod types;

pub use project::project_point_cloud;
pub use types::{PointCloud, PointXyzi};
