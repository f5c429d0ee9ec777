//! Raw depth code to metric depth conversion.

use tracing::debug;

use crate::depth_pipeline::raster::types::Raster;

/// Convert raw integer depth codes to metric depth.
///
/// Every code is multiplied by the device-reported scale factor, yielding
/// depth in the calibration's physical unit (millimeters for the sensors
/// this pipeline targets). The transform is per-pixel and order-independent;
/// region and metadata carry over unchanged. Validity is not decided here,
/// that is the range threshold's job.
pub fn depth_to_metric(raster: &Raster<u16>, scale_factor: f32) -> Raster<f32> {
    debug!(
        scale_factor,
        width = raster.width(),
        height = raster.height(),
        "Converting raw depth codes to metric depth"
    );

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&code| code as f32 * scale_factor)
        .collect();

    Raster::from_parts(
        raster.width(),
        raster.height(),
        data,
        raster.region().clone(),
        *raster.metadata(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth_pipeline::raster::types::AcquisitionMetadata;

    #[test]
    fn conversion_is_exact_multiplication() {
        let meta = AcquisitionMetadata::full_sensor(3, 1);
        let raster = Raster::new(3, 1, vec![0u16, 500, 4000], meta).unwrap();

        let metric = depth_to_metric(&raster, 0.5);

        assert_eq!(metric.data(), &[0.0, 250.0, 2000.0]);
    }

    #[test]
    fn conversion_preserves_region_and_metadata() {
        let meta = AcquisitionMetadata::full_sensor(2, 2);
        let mut raster = Raster::new(2, 2, vec![10u16, 20, 30, 40], meta).unwrap();
        let mut region = raster.region().clone();
        region.invalidate(3);
        raster.set_region(region).unwrap();

        let metric = depth_to_metric(&raster, 2.0);

        assert_eq!(metric.region().valid_count(), 3);
        assert!(!metric.region().is_valid(3));
        assert_eq!(metric.metadata(), raster.metadata());
    }
}
