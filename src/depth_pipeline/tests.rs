#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use crate::depth_pipeline::acquisition::{DeviceSettings, FrameSource, SensorProfile};
    use crate::depth_pipeline::buffer::types::{
        BufferPart, BufferPartKind, MultipartBuffer, PixelFormat,
    };
    use crate::depth_pipeline::calibration::types::{
        CalibrationParameters, CameraIntrinsics, DistortionCoefficients,
    };
    use crate::depth_pipeline::common::error::{PipelineError, Result};
    use crate::depth_pipeline::conversions::{FramePipeline, PipelineConfig, run_session};
    use crate::depth_pipeline::export::{
        DepthMapWriter, FrameExporter, IntensityImageWriter, PointCloudWriter,
    };
    use crate::depth_pipeline::raster::types::{AcquisitionMetadata, Interval};

    fn identity_calibration(width: u32, height: u32) -> CalibrationParameters {
        CalibrationParameters {
            sensor_width: width,
            sensor_height: height,
            intrinsics: CameraIntrinsics {
                fx: width as f64,
                fy: width as f64,
                cx: (width as f64 - 1.0) / 2.0,
                cy: (height as f64 - 1.0) / 2.0,
            },
            distortion: DistortionCoefficients {
                k1: 0.0,
                k2: 0.0,
                k3: 0.0,
                p1: 0.0,
                p2: 0.0,
            },
        }
    }

    fn depth_part(width: u32, height: u32, code: u16) -> BufferPart {
        let mut data = Vec::new();
        for _ in 0..width * height {
            data.extend_from_slice(&code.to_le_bytes());
        }
        BufferPart {
            kind: BufferPartKind::Image3d,
            format: PixelFormat::Coord3dC16,
            width,
            height,
            data,
        }
    }

    fn intensity_part(width: u32, height: u32, sample: u16) -> BufferPart {
        let mut data = Vec::new();
        for _ in 0..width * height {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        BufferPart {
            kind: BufferPartKind::Image2d,
            format: PixelFormat::Mono16,
            width,
            height,
            data,
        }
    }

    fn complete_buffer(frame_id: u64, parts: Vec<BufferPart>) -> MultipartBuffer {
        MultipartBuffer {
            frame_id,
            incomplete: false,
            has_new_data: true,
            parts,
        }
    }

    struct MockSource {
        calibration_blob: Vec<u8>,
        profile: SensorProfile,
        metadata: AcquisitionMetadata,
        buffers: VecDeque<MultipartBuffer>,
        buffers_requested: usize,
    }

    impl MockSource {
        fn new(blob: Vec<u8>, profile: SensorProfile, width: u32, height: u32) -> Self {
            Self {
                calibration_blob: blob,
                profile,
                metadata: AcquisitionMetadata::full_sensor(width, height),
                buffers: VecDeque::new(),
                buffers_requested: 0,
            }
        }

        fn queue(&mut self, buffer: MultipartBuffer) {
            self.buffers.push_back(buffer);
        }
    }

    impl FrameSource for MockSource {
        fn apply_settings(&mut self, _settings: &DeviceSettings) -> Result<()> {
            Ok(())
        }

        fn sensor_profile(&self) -> SensorProfile {
            self.profile
        }

        fn acquisition_metadata(&self) -> AcquisitionMetadata {
            self.metadata
        }

        fn read_calibration_blob(&mut self) -> Result<Vec<u8>> {
            Ok(self.calibration_blob.clone())
        }

        fn next_buffer(&mut self, _timeout: Duration) -> Result<MultipartBuffer> {
            self.buffers_requested += 1;
            self.buffers.pop_front().ok_or(PipelineError::Timeout)
        }

        fn stop(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn test_profile() -> SensorProfile {
        SensorProfile {
            depth_scale: 0.5,
            depth_axis_min: 0.0,
            depth_axis_max: 1000.0,
        }
    }

    #[test]
    fn flat_frame_produces_full_cloud_at_converted_depth() {
        // 4x4 of code 500 at 0.5 mm/code is 250 mm everywhere; the sensor
        // interval [0, 1000] keeps every pixel valid.
        let pipeline = FramePipeline::new(identity_calibration(4, 4), test_profile(), None);
        let buffer = complete_buffer(0, vec![depth_part(4, 4, 500), intensity_part(4, 4, 42)]);
        let metadata = AcquisitionMetadata::full_sensor(4, 4);

        let products = pipeline.process_frame(&buffer, &metadata).unwrap();

        assert_eq!(products.depth.region().valid_count(), 16);
        assert!(products.depth.data().iter().all(|&d| d == 250.0));
        assert_eq!(products.cloud.len(), 16);
        assert!(products.cloud.points().iter().all(|p| p.intensity == 42));
        assert!(
            products
                .cloud
                .points()
                .iter()
                .all(|p| (p.z - 250.0).abs() < 1e-3)
        );
    }

    #[test]
    fn distance_filter_containing_depth_keeps_all_pixels() {
        let pipeline = FramePipeline::new(
            identity_calibration(4, 4),
            test_profile(),
            Some(Interval::new(100.0, 1000.0)),
        );
        let buffer = complete_buffer(0, vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)]);
        let metadata = AcquisitionMetadata::full_sensor(4, 4);

        let products = pipeline.process_frame(&buffer, &metadata).unwrap();

        assert_eq!(products.depth.region().valid_count(), 16);
        assert_eq!(products.cloud.len(), 16);
    }

    #[test]
    fn distance_filter_excluding_depth_empties_the_cloud() {
        let pipeline = FramePipeline::new(
            identity_calibration(4, 4),
            test_profile(),
            Some(Interval::new(300.0, 1000.0)),
        );
        let buffer = complete_buffer(0, vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)]);
        let metadata = AcquisitionMetadata::full_sensor(4, 4);

        let products = pipeline.process_frame(&buffer, &metadata).unwrap();

        // Values survive in the raster; only validity changes.
        assert!(products.depth.data().iter().any(|&d| d == 250.0));
        assert_eq!(products.depth.region().valid_count(), 0);
        assert!(products.cloud.is_empty());
    }

    #[test]
    fn missing_intensity_part_fails_without_partial_products() {
        let pipeline = FramePipeline::new(identity_calibration(4, 4), test_profile(), None);
        let buffer = complete_buffer(0, vec![depth_part(4, 4, 500)]);
        let metadata = AcquisitionMetadata::full_sensor(4, 4);

        let err = pipeline.process_frame(&buffer, &metadata).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::MissingPart(BufferPartKind::Image2d)
        ));
        assert!(err.is_frame_recoverable());
    }

    #[test]
    fn mismatched_part_geometry_is_fatal() {
        let pipeline = FramePipeline::new(identity_calibration(4, 4), test_profile(), None);
        let buffer = complete_buffer(0, vec![depth_part(4, 4, 500), intensity_part(2, 8, 1)]);
        let metadata = AcquisitionMetadata::full_sensor(4, 4);

        let err = pipeline.process_frame(&buffer, &metadata).unwrap_err();

        assert!(matches!(err, PipelineError::GeometryMismatch(_)));
        assert!(!err.is_frame_recoverable());
    }

    #[test]
    fn session_aborts_on_empty_calibration_blob_before_any_frame() {
        let mut source = MockSource::new(Vec::new(), test_profile(), 4, 4);
        source.queue(complete_buffer(
            0,
            vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)],
        ));
        let out_dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .frame_count(1)
            .output_dir(out_dir.path().to_path_buf())
            .build();

        let result = run_session(&mut source, &config);

        assert!(matches!(result, Err(PipelineError::Calibration(_))));
        assert_eq!(source.buffers_requested, 0);
    }

    #[test]
    fn session_skips_incomplete_and_stale_buffers() {
        let blob = identity_calibration(4, 4).to_blob();
        let mut source = MockSource::new(blob, test_profile(), 4, 4);

        let mut incomplete = complete_buffer(
            0,
            vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)],
        );
        incomplete.incomplete = true;
        source.queue(incomplete);

        let mut stale = complete_buffer(
            1,
            vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)],
        );
        stale.has_new_data = false;
        source.queue(stale);

        source.queue(complete_buffer(
            2,
            vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)],
        ));

        let out_dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .frame_count(3)
            .distance_filter(None)
            .output_dir(out_dir.path().to_path_buf())
            .build();

        let summary = run_session(&mut source, &config).unwrap();

        assert_eq!(summary.frames_skipped, 2);
        assert_eq!(summary.frames_processed, 1);
    }

    #[test]
    fn session_skips_frames_with_missing_parts_and_continues() {
        let blob = identity_calibration(4, 4).to_blob();
        let mut source = MockSource::new(blob, test_profile(), 4, 4);
        source.queue(complete_buffer(0, vec![depth_part(4, 4, 500)]));
        source.queue(complete_buffer(
            1,
            vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)],
        ));

        let out_dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .frame_count(2)
            .distance_filter(None)
            .output_dir(out_dir.path().to_path_buf())
            .build();

        let summary = run_session(&mut source, &config).unwrap();

        assert_eq!(summary.frames_skipped, 1);
        assert_eq!(summary.frames_processed, 1);
    }

    #[test]
    fn session_writes_three_artifacts_per_processed_frame() {
        let blob = identity_calibration(8, 8).to_blob();
        let mut source = MockSource::new(blob, test_profile(), 8, 8);
        for frame in 0..2 {
            source.queue(complete_buffer(
                frame,
                vec![depth_part(8, 8, 600), intensity_part(8, 8, 7)],
            ));
        }

        let out_dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .frame_count(2)
            .distance_filter(None)
            .output_dir(out_dir.path().to_path_buf())
            .build();

        let summary = run_session(&mut source, &config).unwrap();

        assert_eq!(summary.frames_processed, 2);
        assert_eq!(summary.artifacts_written, 6);
        for frame in 0..2 {
            for name in [
                format!("undistorted_depth_map_{frame}.tiff"),
                format!("undistorted_intensity_image_{frame}.png"),
                format!("point_cloud_xyzi_{frame}.las"),
            ] {
                let path = out_dir.path().join(name);
                assert!(path.exists(), "missing artifact {}", path.display());
                assert!(path.metadata().unwrap().len() > 0);
            }
        }
    }

    struct FailingDepthWriter;

    impl DepthMapWriter for FailingDepthWriter {
        fn write_depth_map(
            &self,
            _depth: &crate::depth_pipeline::raster::types::Raster<f32>,
            _path: &std::path::Path,
        ) -> Result<()> {
            Err(PipelineError::Export("disk full".to_string()))
        }
    }

    struct CountingIntensityWriter;

    impl IntensityImageWriter for CountingIntensityWriter {
        fn write_intensity_image(
            &self,
            _intensity: &crate::depth_pipeline::raster::types::Raster<u16>,
            _path: &std::path::Path,
        ) -> Result<()> {
            Ok(())
        }
    }

    struct CountingCloudWriter;

    impl PointCloudWriter for CountingCloudWriter {
        fn write_point_cloud(
            &self,
            _cloud: &crate::depth_pipeline::cloud::types::PointCloud,
            _path: &std::path::Path,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn export_failure_of_one_artifact_does_not_block_the_others() {
        let pipeline = FramePipeline::new(identity_calibration(4, 4), test_profile(), None);
        let buffer = complete_buffer(0, vec![depth_part(4, 4, 500), intensity_part(4, 4, 1)]);
        let metadata = AcquisitionMetadata::full_sensor(4, 4);
        let products = pipeline.process_frame(&buffer, &metadata).unwrap();

        let exporter = FrameExporter::with_custom(
            std::path::PathBuf::from("/nonexistent-is-fine-writers-ignore-it"),
            FailingDepthWriter,
            CountingIntensityWriter,
            CountingCloudWriter,
        );

        let written =
            exporter.export_frame(&products.depth, &products.intensity, &products.cloud, 0);

        assert_eq!(written, 2);
    }
}
