//! Acquisition session loop.

use std::time::Duration;

use tracing::{error, info, instrument, warn};

use crate::depth_pipeline::acquisition::{DeviceSettings, FrameSource};
use crate::depth_pipeline::calibration::types::CalibrationParameters;
use crate::depth_pipeline::common::error::Result;
use crate::depth_pipeline::conversions::config::PipelineConfig;
use crate::depth_pipeline::conversions::frame_pipeline::FramePipeline;
use crate::depth_pipeline::export::FrameExporter;

/// How long to wait for each finished buffer.
const BUFFER_TIMEOUT: Duration = Duration::from_secs(5);

/// Counters reported at the end of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_processed: usize,
    pub frames_skipped: usize,
    pub artifacts_written: usize,
}

/// Acquire and process `config.frame_count` buffers from `source`.
///
/// Calibration is read and parsed once up front; a parse failure aborts the
/// session before any frame is touched. Per frame, incomplete or stale
/// buffers and recoverable pipeline errors (a missing buffer part) are
/// logged and skipped; anything else aborts. Export failures never abort,
/// they only reduce the artifact count.
#[instrument(skip(source, config), fields(frames = config.frame_count))]
pub fn run_session<S: FrameSource>(
    source: &mut S,
    config: &PipelineConfig,
) -> Result<SessionSummary> {
    source.apply_settings(&DeviceSettings {
        exposure_time_us: config.exposure_time_us,
        confidence_threshold: config.confidence_threshold,
    })?;

    let blob = source.read_calibration_blob()?;
    let calibration = CalibrationParameters::from_blob(&blob)?;
    let profile = source.sensor_profile();
    let metadata = source.acquisition_metadata();

    info!(
        depth_scale = profile.depth_scale,
        axis_min = profile.depth_axis_min,
        axis_max = profile.depth_axis_max,
        "Session configured"
    );

    let pipeline = FramePipeline::new(calibration, profile, config.distance_filter);
    let exporter = FrameExporter::new(config.output_dir.clone());
    let mut summary = SessionSummary::default();

    for index in 0..config.frame_count {
        let buffer = source.next_buffer(BUFFER_TIMEOUT)?;

        if buffer.incomplete {
            warn!(frame = index, "Incomplete buffer, skipping");
            summary.frames_skipped += 1;
            continue;
        }
        if !buffer.has_new_data {
            warn!(frame = index, "Buffer has no new data, skipping");
            summary.frames_skipped += 1;
            continue;
        }

        let products = match pipeline.process_frame(&buffer, &metadata) {
            Ok(products) => products,
            Err(e) if e.is_frame_recoverable() => {
                warn!(frame = index, "Skipping frame: {e}");
                summary.frames_skipped += 1;
                continue;
            }
            Err(e) => {
                error!(frame = index, "Aborting session: {e}");
                return Err(e);
            }
        };

        summary.artifacts_written +=
            exporter.export_frame(&products.depth, &products.intensity, &products.cloud, index);
        summary.frames_processed += 1;
    }

    source.stop()?;

    info!(
        processed = summary.frames_processed,
        skipped = summary.frames_skipped,
        artifacts = summary.artifacts_written,
        "Session finished"
    );

    Ok(summary)
}
