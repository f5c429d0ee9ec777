use depthcloud_rs::depth_pipeline::{Interval, PipelineConfig, SyntheticFrameSource, run_session};
use depthcloud_rs::logger;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting depthcloud session...");

    let config = PipelineConfig::builder()
        .confidence_threshold(Some(100))
        .exposure_time_us(1000.0)
        .distance_filter(Some(Interval::new(100.0, 1000.0)))
        .frame_count(10)
        .build();

    let mut source = SyntheticFrameSource::new(640, 480);

    let summary = run_session(&mut source, &config).context("acquisition session failed")?;

    info!(
        processed = summary.frames_processed,
        skipped = summary.frames_skipped,
        artifacts = summary.artifacts_written,
        "Session complete"
    );

    Ok(())
}
