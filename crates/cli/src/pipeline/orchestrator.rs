//! Pipeline orchestrator - read, resample, dispatch.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{AttitudeSeries, AttitudeSource, FrameSeries, FrameTimeSource, SyncBlueprint, SyncRun};
use dispatcher::create_dispatcher;
use ingestion::{AttXmlReader, TimeXmlReader};
use observability::{record_sink_result, record_sync_metrics, SyncMetricsSummary};
use sync_engine::Resampler;
use tracing::{info, instrument};

use super::PipelineStats;
use crate::error::CliError;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Resolved run configuration (file + CLI overrides)
    pub blueprint: SyncBlueprint,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline to completion
    ///
    /// Input and resample errors abort before any sink is created, so a
    /// failed run never leaves a partial table behind.
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let blueprint = self.config.blueprint;

        for path in [&blueprint.inputs.attitude, &blueprint.inputs.frame_times] {
            if !path.exists() {
                return Err(CliError::input_not_found(path.display().to_string()).into());
            }
        }

        let stage_blueprint = blueprint.clone();
        let (attitude, table) =
            tokio::task::spawn_blocking(move || -> Result<_> {
                let (attitude, frames) = load_inputs(&stage_blueprint)?;
                let table = Resampler::new(stage_blueprint.resample.clone())
                    .synchronize(&attitude, &frames)
                    .context("Resampling failed")?;
                Ok((attitude, table))
            })
            .await
            .map_err(CliError::from)??;

        record_sync_metrics(&table.meta);
        let summary = SyncMetricsSummary::from_table(&table);

        info!(sinks = blueprint.sinks.len(), "Dispatching table");
        let dispatcher =
            create_dispatcher(blueprint.sinks.clone()).context("Failed to create sinks")?;
        let report = dispatcher.dispatch(SyncRun::new(attitude, table)).await;

        for outcome in &report.outcomes {
            record_sink_result(&outcome.name, outcome.is_success());
        }

        Ok(PipelineStats {
            duration: start_time.elapsed(),
            summary,
            sinks: report.outcomes,
        })
    }
}

/// Read both input files
#[instrument(name = "pipeline_load_inputs", skip(blueprint))]
fn load_inputs(blueprint: &SyncBlueprint) -> Result<(AttitudeSeries, FrameSeries)> {
    let att_reader = AttXmlReader::new();
    let attitude = att_reader
        .read(&blueprint.inputs.attitude)
        .with_context(|| {
            format!(
                "Failed to read attitude from {}",
                blueprint.inputs.attitude.display()
            )
        })?;

    let time_reader = TimeXmlReader::new();
    let frames = time_reader
        .read(&blueprint.inputs.frame_times)
        .with_context(|| {
            format!(
                "Failed to read frame times from {}",
                blueprint.inputs.frame_times.display()
            )
        })?;

    info!(
        attitude_samples = attitude.len(),
        frames = frames.len(),
        "Inputs loaded"
    );
    Ok((attitude, frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::RunOverrides;

    const ATT: &str = r#"<Root><AttitudeParameter>
        <AttData><UTC>0.0</UTC><Roll>0</Roll><Pitch>0</Pitch><Yaw>0</Yaw></AttData>
        <AttData><UTC>1.0</UTC><Roll>10</Roll><Pitch>5</Pitch><Yaw>-5</Yaw></AttData>
        <AttData><UTC>2.0</UTC><Roll>20</Roll><Pitch>10</Pitch><Yaw>-10</Yaw></AttData>
        <AttData><UTC>3.0</UTC><Roll>30</Roll><Pitch>15</Pitch><Yaw>-15</Yaw></AttData>
    </AttitudeParameter></Root>"#;

    const TIME: &str = r#"<Root><TimeParams>
        <LineParam><FrameNum>1</FrameNum><UTC>-0.5</UTC></LineParam>
        <LineParam><FrameNum>2</FrameNum><UTC>0.0</UTC></LineParam>
        <LineParam><FrameNum>3</FrameNum><UTC>1.5</UTC></LineParam>
        <LineParam><FrameNum>4</FrameNum><UTC>3.0</UTC></LineParam>
        <LineParam><FrameNum>5</FrameNum><UTC>3.5</UTC></LineParam>
    </TimeParams></Root>"#;

    #[tokio::test]
    async fn test_pipeline_writes_table() {
        let dir = tempfile::tempdir().unwrap();
        let att = dir.path().join("pass.att");
        let time = dir.path().join("pass.time");
        let out = dir.path().join("att.txt");
        std::fs::write(&att, ATT).unwrap();
        std::fs::write(&time, TIME).unwrap();

        let blueprint = RunOverrides {
            attitude: Some(att),
            frame_times: Some(time),
            output: Some(out.clone()),
            ..Default::default()
        }
        .into_blueprint()
        .unwrap();

        let stats = Pipeline::new(PipelineConfig { blueprint })
            .run()
            .await
            .unwrap();

        assert_eq!(stats.failed_sinks().count(), 0);
        assert_eq!(stats.summary.retained, 3);
        assert_eq!(stats.summary.dropped_before, 1);
        assert_eq!(stats.summary.dropped_after, 1);

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_pipeline_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let blueprint = RunOverrides {
            attitude: Some(dir.path().join("none.att")),
            frame_times: Some(dir.path().join("none.time")),
            output: Some(dir.path().join("att.txt")),
            ..Default::default()
        }
        .into_blueprint()
        .unwrap();

        let err = Pipeline::new(PipelineConfig { blueprint })
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
        assert!(!dir.path().join("att.txt").exists());
    }

    #[tokio::test]
    async fn test_pipeline_insufficient_data_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let att = dir.path().join("pass.att");
        let time = dir.path().join("pass.time");
        let out = dir.path().join("att.txt");
        std::fs::write(
            &att,
            r#"<Root><AttitudeParameter>
                <AttData><UTC>0.0</UTC><Roll>0</Roll><Pitch>0</Pitch><Yaw>0</Yaw></AttData>
                <AttData><UTC>1.0</UTC><Roll>1</Roll><Pitch>1</Pitch><Yaw>1</Yaw></AttData>
            </AttitudeParameter></Root>"#,
        )
        .unwrap();
        std::fs::write(&time, TIME).unwrap();

        let blueprint = RunOverrides {
            attitude: Some(att),
            frame_times: Some(time),
            output: Some(out.clone()),
            ..Default::default()
        }
        .into_blueprint()
        .unwrap();

        let result = Pipeline::new(PipelineConfig { blueprint }).run().await;
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
