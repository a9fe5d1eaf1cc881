//! Resampler: construct → filter → evaluate.

use contracts::{
    AttitudeSeries, ContractError, FrameSeries, ResampleConfig, SyncMeta, SyncedRecord,
    SyncedTable,
};
use tracing::instrument;

use crate::filter::{filter_to_domain, FilteredFrames};
use crate::interpolant::AttitudeInterpolants;

/// Attitude resampler
///
/// Builds one interpolant per axis from the attitude stream, keeps the
/// frames inside the attitude time span and evaluates roll, pitch and yaw
/// at each kept frame. Stateless between calls.
#[derive(Debug, Clone, Default)]
pub struct Resampler {
    config: ResampleConfig,
}

impl Resampler {
    pub fn new(config: ResampleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResampleConfig {
        &self.config
    }

    /// Stage 1: fit the per-axis interpolants
    ///
    /// # Errors
    /// `InsufficientData` or `NonMonotonicTime`; nothing is evaluated.
    #[instrument(
        level = "debug",
        name = "resample_construct",
        skip(self, attitude),
        fields(method = %self.config.method, samples = attitude.len())
    )]
    pub fn build_interpolants(
        &self,
        attitude: &AttitudeSeries,
    ) -> Result<AttitudeInterpolants, ContractError> {
        AttitudeInterpolants::build(attitude, &self.config)
    }

    /// Estimate roll, pitch and yaw at every frame inside the attitude span.
    ///
    /// Frames outside `[t_min, t_max]` are dropped, never extrapolated. An
    /// empty result is a success; check [`SyncedTable::retention`].
    ///
    /// # Errors
    /// Fatal precondition failures from [`Resampler::build_interpolants`].
    #[instrument(
        level = "info",
        name = "resample",
        skip(self, attitude, frames),
        fields(method = %self.config.method, samples = attitude.len(), frames = frames.len())
    )]
    pub fn synchronize(
        &self,
        attitude: &AttitudeSeries,
        frames: &FrameSeries,
    ) -> Result<SyncedTable, ContractError> {
        let interpolants = self.build_interpolants(attitude)?;
        let domain = interpolants.domain();

        let filtered = filter_to_domain(frames, domain);
        self.report_filter(&filtered, frames.len());

        let records: Vec<SyncedRecord> = filtered
            .retained
            .iter()
            .map(|frame| {
                let [roll, pitch, yaw] = interpolants.evaluate(frame.timestamp);
                SyncedRecord {
                    frame_index: frame.frame_index,
                    timestamp: frame.timestamp,
                    roll,
                    pitch,
                    yaw,
                }
            })
            .collect();

        let meta = SyncMeta {
            method: interpolants.method(),
            domain,
            attitude_samples: attitude.len(),
            total_frames: frames.len(),
            retained: records.len(),
            dropped_before: filtered.dropped_before,
            dropped_after: filtered.dropped_after,
        };

        tracing::debug!(retained = meta.retained, dropped = meta.dropped(), "resample complete");
        Ok(SyncedTable::new(records, meta))
    }

    fn report_filter(&self, filtered: &FilteredFrames, total: usize) {
        metrics::counter!("resample_frames_total", "status" => "retained")
            .increment(filtered.retained.len() as u64);
        metrics::counter!("resample_frames_total", "status" => "dropped_before")
            .increment(filtered.dropped_before as u64);
        metrics::counter!("resample_frames_total", "status" => "dropped_after")
            .increment(filtered.dropped_after as u64);

        if filtered.dropped() > 0 {
            tracing::warn!(
                dropped_before = filtered.dropped_before,
                dropped_after = filtered.dropped_after,
                total,
                "frames outside attitude time span dropped"
            );
        }
        if filtered.retained.is_empty() {
            tracing::warn!(total, "no frame falls inside the attitude time span");
        }
    }
}

/// Synchronize with the default (cubic) configuration.
pub fn synchronize(
    attitude: &AttitudeSeries,
    frames: &FrameSeries,
) -> Result<SyncedTable, ContractError> {
    Resampler::default().synchronize(attitude, frames)
}
