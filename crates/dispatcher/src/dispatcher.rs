//! Dispatcher - fan-out of a completed run to every sink

use std::sync::Arc;

use tracing::{info, instrument, warn};

use contracts::{SinkConfig, SinkType, SyncRun};

use crate::error::DispatcherError;
use crate::handle::{SinkHandle, SinkOutcome, DEFAULT_QUEUE_CAPACITY};
use crate::metrics::MetricsSnapshot;
use crate::sinks::{JsonSink, LogSink, PlotSink, TsvSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
    /// Runs buffered per sink worker
    pub queue_capacity: usize,
}

impl DispatcherConfig {
    pub fn new(sinks: Vec<SinkConfig>) -> Self {
        Self {
            sinks,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config }
    }

    /// Create every sink and start its worker
    ///
    /// Must be called inside a tokio runtime.
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(sink_count = self.config.sinks.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let mut handles = Vec::with_capacity(self.config.sinks.len());
        for sink_config in &self.config.sinks {
            handles.push(create_sink_handle(sink_config, self.config.queue_capacity)?);
        }
        Ok(Dispatcher { handles })
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(
    config: &SinkConfig,
    queue_capacity: usize,
) -> Result<SinkHandle, DispatcherError> {
    let creation = |e: String| DispatcherError::sink_creation(&config.name, e);
    match config.sink_type {
        SinkType::Log => Ok(SinkHandle::spawn(LogSink::new(&config.name), queue_capacity)),
        SinkType::Tsv => {
            let sink = TsvSink::from_params(&config.name, &config.params).map_err(creation)?;
            Ok(SinkHandle::spawn(sink, queue_capacity))
        }
        SinkType::Json => {
            let sink = JsonSink::from_params(&config.name, &config.params);
            Ok(SinkHandle::spawn(sink, queue_capacity))
        }
        SinkType::Plot => {
            let sink = PlotSink::from_params(&config.name, &config.params).map_err(creation)?;
            Ok(SinkHandle::spawn(sink, queue_capacity))
        }
    }
}

/// Per-sink results of one dispatch
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<SinkOutcome>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(SinkOutcome::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SinkOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Convert to an error naming every failed sink
    pub fn into_result(self) -> Result<Self, DispatcherError> {
        if self.is_success() {
            return Ok(self);
        }
        let message = self
            .failures()
            .map(|o| format!("{}: {}", o.name, o.errors.join("; ")))
            .collect::<Vec<_>>()
            .join(" | ");
        Err(DispatcherError::Contract(contracts::ContractError::sink_write(
            "dispatcher",
            message,
        )))
    }
}

/// Fans one run out to all sinks
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>) -> Self {
        Self { handles }
    }

    pub fn sink_count(&self) -> usize {
        self.handles.len()
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Hand `run` to every sink, then shut the workers down and collect results.
    ///
    /// Every sink sees the same read-only run; one failing sink does not stop
    /// the others.
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, run),
        fields(sinks = self.handles.len(), records = run.table.len())
    )]
    pub async fn dispatch(self, run: SyncRun) -> DispatchReport {
        let run = Arc::new(run);
        let mut closed = Vec::new();

        for handle in &self.handles {
            if let Err(e) = handle.send(Arc::clone(&run)).await {
                warn!(sink = %handle.name(), error = %e, "run not delivered");
                closed.push((handle.name().to_string(), e.to_string()));
            }
        }

        let mut outcomes = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            let mut outcome = handle.shutdown().await;
            if let Some((_, e)) = closed.iter().find(|(name, _)| *name == outcome.name) {
                outcome.errors.insert(0, e.clone());
            }
            outcomes.push(outcome);
        }

        let report = DispatchReport { outcomes };
        info!(
            sinks = report.outcomes.len(),
            failed = report.failures().count(),
            "Dispatch complete"
        );
        report
    }
}

/// Convenience function to create a dispatcher from sink configs
pub fn create_dispatcher(sink_configs: Vec<SinkConfig>) -> Result<Dispatcher, DispatcherError> {
    DispatcherBuilder::new(DispatcherConfig::new(sink_configs)).build()
}
