//! LogSink - logs a run summary via tracing

use contracts::{ContractError, DataSink, Retention, SyncRun};
use tracing::{info, instrument, warn};

/// Sink that logs table summaries
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_run_summary(&self, run: &SyncRun) {
        let meta = &run.table.meta;
        match run.table.retention() {
            Retention::Populated(records) => info!(
                sink = %self.name,
                records,
                method = %meta.method,
                domain = %meta.domain,
                dropped_before = meta.dropped_before,
                dropped_after = meta.dropped_after,
                "SyncedTable received"
            ),
            Retention::Empty => warn!(
                sink = %self.name,
                method = %meta.method,
                domain = %meta.domain,
                total_frames = meta.total_frames,
                "SyncedTable is empty: no frame inside the attitude time span"
            ),
        }
    }
}

impl DataSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, run),
        fields(sink = %self.name, records = run.table.len())
    )]
    async fn write(&mut self, run: &SyncRun) -> Result<(), ContractError> {
        self.log_run_summary(run);
        Ok(())
    }

    #[instrument(name = "log_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::tests::sample_run;

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        assert!(sink.write(&sample_run(3)).await.is_ok());
        assert!(sink.write(&sample_run(0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
