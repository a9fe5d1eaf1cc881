//! SinkHandle - manages a sink with isolated queue and worker task

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use contracts::{DataSink, SyncRun};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};

/// Default number of runs buffered per sink
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Final state of one sink after shutdown
#[derive(Debug, Clone, PartialEq)]
pub struct SinkOutcome {
    pub name: String,
    /// Write, flush and close errors in the order they happened
    pub errors: Vec<String>,
    pub metrics: MetricsSnapshot,
}

impl SinkOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Handle to a running sink worker
pub struct SinkHandle {
    name: String,
    tx: mpsc::Sender<Arc<SyncRun>>,
    metrics: Arc<SinkMetrics>,
    worker_handle: JoinHandle<Vec<String>>,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task
    pub fn spawn<S: DataSink + Send + 'static>(sink: S, queue_capacity: usize) -> Self {
        let name = sink.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(SinkMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle =
            tokio::spawn(async move { sink_worker(sink, rx, worker_metrics, worker_name).await });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Hand a run to the worker, waiting for queue space
    ///
    /// Runs are never dropped; a full queue applies backpressure.
    pub async fn send(&self, run: Arc<SyncRun>) -> Result<(), DispatcherError> {
        self.tx
            .send(run)
            .await
            .map_err(|_| DispatcherError::WorkerClosed {
                sink_name: self.name.clone(),
            })?;
        self.metrics
            .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
        Ok(())
    }

    /// Close the queue, wait for the worker to drain it and report
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) -> SinkOutcome {
        drop(self.tx);
        let errors = match self.worker_handle.await {
            Ok(errors) => errors,
            Err(e) => {
                error!(sink = %self.name, error = ?e, "Worker task panicked");
                vec![format!("worker task failed: {e}")]
            }
        };
        debug!(sink = %self.name, "SinkHandle shutdown complete");
        SinkOutcome {
            name: self.name,
            errors,
            metrics: self.metrics.snapshot(),
        }
    }
}

/// Worker task that consumes runs and writes them to the sink
#[instrument(
    name = "sink_worker_loop",
    skip(sink, rx, metrics),
    fields(sink = %name)
)]
async fn sink_worker<S: DataSink>(
    mut sink: S,
    mut rx: mpsc::Receiver<Arc<SyncRun>>,
    metrics: Arc<SinkMetrics>,
    name: String,
) -> Vec<String> {
    debug!(sink = %name, "Sink worker started");
    let mut errors = Vec::new();

    while let Some(run) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        match sink.write(&run).await {
            Ok(()) => metrics.record_write(run.table.len()),
            Err(e) => {
                metrics.inc_failure_count();
                error!(sink = %name, error = %e, "Write failed");
                errors.push(e.to_string());
            }
        }
    }

    if let Err(e) = sink.flush().await {
        error!(sink = %name, error = %e, "Flush failed on shutdown");
        errors.push(e.to_string());
    }
    if let Err(e) = sink.close().await {
        error!(sink = %name, error = %e, "Close failed on shutdown");
        errors.push(e.to_string());
    }

    debug!(sink = %name, "Sink worker stopped");
    errors
}
