//! Pipeline statistics.

use std::time::Duration;

use dispatcher::SinkOutcome;
use observability::SyncMetricsSummary;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Wall time from input read to last sink closed
    pub duration: Duration,

    /// Resample summary
    pub summary: SyncMetricsSummary,

    /// Per-sink results
    pub sinks: Vec<SinkOutcome>,
}

impl PipelineStats {
    pub fn failed_sinks(&self) -> impl Iterator<Item = &SinkOutcome> {
        self.sinks.iter().filter(|s| !s.is_success())
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!();
        print!("{}", self.summary);
        println!("Duration: {:.3}s", self.duration.as_secs_f64());

        println!("\nSinks ({}):", self.sinks.len());
        for sink in &self.sinks {
            if sink.is_success() {
                println!(
                    "  ├─ {}: ok ({} records)",
                    sink.name, sink.metrics.records_written
                );
            } else {
                println!("  ├─ {}: FAILED", sink.name);
                for error in &sink.errors {
                    println!("  │    {}", error);
                }
            }
        }
        println!();
    }
}
