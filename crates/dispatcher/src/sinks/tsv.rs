//! TsvSink - writes the synchronized table as tab-separated text

use contracts::{ContractError, DataSink, SyncRun, SyncedTable};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

use super::write_atomic;

/// Column header of the table file
pub const TSV_HEADER: &str = "FrameNum\tUTC\tRoll\tPitch\tYaw";

/// Configuration for TsvSink
#[derive(Debug, Clone, PartialEq)]
pub struct TsvSinkConfig {
    /// Output file
    pub path: PathBuf,
    /// Also print each row to stdout
    pub echo: bool,
}

impl Default for TsvSinkConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("att.txt"),
            echo: false,
        }
    }
}

impl TsvSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let mut config = Self::default();
        if let Some(path) = params.get("path") {
            config.path = PathBuf::from(path);
        }
        if let Some(echo) = params.get("echo") {
            config.echo = echo
                .parse()
                .map_err(|_| format!("echo must be true or false, got '{echo}'"))?;
        }
        Ok(config)
    }
}

/// Render the header plus one line per record
pub fn format_table(table: &SyncedTable) -> String {
    let mut out = String::with_capacity(64 * (table.len() + 1));
    out.push_str(TSV_HEADER);
    out.push('\n');
    for r in &table.records {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            r.frame_index, r.timestamp, r.roll, r.pitch, r.yaw
        );
    }
    out
}

/// Sink that writes the table to one file
pub struct TsvSink {
    name: String,
    config: TsvSinkConfig,
}

impl TsvSink {
    pub fn new(name: impl Into<String>, config: TsvSinkConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, String> {
        Ok(Self::new(name, TsvSinkConfig::from_params(params)?))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.config.path
    }

    fn echo_rows(table: &SyncedTable) {
        for r in &table.records {
            println!(
                "{} {} {} {} {}",
                r.frame_index, r.timestamp, r.roll, r.pitch, r.yaw
            );
        }
    }
}

impl DataSink for TsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "tsv_sink_write",
        skip(self, run),
        fields(sink = %self.name, records = run.table.len())
    )]
    async fn write(&mut self, run: &SyncRun) -> Result<(), ContractError> {
        if self.config.echo {
            Self::echo_rows(&run.table);
        }

        let content = format_table(&run.table);
        write_atomic(&self.config.path, content.as_bytes()).map_err(|e| {
            ContractError::sink_write(
                &self.name,
                format!("cannot write {}: {e}", self.config.path.display()),
            )
        })?;

        debug!(
            sink = %self.name,
            path = %self.config.path.display(),
            bytes = content.len(),
            "table written"
        );
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, path = %self.config.path.display(), "TsvSink closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::tests::sample_run;

    #[test]
    fn test_config_from_params() {
        let mut params = HashMap::new();
        assert_eq!(
            TsvSinkConfig::from_params(&params).unwrap(),
            TsvSinkConfig::default()
        );

        params.insert("path".to_string(), "out/table.txt".to_string());
        params.insert("echo".to_string(), "true".to_string());
        let config = TsvSinkConfig::from_params(&params).unwrap();
        assert_eq!(config.path, PathBuf::from("out/table.txt"));
        assert!(config.echo);

        params.insert("echo".to_string(), "loud".to_string());
        assert!(TsvSinkConfig::from_params(&params).is_err());
    }

    #[test]
    fn test_format_table_layout() {
        let run = sample_run(3);
        let text = format_table(&run.table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], TSV_HEADER);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "2\t1.5\t15\t7.5\t-7.5");
        assert!(lines.iter().all(|l| l.split('\t').count() == 5));
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let run = sample_run(0);
        assert_eq!(format_table(&run.table), format!("{TSV_HEADER}\n"));
    }

    #[tokio::test]
    async fn test_tsv_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("att.txt");
        let mut sink = TsvSink::new(
            "table",
            TsvSinkConfig {
                path: path.clone(),
                echo: false,
            },
        );

        let run = sample_run(2);
        sink.write(&run).await.unwrap();
        sink.close().await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format_table(&run.table));
    }

    #[tokio::test]
    async fn test_tsv_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let mut sink = TsvSink::new(
            "table",
            TsvSinkConfig {
                path: blocker.join("att.txt"),
                echo: false,
            },
        );

        let err = sink.write(&sample_run(1)).await.unwrap_err();
        assert!(matches!(err, ContractError::SinkWrite { .. }));
    }
}
