//! JsonSink - serializes the table (records + meta) as JSON

use contracts::{ContractError, DataSink, SyncRun};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, instrument};

use super::write_atomic;

/// Sink that writes the table to a JSON file
pub struct JsonSink {
    name: String,
    path: PathBuf,
}

impl JsonSink {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Create from params map; `path` defaults to `att.json`
    pub fn from_params(name: impl Into<String>, params: &HashMap<String, String>) -> Self {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("att.json"));
        Self::new(name, path)
    }
}

impl DataSink for JsonSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_sink_write",
        skip(self, run),
        fields(sink = %self.name, records = run.table.len())
    )]
    async fn write(&mut self, run: &SyncRun) -> Result<(), ContractError> {
        let bytes = serde_json::to_vec_pretty(&run.table)
            .map_err(|e| ContractError::sink_write(&self.name, format!("serialize: {e}")))?;
        write_atomic(&self.path, &bytes).map_err(|e| {
            ContractError::sink_write(&self.name, format!("cannot write {}: {e}", self.path.display()))
        })?;
        debug!(sink = %self.name, path = %self.path.display(), "json written");
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
