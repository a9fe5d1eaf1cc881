//! `.att` attitude file reader

use std::path::Path;

use contracts::{AttitudeSample, AttitudeSeries, AttitudeSource, ContractError};
use tracing::debug;

use crate::error::{IngestionError, Result};
use crate::xml::{parse_finite, read_records, RecordLayout};

const ATT_LAYOUT: RecordLayout = RecordLayout {
    container: "AttitudeParameter",
    record: "AttData",
    fields: &["UTC", "Roll", "Pitch", "Yaw"],
};

/// Reads `<AttitudeParameter><AttData>` records into an [`AttitudeSeries`]
///
/// Samples are returned in file order; ordering is checked by the resampler.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttXmlReader;

impl AttXmlReader {
    pub fn new() -> Self {
        Self
    }
}

impl AttitudeSource for AttXmlReader {
    fn name(&self) -> &str {
        "att_xml"
    }

    fn read(&self, path: &Path) -> std::result::Result<AttitudeSeries, ContractError> {
        let source_name = path.display().to_string();
        let xml = std::fs::read_to_string(path).map_err(|source| IngestionError::Read {
            path: source_name.clone(),
            source,
        })?;
        Ok(parse_att_str(&xml, &source_name)?)
    }
}

/// Parse attitude XML held in memory
pub fn parse_att_str(xml: &str, source_name: &str) -> Result<AttitudeSeries> {
    let raw = read_records(xml, source_name, &ATT_LAYOUT)?;

    let samples = raw
        .iter()
        .enumerate()
        .map(|(i, fields)| -> Result<AttitudeSample> {
            let num =
                |slot: usize| parse_finite(&fields[slot], source_name, i, ATT_LAYOUT.fields[slot]);
            Ok(AttitudeSample::new(num(0)?, num(1)?, num(2)?, num(3)?))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(source = source_name, samples = samples.len(), "attitude file parsed");
    metrics::counter!("ingest_records_total", "kind" => "attitude")
        .increment(samples.len() as u64);
    Ok(AttitudeSeries::new(samples))
}
