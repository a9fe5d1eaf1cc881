//! `.time` frame timing file reader

use std::path::Path;

use contracts::{ContractError, FrameSeries, FrameTime, FrameTimeSource};
use tracing::debug;

use crate::error::{IngestionError, Result};
use crate::xml::{parse_number, read_records, RecordLayout};

const TIME_LAYOUT: RecordLayout = RecordLayout {
    container: "TimeParams",
    record: "LineParam",
    fields: &["FrameNum", "UTC"],
};

/// Reads `<TimeParams><LineParam>` records into a [`FrameSeries`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeXmlReader;

impl TimeXmlReader {
    pub fn new() -> Self {
        Self
    }
}

impl FrameTimeSource for TimeXmlReader {
    fn name(&self) -> &str {
        "time_xml"
    }

    fn read(&self, path: &Path) -> std::result::Result<FrameSeries, ContractError> {
        let source_name = path.display().to_string();
        let xml = std::fs::read_to_string(path).map_err(|source| IngestionError::Read {
            path: source_name.clone(),
            source,
        })?;
        Ok(parse_time_str(&xml, &source_name)?)
    }
}

/// Parse frame timing XML held in memory
pub fn parse_time_str(xml: &str, source_name: &str) -> Result<FrameSeries> {
    let raw = read_records(xml, source_name, &TIME_LAYOUT)?;

    let frames = raw
        .iter()
        .enumerate()
        .map(|(i, fields)| -> Result<FrameTime> {
            let frame_index = parse_number::<i64>(&fields[0], source_name, i, "FrameNum")?;
            let timestamp = parse_number::<f64>(&fields[1], source_name, i, "UTC")?;
            Ok(FrameTime::new(frame_index, timestamp))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(source = source_name, frames = frames.len(), "frame time file parsed");
    metrics::counter!("ingest_records_total", "kind" => "frame_time")
        .increment(frames.len() as u64);
    Ok(FrameSeries::new(frames))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ClockInfo>
  <TimeParams>
    <LineParam><FrameNum>1</FrameNum><UTC>1498867560.2</UTC></LineParam>
    <LineParam><FrameNum>2</FrameNum><UTC>1498867560.3</UTC></LineParam>
    <LineParam><UTC>1498867560.4</UTC><FrameNum>3</FrameNum></LineParam>
  </TimeParams>
</ClockInfo>"#;

    #[test]
    fn parses_frames_in_file_order() {
        let frames = parse_time_str(SAMPLE, "sample.time").unwrap();
        let indices: Vec<i64> = frames.iter().map(|f| f.frame_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(frames.frames()[2].timestamp, 1498867560.4);
    }

    #[test]
    fn fractional_frame_number_is_rejected() {
        let xml = SAMPLE.replace("<FrameNum>2</FrameNum>", "<FrameNum>2.5</FrameNum>");
        match parse_time_str(&xml, "bad.time") {
            Err(IngestionError::InvalidNumber { record, field, .. }) => {
                assert_eq!(record, 1);
                assert_eq!(field, "FrameNum");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_container_is_reported() {
        let xml = SAMPLE.replace("TimeParams", "Params");
        let err = parse_time_str(&xml, "x.time").unwrap_err();
        assert!(matches!(
            err,
            IngestionError::MissingElement {
                element: "TimeParams",
                ..
            }
        ));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass.time");
        std::fs::write(&path, SAMPLE).unwrap();
        let frames = TimeXmlReader::new().read(&path).unwrap();
        assert_eq!(frames.len(), 3);
    }
}
