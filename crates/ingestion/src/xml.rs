//! Streaming extraction of flat record lists from XML.
//!
//! Both input formats share one shape: a container element holding repeated
//! record elements, each with a few text-only fields. Only the first
//! container in the document is read; records may sit at any depth inside it.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{IngestionError, Result};

/// Where to find records and which fields to pull out of each
pub(crate) struct RecordLayout {
    pub container: &'static str,
    pub record: &'static str,
    pub fields: &'static [&'static str],
}

/// Raw field text per record, in `fields` order
pub(crate) type RawRecord = Vec<String>;

enum State {
    Outside,
    InContainer,
    InRecord(Vec<Option<String>>),
    InField(Vec<Option<String>>, usize, String),
}

pub(crate) fn read_records(
    xml: &str,
    source_name: &str,
    layout: &RecordLayout,
) -> Result<Vec<RawRecord>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let xml_err = |message: String| IngestionError::Xml {
        source_name: source_name.to_string(),
        message,
    };

    let mut records = Vec::new();
    let mut state = State::Outside;
    let mut container_seen = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_err(format!("{e} at byte {}", reader.buffer_position())))?;

        state = match (state, event) {
            (State::Outside, Event::Start(e)) if e.name().as_ref() == layout.container.as_bytes() => {
                container_seen = true;
                State::InContainer
            }
            (State::Outside, Event::Empty(e)) if e.name().as_ref() == layout.container.as_bytes() => {
                container_seen = true;
                break;
            }

            (State::InContainer, Event::Start(e)) if e.name().as_ref() == layout.record.as_bytes() => {
                State::InRecord(vec![None; layout.fields.len()])
            }
            (State::InContainer, Event::Empty(e)) if e.name().as_ref() == layout.record.as_bytes() => {
                records.push(finish_record(
                    vec![None; layout.fields.len()],
                    records.len(),
                    source_name,
                    layout,
                )?);
                State::InContainer
            }
            (State::InContainer, Event::End(e)) if e.name().as_ref() == layout.container.as_bytes() => {
                break;
            }

            (State::InRecord(fields), Event::Start(e)) => match field_slot(layout, e.name().as_ref()) {
                Some(i) if fields[i].is_none() => State::InField(fields, i, String::new()),
                _ => State::InRecord(fields),
            },
            (State::InRecord(mut fields), Event::Empty(e)) => {
                if let Some(i) = field_slot(layout, e.name().as_ref()) {
                    fields[i].get_or_insert_with(String::new);
                }
                State::InRecord(fields)
            }
            (State::InRecord(fields), Event::End(e)) if e.name().as_ref() == layout.record.as_bytes() => {
                records.push(finish_record(fields, records.len(), source_name, layout)?);
                State::InContainer
            }

            (State::InField(fields, i, mut text), Event::Text(t)) => {
                let unescaped = t.unescape().map_err(|e| xml_err(e.to_string()))?;
                text.push_str(&unescaped);
                State::InField(fields, i, text)
            }
            (State::InField(fields, i, mut text), Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c));
                State::InField(fields, i, text)
            }
            (State::InField(mut fields, i, text), Event::End(e))
                if e.name().as_ref() == layout.fields[i].as_bytes() =>
            {
                fields[i] = Some(text);
                State::InRecord(fields)
            }

            (State::Outside, Event::Eof) => break,
            (_, Event::Eof) => {
                return Err(xml_err(format!(
                    "document ends inside <{}>",
                    layout.container
                )))
            }
            (state, _) => state,
        };
    }

    if !container_seen {
        return Err(IngestionError::MissingElement {
            source_name: source_name.to_string(),
            element: layout.container,
        });
    }
    Ok(records)
}

fn field_slot(layout: &RecordLayout, name: &[u8]) -> Option<usize> {
    layout.fields.iter().position(|f| f.as_bytes() == name)
}

fn finish_record(
    fields: Vec<Option<String>>,
    record: usize,
    source_name: &str,
    layout: &RecordLayout,
) -> Result<RawRecord> {
    fields
        .into_iter()
        .zip(layout.fields)
        .map(|(value, &field)| {
            value.ok_or_else(|| IngestionError::MissingField {
                source_name: source_name.to_string(),
                record,
                field,
            })
        })
        .collect()
}

/// Parse one numeric field, naming it in the error
pub(crate) fn parse_number<T: std::str::FromStr>(
    raw: &str,
    source_name: &str,
    record: usize,
    field: &'static str,
) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| IngestionError::InvalidNumber {
            source_name: source_name.to_string(),
            record,
            field,
            value: raw.to_string(),
        })
}

/// Like [`parse_number`], but `inf` / `NaN` are rejected as invalid numbers
pub(crate) fn parse_finite(
    raw: &str,
    source_name: &str,
    record: usize,
    field: &'static str,
) -> Result<f64> {
    let value = parse_number::<f64>(raw, source_name, record, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IngestionError::InvalidNumber {
            source_name: source_name.to_string(),
            record,
            field,
            value: raw.to_string(),
        })
    }
}
