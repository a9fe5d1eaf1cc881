//! # Ingestion
//!
//! Input readers for the two XML files of a pass.
//!
//! Responsibilities:
//! - `.att` attitude file → `AttitudeSeries` (`AttXmlReader`)
//! - `.time` frame timing file → `FrameSeries` (`TimeXmlReader`)
//! - Report malformed records as parse errors naming file, record and field
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::{AttitudeSource, FrameTimeSource};
//! use ingestion::{AttXmlReader, TimeXmlReader};
//!
//! let attitude = AttXmlReader::new().read(Path::new("pass.att"))?;
//! let frames = TimeXmlReader::new().read(Path::new("pass.time"))?;
//! ```

mod att;
mod error;
mod time;
mod xml;

// Re-exports
pub use att::{parse_att_str, AttXmlReader};
pub use error::{IngestionError, Result};
pub use time::{parse_time_str, TimeXmlReader};
