//! Source traits - input stream abstraction
//!
//! Decouples the resampler from the on-disk schema of the two input streams.
//! Real XML readers and in-memory test fixtures implement the same traits.

use std::path::Path;

use crate::{AttitudeSeries, ContractError, FrameSeries};

/// Produces the attitude stream for one platform pass
///
/// # Example
///
/// ```ignore
/// let reader: Box<dyn AttitudeSource> = Box::new(AttXmlReader::new());
/// let attitude = reader.read(Path::new("pass.att"))?;
/// ```
pub trait AttitudeSource: Send + Sync {
    /// Source name (used for logging)
    fn name(&self) -> &str;

    /// Read a complete attitude series
    ///
    /// # Errors
    /// `ContractError::Parse` on malformed structure or missing fields,
    /// `ContractError::Io` if the file cannot be read
    fn read(&self, path: &Path) -> Result<AttitudeSeries, ContractError>;
}

/// Produces the frame-timing stream
pub trait FrameTimeSource: Send + Sync {
    /// Source name (used for logging)
    fn name(&self) -> &str;

    /// Read a complete frame series
    ///
    /// # Errors
    /// Same as [`AttitudeSource::read`]
    fn read(&self, path: &Path) -> Result<FrameSeries, ContractError>;
}
