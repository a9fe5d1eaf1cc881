//! AttitudeSeries - AttitudeSource output
//!
//! Sparse, irregularly timed orientation samples for one platform pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Angular axis of an attitude sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Roll,
    Pitch,
    Yaw,
}

impl Axis {
    /// All axes in output column order
    pub const ALL: [Axis; 3] = [Axis::Roll, Axis::Pitch, Axis::Yaw];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Axis::Roll => "roll",
            Axis::Pitch => "pitch",
            Axis::Yaw => "yaw",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attitude observation (angles in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeSample {
    /// Absolute time (seconds)
    pub timestamp: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl AttitudeSample {
    pub fn new(timestamp: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            timestamp,
            roll,
            pitch,
            yaw,
        }
    }

    /// Value of a single axis
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
        }
    }
}

/// Closed time interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeDomain {
    pub start: f64,
    pub end: f64,
}

/// Where a timestamp falls relative to a [`TimeDomain`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainPosition {
    Before,
    Inside,
    After,
}

impl TimeDomain {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends; NaN is never contained
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Classify a timestamp. NaN counts as `After` so it is always dropped.
    pub fn position(&self, t: f64) -> DomainPosition {
        if t < self.start {
            DomainPosition::Before
        } else if self.contains(t) {
            DomainPosition::Inside
        } else {
            DomainPosition::After
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for TimeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Chronologically ordered attitude samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttitudeSeries {
    samples: Vec<AttitudeSample>,
}

impl AttitudeSeries {
    pub fn new(samples: Vec<AttitudeSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[AttitudeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamp, the valid interpolation domain
    pub fn time_domain(&self) -> Option<TimeDomain> {
        let first = self.samples.first()?;
        let last = self.samples.last()?;
        Some(TimeDomain::new(first.timestamp, last.timestamp))
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    pub fn axis_values(&self, axis: Axis) -> Vec<f64> {
        self.samples.iter().map(|s| s.axis(axis)).collect()
    }

    /// Check that timestamps are finite and strictly increasing
    ///
    /// # Errors
    /// `NonMonotonicTime` naming the first offending sample
    pub fn validate_monotonic(&self) -> Result<(), ContractError> {
        if let Some(first) = self.samples.first() {
            if !first.timestamp.is_finite() {
                return Err(ContractError::NonMonotonicTime {
                    index: 0,
                    previous: f64::NEG_INFINITY,
                    current: first.timestamp,
                });
            }
        }

        for (index, pair) in self.samples.windows(2).enumerate() {
            let (previous, current) = (pair[0].timestamp, pair[1].timestamp);
            // `previous` is finite here, so this also rejects NaN
            if current <= previous || !current.is_finite() {
                return Err(ContractError::NonMonotonicTime {
                    index: index + 1,
                    previous,
                    current,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<AttitudeSample> for AttitudeSeries {
    fn from_iter<I: IntoIterator<Item = AttitudeSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
