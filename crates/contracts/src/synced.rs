//! SyncedTable - Resampler output
//!
//! Per-frame attitude table, the unit handed to sinks.

use serde::{Deserialize, Serialize};

use crate::{AttitudeSeries, Axis, InterpolationMethod, TimeDomain};

/// Estimated attitude of one retained frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncedRecord {
    pub frame_index: i64,
    pub timestamp: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl SyncedRecord {
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Roll => self.roll,
            Axis::Pitch => self.pitch,
            Axis::Yaw => self.yaw,
        }
    }
}

/// Resampling metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMeta {
    /// Interpolation method used for every axis
    pub method: InterpolationMethod,

    /// Valid interpolation domain (attitude time span)
    pub domain: TimeDomain,

    /// Number of attitude samples the interpolants were built from
    pub attitude_samples: usize,

    /// Frames offered to the filter
    pub total_frames: usize,

    /// Frames kept
    pub retained: usize,

    /// Frames earlier than the domain
    pub dropped_before: usize,

    /// Frames later than the domain (including non-finite timestamps)
    pub dropped_after: usize,
}

impl SyncMeta {
    pub fn dropped(&self) -> usize {
        self.dropped_before + self.dropped_after
    }
}

/// Whether a table carries any records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    Populated(usize),
    /// Valid, successful result with zero retained frames
    Empty,
}

/// Ordered synchronized records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedTable {
    pub records: Vec<SyncedRecord>,
    pub meta: SyncMeta,
}

impl SyncedTable {
    pub fn new(records: Vec<SyncedRecord>, meta: SyncMeta) -> Self {
        Self { records, meta }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn retention(&self) -> Retention {
        if self.records.is_empty() {
            Retention::Empty
        } else {
            Retention::Populated(self.records.len())
        }
    }

    pub fn frame_indices(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.frame_index).collect()
    }
}

/// A completed run as seen by sinks: the table plus the attitude it was built from
#[derive(Debug, Clone)]
pub struct SyncRun {
    /// Raw attitude samples (reference curve for plots)
    pub attitude: AttitudeSeries,

    pub table: SyncedTable,
}

impl SyncRun {
    pub fn new(attitude: AttitudeSeries, table: SyncedTable) -> Self {
        Self { attitude, table }
    }
}
