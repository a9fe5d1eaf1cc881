//! FrameSeries - FrameTimeSource output
//!
//! Dense frame index → timestamp table.

use serde::{Deserialize, Serialize};

/// Timestamp of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Frame number as recorded by the source
    pub frame_index: i64,

    /// Absolute time (seconds)
    pub timestamp: f64,
}

impl FrameTime {
    pub fn new(frame_index: i64, timestamp: f64) -> Self {
        Self {
            frame_index,
            timestamp,
        }
    }
}

/// Frame timing entries in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSeries {
    frames: Vec<FrameTime>,
}

impl FrameSeries {
    pub fn new(frames: Vec<FrameTime>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[FrameTime] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameTime> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn timestamps(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.timestamp).collect()
    }

    /// Smallest and largest finite timestamp
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.frames
            .iter()
            .map(|f| f.timestamp)
            .filter(|t| t.is_finite())
            .fold(None, |acc, t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }
}

impl FromIterator<FrameTime> for FrameSeries {
    fn from_iter<I: IntoIterator<Item = FrameTime>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_ignores_non_finite() {
        let frames: FrameSeries = [(1, 2.0), (2, f64::NAN), (3, -1.0)]
            .into_iter()
            .map(|(i, t)| FrameTime::new(i, t))
            .collect();
        assert_eq!(frames.time_range(), Some((-1.0, 2.0)));
        assert_eq!(FrameSeries::default().time_range(), None);
    }
}
