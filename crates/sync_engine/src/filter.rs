//! Domain filter: keeps frames whose timestamp lies inside the attitude span.

use contracts::{DomainPosition, FrameSeries, FrameTime, TimeDomain};

/// Filter result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredFrames {
    /// Frames inside the domain, in original order
    pub retained: Vec<FrameTime>,
    pub dropped_before: usize,
    /// Includes frames with a non-finite timestamp
    pub dropped_after: usize,
}

impl FilteredFrames {
    pub fn dropped(&self) -> usize {
        self.dropped_before + self.dropped_after
    }
}

/// Keep frames with `domain.start <= t <= domain.end`.
pub fn filter_to_domain(frames: &FrameSeries, domain: TimeDomain) -> FilteredFrames {
    let mut out = FilteredFrames {
        retained: Vec::with_capacity(frames.len()),
        ..Default::default()
    };

    for frame in frames.iter() {
        match domain.position(frame.timestamp) {
            DomainPosition::Inside => out.retained.push(*frame),
            DomainPosition::Before => out.dropped_before += 1,
            DomainPosition::After => out.dropped_after += 1,
        }
    }
    out
}
