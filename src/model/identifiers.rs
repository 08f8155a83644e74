//! Index newtypes identifying tracks and intervals.
//!
//! Intervals are addressed by `(track, position)` into the owning track's
//! immutable sequence rather than by reference, so a layout pass never aliases
//! the data it reads.

use serde::Serialize;
use std::fmt;

/// Index of a track within the sheet. 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct TrackIndex(usize);

impl TrackIndex {
    /// Create a new TrackIndex from a raw 0-based value.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw 0-based index value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for TrackIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for TrackIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one interval: its track plus its position in that track's
/// onset-sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IntervalId {
    /// Owning track.
    pub track: TrackIndex,
    /// 0-based position within the track.
    pub position: usize,
}

impl IntervalId {
    /// Create a new interval id.
    pub fn new(track: TrackIndex, position: usize) -> Self {
        Self { track, position }
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.track, self.position)
    }
}
