//! Interval - one annotated time span ("cell").

use super::error::InvalidInterval;
use super::identifiers::TrackIndex;
use serde::Serialize;

/// Largest tick a track may hold.
///
/// Keeps the difference of any two valid ticks representable as `i64`.
pub const MAX_TICK: i64 = i64::MAX / 2;

/// Smallest tick a track may hold.
pub const MIN_TICK: i64 = -MAX_TICK;

/// Whether `tick` lies in `[MIN_TICK, MAX_TICK]`.
pub fn is_valid_tick(tick: i64) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// An immutable time span with integer tick bounds.
///
/// # Invariants
/// - `onset <= offset` (enforced by the smart constructor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval {
    onset: i64,
    offset: i64,
    track: TrackIndex,
}

impl Interval {
    /// Smart constructor: rejects `onset > offset`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sheetline::model::{Interval, TrackIndex};
    /// let cell = Interval::new(0, 100, TrackIndex::new(0)).unwrap();
    /// assert_eq!(cell.duration(), 100);
    /// assert!(Interval::new(100, 0, TrackIndex::new(0)).is_err());
    /// ```
    pub fn new(onset: i64, offset: i64, track: TrackIndex) -> Result<Self, InvalidInterval> {
        if onset > offset {
            return Err(InvalidInterval { onset, offset });
        }
        Ok(Self {
            onset,
            offset,
            track,
        })
    }

    /// Start of the interval in ticks.
    pub fn onset(&self) -> i64 {
        self.onset
    }

    /// End of the interval in ticks.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Index of the owning track.
    pub fn track(&self) -> TrackIndex {
        self.track
    }

    /// Length in ticks (`offset - onset`), saturating at `i64::MAX`.
    pub fn duration(&self) -> i64 {
        self.offset.saturating_sub(self.onset)
    }
}
