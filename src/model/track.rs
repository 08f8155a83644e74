//! Track - one annotation variable's onset-ordered sequence of intervals.

use super::error::LayoutError;
use super::identifiers::{IntervalId, TrackIndex};
use super::interval::{is_valid_tick, Interval};

/// Onset-sorted sequence of intervals belonging to one track.
///
/// # Invariants
/// - Every interval is owned by `index`
/// - Onsets are non-decreasing; equal onsets keep insertion order
///
/// Layout engines only read tracks. Computed geometry lives in
/// [`LayoutResult`](crate::layout::LayoutResult), keyed by [`IntervalId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    index: TrackIndex,
    intervals: Vec<Interval>,
}

impl Track {
    /// Create an empty track.
    pub fn empty(index: TrackIndex) -> Self {
        Self {
            index,
            intervals: Vec::new(),
        }
    }

    /// Smart constructor: validates ownership and onset order.
    ///
    /// The input is never re-sorted; an out-of-order sequence is rejected.
    pub fn new(index: TrackIndex, intervals: Vec<Interval>) -> Result<Self, LayoutError> {
        let track = Self { index, intervals };
        track.validate()?;
        Ok(track)
    }

    /// Check the track invariants.
    ///
    /// # Errors
    /// - [`LayoutError::TrackMismatch`] if an interval names another owner
    /// - [`LayoutError::TickOutOfRange`] if a tick lies outside
    ///   [`MIN_TICK`](super::MIN_TICK)..=[`MAX_TICK`](super::MAX_TICK)
    /// - [`LayoutError::UnsortedTrack`] if an onset decreases
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut previous: Option<&Interval> = None;
        for (position, interval) in self.intervals.iter().enumerate() {
            if interval.track() != self.index {
                return Err(LayoutError::TrackMismatch {
                    track: self.index,
                    position,
                    owner: interval.track(),
                });
            }
            if let Some(tick) = [interval.onset(), interval.offset()]
                .into_iter()
                .find(|&tick| !is_valid_tick(tick))
            {
                return Err(LayoutError::TickOutOfRange {
                    track: self.index,
                    position,
                    tick,
                });
            }
            if let Some(prev) = previous {
                if interval.onset() < prev.onset() {
                    return Err(LayoutError::UnsortedTrack {
                        track: self.index,
                        position,
                        onset: interval.onset(),
                        previous_onset: prev.onset(),
                    });
                }
            }
            previous = Some(interval);
        }
        Ok(())
    }

    /// Index of this track.
    pub fn index(&self) -> TrackIndex {
        self.index
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True if the track holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval at `position`, if any.
    pub fn get(&self, position: usize) -> Option<&Interval> {
        self.intervals.get(position)
    }

    /// First interval by onset.
    pub fn first(&self) -> Option<&Interval> {
        self.intervals.first()
    }

    /// Last interval by onset.
    pub fn last(&self) -> Option<&Interval> {
        self.intervals.last()
    }

    /// All intervals in onset order.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Iterate `(id, interval)` pairs in onset order.
    pub fn iter(&self) -> impl Iterator<Item = (IntervalId, &Interval)> + '_ {
        let index = self.index;
        self.intervals
            .iter()
            .enumerate()
            .map(move |(position, interval)| (IntervalId::new(index, position), interval))
    }

    /// Onset of the last interval.
    pub fn max_onset(&self) -> Option<i64> {
        self.last().map(Interval::onset)
    }

    /// Largest offset of any interval in the track.
    ///
    /// Not necessarily the last interval's offset: an earlier interval may
    /// extend past later ones.
    pub fn max_offset(&self) -> Option<i64> {
        self.intervals.iter().map(Interval::offset).max()
    }

    /// Insert an interval, keeping onset order.
    ///
    /// An interval whose onset equals existing onsets goes after them, so ties
    /// keep insertion order. Returns the position it was placed at.
    ///
    /// # Errors
    /// Returns [`LayoutError::TrackMismatch`] if the interval belongs to another track.
    pub fn insert(&mut self, interval: Interval) -> Result<usize, LayoutError> {
        if interval.track() != self.index {
            return Err(LayoutError::TrackMismatch {
                track: self.index,
                position: self.intervals.len(),
                owner: interval.track(),
            });
        }
        let position = self
            .intervals
            .partition_point(|existing| existing.onset() <= interval.onset());
        self.intervals.insert(position, interval);
        Ok(position)
    }

    /// Remove and return the interval at `position`.
    pub fn remove(&mut self, position: usize) -> Option<Interval> {
        if position < self.intervals.len() {
            Some(self.intervals.remove(position))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(onset: i64, offset: i64) -> Interval {
        Interval::new(onset, offset, TrackIndex::new(0)).unwrap()
    }

    #[test]
    fn new_accepts_sorted_intervals_with_ties() {
        let track = Track::new(TrackIndex::new(0), vec![cell(0, 10), cell(0, 5), cell(20, 30)]);
        assert!(track.is_ok());
    }

    #[test]
    fn new_rejects_unsorted_intervals() {
        let err = Track::new(TrackIndex::new(0), vec![cell(50, 60), cell(10, 20)]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnsortedTrack {
                track: TrackIndex::new(0),
                position: 1,
                onset: 10,
                previous_onset: 50,
            }
        );
    }

    #[test]
    fn new_rejects_foreign_interval() {
        let foreign = Interval::new(0, 1, TrackIndex::new(3)).unwrap();
        let err = Track::new(TrackIndex::new(0), vec![foreign]).unwrap_err();
        assert!(matches!(err, LayoutError::TrackMismatch { position: 0, .. }));
    }

    #[test]
    fn validate_rejects_extreme_ticks() {
        let owner = TrackIndex::new(0);
        let extreme = Interval::new(0, i64::MAX, owner).unwrap();
        let err = Track::new(owner, vec![cell(-10, 0), extreme]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TickOutOfRange {
                track: owner,
                position: 1,
                tick: i64::MAX,
            }
        );
    }

    #[test]
    fn max_onset_reads_last_element() {
        let track = Track::new(TrackIndex::new(0), vec![cell(0, 500), cell(10, 20)]).unwrap();
        assert_eq!(track.max_onset(), Some(10));
        assert_eq!(track.max_offset(), Some(500));
    }

    #[test]
    fn max_onset_of_empty_track_is_none() {
        let track = Track::empty(TrackIndex::new(0));
        assert_eq!(track.max_onset(), None);
        assert_eq!(track.max_offset(), None);
    }

    #[test]
    fn insert_places_ties_after_existing() {
        let mut track = Track::new(TrackIndex::new(0), vec![cell(0, 10), cell(20, 30)]).unwrap();
        let position = track.insert(cell(0, 99)).unwrap();
        assert_eq!(position, 1);
        assert_eq!(track.get(1).map(Interval::offset), Some(99));
        assert!(track.validate().is_ok());
    }

    #[test]
    fn remove_last_element_is_in_bounds() {
        let mut track = Track::new(TrackIndex::new(0), vec![cell(0, 10), cell(20, 30)]).unwrap();
        let removed = track.remove(track.len() - 1);
        assert_eq!(removed, Some(cell(20, 30)));
        assert_eq!(track.remove(5), None);
    }

    #[test]
    fn iter_yields_positional_ids() {
        let track = Track::new(TrackIndex::new(0), vec![cell(0, 10), cell(20, 30)]).unwrap();
        let ids: Vec<_> = track.iter().map(|(id, _)| id.position).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
