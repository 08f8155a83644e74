//! Layout pass output and hit-testing

use crate::model::{IntervalId, TrackIndex};
use serde::Serialize;

/// Computed geometry of one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellGeometry {
    /// Top edge in pixels from the top of the sheet.
    pub y_top: i32,
    /// Height in pixels. Never negative.
    pub height: i32,
    /// 1-based position within the track.
    pub ordinal: usize,
    /// Rendering hint: this interval overlaps the next one in its track and
    /// was shortened to end where the next begins.
    pub overlap: bool,
}

impl CellGeometry {
    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y_top + self.height
    }

    /// True if `y` falls within `[y_top, bottom)`.
    pub fn contains(&self, y: i32) -> bool {
        self.y_top <= y && y < self.bottom()
    }
}

/// Result of hit-testing a vertical coordinate within one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestResult {
    /// Coordinate is outside every interval of the track.
    Miss,
    /// Coordinate falls inside an interval.
    Hit {
        /// The hit interval.
        id: IntervalId,
        /// Offset of the coordinate below the interval's top edge.
        offset_in_cell: i32,
    },
}

impl HitTestResult {
    /// Check if this was a hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, HitTestResult::Hit { .. })
    }

    /// Get the interval id if hit.
    pub fn interval(&self) -> Option<IntervalId> {
        match self {
            HitTestResult::Hit { id, .. } => Some(*id),
            HitTestResult::Miss => None,
        }
    }
}

/// Geometry for every interval of every track, plus the overall content height.
///
/// Indexed like the input: `tracks[t][p]` is the geometry of the interval at
/// position `p` of track `t`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LayoutResult {
    tracks: Vec<Vec<CellGeometry>>,
    content_height: i32,
}

impl LayoutResult {
    /// Zeroed geometry shaped after the given per-track interval counts.
    pub(crate) fn with_shape(lengths: impl IntoIterator<Item = usize>) -> Self {
        let tracks = lengths
            .into_iter()
            .map(|len| {
                (0..len)
                    .map(|position| CellGeometry {
                        ordinal: position + 1,
                        ..CellGeometry::default()
                    })
                    .collect()
            })
            .collect();
        Self {
            tracks,
            content_height: 0,
        }
    }

    pub(crate) fn cell_mut(&mut self, id: IntervalId) -> &mut CellGeometry {
        &mut self.tracks[id.track.get()][id.position]
    }

    pub(crate) fn set_content_height(&mut self, height: i32) {
        self.content_height = height;
    }

    /// Total sheet height: lowest bottom edge plus the bottom margin,
    /// or 0 when there is nothing to lay out.
    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    /// Geometry of one interval.
    pub fn geometry(&self, id: IntervalId) -> Option<&CellGeometry> {
        self.tracks.get(id.track.get())?.get(id.position)
    }

    /// Geometry of every interval in one track, in onset order.
    pub fn track(&self, track: TrackIndex) -> &[CellGeometry] {
        self.tracks.get(track.get()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of tracks covered.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of intervals covered.
    pub fn interval_count(&self) -> usize {
        self.tracks.iter().map(Vec::len).sum()
    }

    /// True if no interval was laid out.
    pub fn is_empty(&self) -> bool {
        self.interval_count() == 0
    }

    /// Lowest bottom edge over all intervals (0 when empty).
    pub fn max_bottom(&self) -> i32 {
        self.tracks
            .iter()
            .flatten()
            .map(CellGeometry::bottom)
            .max()
            .unwrap_or(0)
    }

    /// Iterate `(id, geometry)` over all tracks.
    pub fn iter(&self) -> impl Iterator<Item = (IntervalId, &CellGeometry)> + '_ {
        self.tracks.iter().enumerate().flat_map(|(track, cells)| {
            cells.iter().enumerate().map(move |(position, cell)| {
                (IntervalId::new(TrackIndex::new(track), position), cell)
            })
        })
    }

    /// Find the interval of `track` under vertical coordinate `y`.
    ///
    /// Cells of a track are stacked without overlap in onset order, so the
    /// candidate is found by binary search on `y_top`.
    pub fn hit_test(&self, track: TrackIndex, y: i32) -> HitTestResult {
        let cells = self.track(track);
        let candidate = cells.partition_point(|cell| cell.y_top <= y);
        if candidate == 0 {
            return HitTestResult::Miss;
        }
        let position = candidate - 1;
        let cell = &cells[position];
        if cell.contains(y) {
            HitTestResult::Hit {
                id: IntervalId::new(track, position),
                offset_in_cell: y - cell.y_top,
            }
        } else {
            HitTestResult::Miss
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LayoutResult {
        let mut result = LayoutResult::with_shape([3, 0]);
        let t0 = TrackIndex::new(0);
        *result.cell_mut(IntervalId::new(t0, 0)) = CellGeometry {
            y_top: 0,
            height: 10,
            ordinal: 1,
            overlap: false,
        };
        *result.cell_mut(IntervalId::new(t0, 1)) = CellGeometry {
            y_top: 10,
            height: 0,
            ordinal: 2,
            overlap: true,
        };
        *result.cell_mut(IntervalId::new(t0, 2)) = CellGeometry {
            y_top: 13,
            height: 20,
            ordinal: 3,
            overlap: false,
        };
        result.set_content_height(38);
        result
    }

    #[test]
    fn with_shape_assigns_ordinals() {
        let result = LayoutResult::with_shape([2]);
        let ordinals: Vec<_> = result.track(TrackIndex::new(0)).iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2]);
    }

    #[test]
    fn counts_and_bottoms() {
        let result = sample();
        assert_eq!(result.track_count(), 2);
        assert_eq!(result.interval_count(), 3);
        assert_eq!(result.max_bottom(), 33);
        assert_eq!(result.content_height(), 38);
    }

    #[test]
    fn geometry_out_of_range_is_none() {
        let result = sample();
        assert!(result.geometry(IntervalId::new(TrackIndex::new(0), 9)).is_none());
        assert!(result.geometry(IntervalId::new(TrackIndex::new(7), 0)).is_none());
        assert!(result.track(TrackIndex::new(7)).is_empty());
    }

    mod hit_test {
        use super::*;

        #[test]
        fn hits_first_cell() {
            let result = sample();
            let hit = result.hit_test(TrackIndex::new(0), 4);
            assert_eq!(
                hit,
                HitTestResult::Hit {
                    id: IntervalId::new(TrackIndex::new(0), 0),
                    offset_in_cell: 4
                }
            );
        }

        #[test]
        fn gap_between_cells_is_miss() {
            let result = sample();
            assert_eq!(result.hit_test(TrackIndex::new(0), 11), HitTestResult::Miss);
        }

        #[test]
        fn zero_height_cell_is_never_hit() {
            let result = sample();
            assert_eq!(result.hit_test(TrackIndex::new(0), 10), HitTestResult::Miss);
        }

        #[test]
        fn hits_last_cell_and_misses_below() {
            let result = sample();
            let hit = result.hit_test(TrackIndex::new(0), 32);
            assert_eq!(hit.interval(), Some(IntervalId::new(TrackIndex::new(0), 2)));
            assert!(!result.hit_test(TrackIndex::new(0), 33).is_hit());
        }

        #[test]
        fn above_and_empty_tracks_miss() {
            let result = sample();
            assert!(!result.hit_test(TrackIndex::new(0), -1).is_hit());
            assert!(!result.hit_test(TrackIndex::new(1), 0).is_hit());
        }
    }
}
