//! Ordinal ordering: each track stacked top-down, no temporal alignment.

use super::params::LayoutParams;
use super::result::LayoutResult;
use crate::model::{Interval, IntervalId, TrackIndex};
use tracing::debug;

/// Lay out validated tracks by position only.
///
/// Every interval takes exactly its preferred height. An interval is flagged
/// as overlapping when its offset runs past the next interval's onset.
pub(crate) fn layout(
    tracks: &[&[Interval]],
    heights: &[Vec<i32>],
    params: &LayoutParams,
) -> LayoutResult {
    let mut result = LayoutResult::with_shape(tracks.iter().map(|cells| cells.len()));

    for (track, cells) in tracks.iter().enumerate() {
        let mut current_height = 0;
        for (position, interval) in cells.iter().enumerate() {
            let id = IntervalId::new(TrackIndex::new(track), position);
            let cell = result.cell_mut(id);
            cell.y_top = current_height;
            cell.height = heights[track][position];
            current_height += cell.height;

            if let Some(prev) = position.checked_sub(1) {
                let overlap = cells[prev].offset() > interval.onset();
                result.cell_mut(IntervalId::new(TrackIndex::new(track), prev)).overlap = overlap;
            }
        }
    }

    let content_height = if result.is_empty() {
        0
    } else {
        result.max_bottom() + params.bottom_margin
    };
    result.set_content_height(content_height);

    debug!(
        tracks = tracks.len(),
        intervals = result.interval_count(),
        content_height,
        "Ordinal layout complete"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(spans: &[(i64, i64)]) -> Vec<Interval> {
        spans
            .iter()
            .map(|&(onset, offset)| Interval::new(onset, offset, TrackIndex::new(0)).unwrap())
            .collect()
    }

    #[test]
    fn stacks_by_preferred_height() {
        let track = cells(&[(0, 10), (500, 600), (900, 950)]);
        let heights = vec![vec![20, 30, 10]];
        let result = layout(&[track.as_slice()], &heights, &LayoutParams::default());

        let tops: Vec<_> = result.track(TrackIndex::new(0)).iter().map(|c| c.y_top).collect();
        assert_eq!(tops, vec![0, 20, 50]);
        assert_eq!(result.content_height(), 60 + 5);
    }

    #[test]
    fn flags_overlap_with_next_interval() {
        let track = cells(&[(0, 100), (50, 60), (60, 70)]);
        let heights = vec![vec![20; 3]];
        let result = layout(&[track.as_slice()], &heights, &LayoutParams::default());

        let flags: Vec<_> = result.track(TrackIndex::new(0)).iter().map(|c| c.overlap).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn ordinals_are_one_based() {
        let track = cells(&[(0, 1), (1, 2)]);
        let heights = vec![vec![5, 5]];
        let result = layout(&[track.as_slice()], &heights, &LayoutParams::default());
        let ordinals: Vec<_> = result.track(TrackIndex::new(0)).iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2]);
    }
}
