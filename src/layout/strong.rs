//! Strong temporal ordering: positions proportional to absolute time.

use super::params::LayoutParams;
use super::result::LayoutResult;
use crate::model::{Interval, IntervalId, TrackIndex};
use tracing::debug;

/// Ranges shorter than this (seconds) are stretched to `min_scroll_pixels`.
pub const MIN_RANGE_SECONDS: i64 = 600;

/// Ranges at least this long (seconds) are squeezed into `max_scroll_pixels`.
pub const MAX_RANGE_SECONDS: i64 = 10000;

/// Pixels per second for medium ranges.
pub const MEDIUM_PIXELS_PER_SECOND: f64 = 10.0;

/// Smallest and largest time value over every onset and offset.
fn time_bounds(tracks: &[&[Interval]]) -> Option<(i64, i64)> {
    let mut bounds: Option<(i64, i64)> = None;
    for interval in tracks.iter().flat_map(|cells| cells.iter()) {
        let low = interval.onset().min(interval.offset());
        let high = interval.onset().max(interval.offset());
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(low), max.max(high)),
            None => (low, high),
        });
    }
    bounds
}

/// Scale factor for the three-tier range rule.
///
/// A zero-length range maps everything to 0.
pub fn pixels_per_tick(min_onset: i64, max_offset: i64, params: &LayoutParams) -> f64 {
    let range = max_offset - min_onset;
    if range <= 0 {
        return 0.0;
    }
    let seconds = (range as f64 / params.ticks_per_second as f64).round() as i64;
    if seconds < MIN_RANGE_SECONDS {
        f64::from(params.min_scroll_pixels) / range as f64
    } else if seconds < MAX_RANGE_SECONDS {
        MEDIUM_PIXELS_PER_SECOND / params.ticks_per_second as f64
    } else {
        f64::from(params.max_scroll_pixels) / range as f64
    }
}

/// Lay out validated tracks with the strong temporal policy.
pub(crate) fn layout(tracks: &[&[Interval]], params: &LayoutParams) -> LayoutResult {
    let mut result = LayoutResult::with_shape(tracks.iter().map(|cells| cells.len()));
    let Some((min_onset, max_offset)) = time_bounds(tracks) else {
        return result;
    };
    let scale = pixels_per_tick(min_onset, max_offset, params);
    let scaled = |time: i64| ((time - min_onset) as f64 * scale).round() as i32;

    let mut overlaps = 0usize;
    for (track, cells) in tracks.iter().enumerate() {
        let mut prev: Option<IntervalId> = None;
        for (position, interval) in cells.iter().enumerate() {
            let id = IntervalId::new(TrackIndex::new(track), position);
            let y_top = scaled(interval.onset());
            let height = scaled(interval.offset()) - y_top;

            if let Some(prev_id) = prev {
                let prev_cell = result.cell_mut(prev_id);
                if y_top < prev_cell.bottom() {
                    prev_cell.height = y_top - prev_cell.y_top;
                    prev_cell.overlap = true;
                    overlaps += 1;
                }
            }

            let cell = result.cell_mut(id);
            cell.y_top = y_top;
            cell.height = height;
            prev = Some(id);
        }
    }

    let content_height = result.max_bottom() + params.bottom_margin;
    result.set_content_height(content_height);

    debug!(
        min_onset,
        max_offset,
        pixels_per_tick = scale,
        overlaps,
        content_height,
        "Strong temporal layout complete"
    );
    result
}
