//! Weak temporal ordering.
//!
//! A multi-way sweep over all tracks in event-time order. Intervals that start
//! at the same time share a top edge, intervals that end at the same time share
//! a bottom edge, and each track's intervals stack without overlap.
//!
//! Each track keeps an index cursor into its onset-sorted sequence. The
//! cursor's *virtual offset* caps how far the current interval may extend
//! before the next interval of the same track begins.

use super::params::LayoutParams;
use super::result::LayoutResult;
use crate::model::{Interval, IntervalId, LayoutError, TrackIndex};
use tracing::{debug, error};

/// Per-track sweep state.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    /// Position of the interval awaiting layout; `len` once exhausted.
    position: usize,
    /// Whether the current interval already has its top edge.
    onset_consumed: bool,
    /// Event time at which the current interval ends visually.
    virtual_offset: i64,
}

impl Cursor {
    fn start(cells: &[Interval]) -> Self {
        Self {
            position: 0,
            onset_consumed: false,
            virtual_offset: virtual_offset(cells, 0),
        }
    }

    fn current<'a>(&self, cells: &'a [Interval]) -> Option<&'a Interval> {
        cells.get(self.position)
    }

    /// Next event of this track: the pending onset, or the virtual offset once
    /// the onset has been consumed.
    fn event_time(&self, cells: &[Interval]) -> Option<i64> {
        let current = self.current(cells)?;
        if self.onset_consumed {
            Some(self.virtual_offset)
        } else {
            Some(current.onset())
        }
    }

    fn advance(&mut self, cells: &[Interval]) {
        self.position += 1;
        self.onset_consumed = false;
        self.virtual_offset = virtual_offset(cells, self.position);
    }
}

/// `max(onset, min(offset, next.onset))` with a successor, else `max(onset, offset)`.
fn virtual_offset(cells: &[Interval], position: usize) -> i64 {
    let Some(current) = cells.get(position) else {
        return i64::MAX;
    };
    match cells.get(position + 1) {
        Some(next) => current.onset().max(current.offset().min(next.onset())),
        None => current.onset().max(current.offset()),
    }
}

/// Lay out validated tracks with the weak temporal policy.
///
/// `heights[t][p]` is the preferred height of interval `p` of track `t`.
pub(crate) fn layout(
    tracks: &[&[Interval]],
    heights: &[Vec<i32>],
    params: &LayoutParams,
) -> Result<LayoutResult, LayoutError> {
    let mut result = LayoutResult::with_shape(tracks.iter().map(|cells| cells.len()));
    let mut cursors: Vec<Cursor> = tracks.iter().map(|cells| Cursor::start(cells)).collect();

    // Running vertical cursor: lowest edge assigned so far.
    let mut v_cursor: i32 = 0;
    let mut last_time: Option<i64> = None;
    let mut onsets: Vec<usize> = Vec::with_capacity(tracks.len());
    let mut offsets: Vec<usize> = Vec::with_capacity(tracks.len());
    let mut events = 0usize;

    loop {
        let next_time = cursors
            .iter()
            .zip(tracks)
            .filter_map(|(cursor, cells)| cursor.event_time(cells))
            .min();
        let Some(time) = next_time else {
            break;
        };

        if let Some(last) = last_time {
            if time < last {
                error!(time, last_time = last, "Time regression in weak layout sweep; aborting pass");
                return Err(LayoutError::TimeRegression {
                    time,
                    last_time: last,
                });
            }
            if time - last > 1 {
                v_cursor += params.gap;
            }
        }
        last_time = Some(time);
        events += 1;

        onsets.clear();
        offsets.clear();
        for (track, (cursor, cells)) in cursors.iter().zip(tracks).enumerate() {
            let Some(current) = cursor.current(cells) else {
                continue;
            };
            if cursor.onset_consumed {
                if cursor.virtual_offset == time {
                    offsets.push(track);
                }
            } else if current.onset() == time {
                onsets.push(track);
            }
        }

        // Offsets go first so that a successor chained at this time and an
        // interval of another track starting now share one top edge.
        if !offsets.is_empty() {
            let mut v_pos = v_cursor;
            for &track in &offsets {
                let position = cursors[track].position;
                let cell = result.cell_mut(id(track, position));
                v_pos = v_pos.max(cell.y_top + heights[track][position]);
            }
            v_cursor = v_pos;

            for &track in &offsets {
                let cursor = &mut cursors[track];
                let cell = result.cell_mut(id(track, cursor.position));
                cell.height = v_pos - cell.y_top;

                let ended_at = cursor.virtual_offset;
                cursor.advance(tracks[track]);
                if let Some(next) = cursor.current(tracks[track]) {
                    if next.onset() == ended_at {
                        onsets.push(track);
                    }
                }
            }
        }

        if !onsets.is_empty() {
            let mut v_pos = v_cursor;
            for &track in &onsets {
                v_pos = v_pos.max(candidate_top(&result, tracks[track], track, cursors[track].position, params));
            }
            v_cursor = v_pos;

            for &track in &onsets {
                let cursor = &mut cursors[track];
                result.cell_mut(id(track, cursor.position)).y_top = v_pos;
                cursor.onset_consumed = true;
            }
        }
    }

    let content_height = if result.is_empty() {
        0
    } else {
        v_cursor + params.bottom_margin
    };
    result.set_content_height(content_height);

    debug!(
        tracks = tracks.len(),
        intervals = result.interval_count(),
        events,
        content_height,
        "Weak temporal layout complete"
    );
    Ok(result)
}

/// Top edge proposed by a track for its current interval: the previous
/// interval's bottom, plus the gap when the two are not adjacent in time.
fn candidate_top(
    result: &LayoutResult,
    cells: &[Interval],
    track: usize,
    position: usize,
    params: &LayoutParams,
) -> i32 {
    let Some(prev_position) = position.checked_sub(1) else {
        return 0;
    };
    let prev_bottom = result
        .geometry(id(track, prev_position))
        .map(|cell| cell.bottom())
        .unwrap_or(0);
    let prev = &cells[prev_position];
    let current = &cells[position];
    if prev.offset() < current.onset() - 1 {
        prev_bottom + params.gap
    } else {
        prev_bottom
    }
}

fn id(track: usize, position: usize) -> IntervalId {
    IntervalId::new(TrackIndex::new(track), position)
}
