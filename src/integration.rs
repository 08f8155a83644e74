//! Pure core integration functions.
//!
//! Turns raw input lines into a sheet ready for layout. Everything here is
//! testable without I/O.

use crate::layout::{HeightTable, LayoutParams, LayoutPolicy};
use crate::model::{Interval, IntervalId, LayoutError, ParseError, Track, TrackIndex};
use crate::parser::{self, IntervalRecord};
use crate::state::SheetState;
use std::collections::BTreeMap;
use tracing::warn;

/// Parse raw JSONL lines into interval records.
///
/// Malformed lines are logged and returned separately; they never stop the
/// remaining lines from being read.
///
/// # Arguments
///
/// * `lines` - Raw JSONL lines to process
/// * `starting_line_number` - Line number of the first line (for error reporting)
pub fn process_lines(
    lines: Vec<String>,
    starting_line_number: usize,
) -> (Vec<IntervalRecord>, Vec<ParseError>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = starting_line_number + index;
        match parser::parse_line(line.trim(), line_number) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(error = %err, "Skipping malformed record");
                errors.push(err);
            }
        }
    }

    (records, errors)
}

/// Tracks and heights assembled from input records.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSheet {
    /// Tracks with dense indices, each onset-sorted.
    pub tracks: Vec<Track>,
    /// Preferred heights from the records, with the configured default.
    pub heights: HeightTable,
    /// Track number used in the input for each dense index.
    pub input_tracks: Vec<usize>,
}

impl BuiltSheet {
    /// Sheet state over these tracks.
    pub fn into_state(self, policy: LayoutPolicy, params: LayoutParams) -> SheetState {
        SheetState::new(self.tracks, self.heights, policy, params)
    }

    /// Largest offset over all tracks.
    pub fn max_offset(&self) -> Option<i64> {
        self.tracks.iter().filter_map(Track::max_offset).max()
    }
}

/// Group records into tracks.
///
/// Input track numbers may be sparse; they are mapped to dense indices in
/// ascending order. Within a track, records are sorted by onset with ties kept
/// in input order.
///
/// # Errors
///
/// Only if a record slips past validation; parsed records always build.
pub fn build_sheet(records: &[IntervalRecord], default_height: i32) -> Result<BuiltSheet, LayoutError> {
    let mut grouped: BTreeMap<usize, Vec<&IntervalRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.track).or_default().push(record);
    }

    let mut tracks = Vec::with_capacity(grouped.len());
    let mut heights = HeightTable::new(default_height);
    let mut input_tracks = Vec::with_capacity(grouped.len());

    for (dense, (input_track, mut group)) in grouped.into_iter().enumerate() {
        let index = TrackIndex::new(dense);
        group.sort_by_key(|record| record.onset);

        let mut intervals = Vec::with_capacity(group.len());
        for record in group {
            let interval = match Interval::new(record.onset, record.offset, index) {
                Ok(interval) => interval,
                Err(err) => {
                    warn!(line = record.line, error = %err, "Dropping invalid interval");
                    continue;
                }
            };
            if let Some(height) = record.height {
                heights.set(IntervalId::new(index, intervals.len()), height);
            }
            intervals.push(interval);
        }

        tracks.push(Track::new(index, intervals)?);
        input_tracks.push(input_track);
    }

    Ok(BuiltSheet {
        tracks,
        heights,
        input_tracks,
    })
}
