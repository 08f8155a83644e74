//! JSONL parser for interval records.
//!
//! One record per line:
//!
//! ```text
//! {"track": 0, "onset": 0, "offset": 100, "height": 20}
//! ```
//!
//! `height` is optional. Malformed lines are reported with their line number
//! and never abort the whole input.

use crate::model::{is_valid_tick, ParseError};
use serde::Deserialize;

/// Raw JSON structure for deserializing a record.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecord {
    track: usize,
    onset: i64,
    offset: i64,
    #[serde(default)]
    height: Option<i32>,
}

/// One validated interval record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalRecord {
    /// 1-based input line.
    pub line: usize,
    /// Track the interval belongs to, as written in the input.
    pub track: usize,
    /// Onset in ticks.
    pub onset: i64,
    /// Offset in ticks.
    pub offset: i64,
    /// Preferred height, if the record gives one.
    pub height: Option<i32>,
}

/// Parse a single JSONL line.
///
/// # Errors
///
/// Returns `ParseError` if:
/// - JSON is malformed or has missing/unknown fields
/// - onset is after offset
/// - onset or offset lies outside `[MIN_TICK, MAX_TICK]`
/// - height is negative
pub fn parse_line(raw: &str, line_number: usize) -> Result<IntervalRecord, ParseError> {
    let record: RawRecord = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;

    if record.onset > record.offset {
        return Err(ParseError::InvalidInterval {
            line: line_number,
            onset: record.onset,
            offset: record.offset,
        });
    }
    if let Some(tick) = [record.onset, record.offset]
        .into_iter()
        .find(|&tick| !is_valid_tick(tick))
    {
        return Err(ParseError::TickOutOfRange {
            line: line_number,
            tick,
        });
    }
    if let Some(height) = record.height.filter(|h| *h < 0) {
        return Err(ParseError::NegativeHeight {
            line: line_number,
            height,
        });
    }

    Ok(IntervalRecord {
        line: line_number,
        track: record.track,
        onset: record.onset,
        offset: record.offset,
        height: record.height,
    })
}
