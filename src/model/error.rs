//! Error types for sheetline.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error wrapping all domain-specific failures
//!   - [`InputError`] - Input file/stdin reading failures
//!   - [`ParseError`] - JSONL interval record failures (malformed JSON, bad intervals)
//!   - [`LayoutError`] - Layout pass failures (precondition or invariant violations)
//!   - [`ViewportError`] - Rejected viewport/overlay updates
//!
//! # Error Classes
//!
//! - **Precondition violations** (unsorted track, onset > offset, out-of-range tick,
//!   negative width or content bound) are rejected before any computation runs. Nothing is corrected
//!   silently.
//! - **Invariant violations** (time regression during the weak sweep) abort the
//!   layout pass. The caller keeps its previous [`LayoutResult`](crate::layout::LayoutResult).
//! - **Parse errors** are non-fatal: the malformed line is logged and skipped.

use super::identifiers::{IntervalId, TrackIndex};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
///
/// # Examples
///
/// ```no_run
/// use sheetline::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _input = read_intervals()?;
///     Ok(())
/// }
/// # fn read_intervals() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read input from file or stdin.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Failed to parse an interval record.
    #[error("Failed to parse interval record: {0}")]
    Parse(#[from] ParseError),

    /// The layout pass was rejected or aborted.
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    /// A viewport update was rejected.
    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    /// Output could not be written.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified input file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use sheetline::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input file was given and stdin is a terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O failure while reading.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced while parsing one JSONL interval record.
///
/// Always carries the 1-based line number so the offending line can be reported.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line is not valid JSON or does not match the record shape.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// The 1-based line number.
        line: usize,
        /// Error details from serde_json.
        message: String,
    },

    /// The record describes an interval whose onset is after its offset.
    #[error("Invalid interval at line {line}: onset {onset} is after offset {offset}")]
    InvalidInterval {
        /// The 1-based line number.
        line: usize,
        /// Onset in ticks.
        onset: i64,
        /// Offset in ticks.
        offset: i64,
    },

    /// An onset or offset lies outside `[MIN_TICK, MAX_TICK]`.
    #[error("Tick {tick} at line {line} is out of range")]
    TickOutOfRange {
        /// The 1-based line number.
        line: usize,
        /// The rejected tick.
        tick: i64,
    },

    /// The record carries a negative preferred height.
    #[error("Negative preferred height {height} at line {line}")]
    NegativeHeight {
        /// The 1-based line number.
        line: usize,
        /// The rejected height.
        height: i32,
    },
}

/// Rejected interval construction: onset must not be after offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("onset {onset} is after offset {offset}")]
pub struct InvalidInterval {
    /// Onset in ticks.
    pub onset: i64,
    /// Offset in ticks.
    pub offset: i64,
}

/// Failures of a layout pass.
///
/// Precondition variants are detected before any geometry is computed.
/// [`LayoutError::TimeRegression`] is an engine invariant violation detected mid-pass;
/// the pass is aborted rather than truncated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A track's onsets are not in non-decreasing order.
    #[error("Track {track} is not onset-sorted at position {position}: onset {onset} follows {previous_onset}")]
    UnsortedTrack {
        /// Offending track.
        track: TrackIndex,
        /// Position of the out-of-order interval.
        position: usize,
        /// Onset of the out-of-order interval.
        onset: i64,
        /// Onset of the interval before it.
        previous_onset: i64,
    },

    /// An interval claims a different owner than the track holding it,
    /// or a track sits at a slice position that does not match its index.
    #[error("Interval at position {position} of track {track} is owned by track {owner}")]
    TrackMismatch {
        /// Track holding the interval.
        track: TrackIndex,
        /// Position within that track.
        position: usize,
        /// Owner recorded on the interval.
        owner: TrackIndex,
    },

    /// An onset or offset lies outside `[MIN_TICK, MAX_TICK]`.
    #[error("Tick {tick} of interval at position {position} of track {track} is out of range")]
    TickOutOfRange {
        /// Track holding the interval.
        track: TrackIndex,
        /// Position within that track.
        position: usize,
        /// The rejected tick.
        tick: i64,
    },

    /// The caller supplied a negative preferred height.
    #[error("Negative preferred height {height} for interval {id}")]
    NegativePreferredHeight {
        /// Interval whose height was rejected.
        id: IntervalId,
        /// The rejected height.
        height: i32,
    },

    /// The sweep observed an event time earlier than the previous one.
    #[error("Time regression during layout: event at {time} after {last_time}")]
    TimeRegression {
        /// The regressing event time.
        time: i64,
        /// The previous event time.
        last_time: i64,
    },
}

impl LayoutError {
    /// True for errors raised by input validation before the pass started.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, LayoutError::TimeRegression { .. })
    }
}

/// Rejected viewport or overlay updates.
///
/// These are precondition violations of the caller: the current state is left
/// untouched and no notification is emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    /// Window bounds violate `0 <= start <= end`.
    #[error("Invalid viewport window [{start}, {end}]")]
    InvalidWindow {
        /// Requested window start.
        start: i64,
        /// Requested window end.
        end: i64,
    },

    /// Content bound is negative.
    #[error("Content max end must be >= 0 (got {0})")]
    NegativeMaxEnd(i64),

    /// Content bound is above `MAX_TICK`.
    #[error("Content max end must be <= {max} (got {got})")]
    MaxEndOutOfRange {
        /// The rejected bound.
        got: i64,
        /// Largest accepted bound.
        max: i64,
    },

    /// Pixel width is negative or not finite.
    #[error("Pixel width must be a finite value >= 0 (got {0})")]
    InvalidWidth(f64),

    /// Zoom level is not a finite number.
    #[error("Zoom level must be finite (got {0})")]
    InvalidZoomLevel(f64),

    /// Region bounds violate `start <= end`.
    #[error("Invalid region [{start}, {end}]")]
    InvalidRegion {
        /// Requested region start.
        start: i64,
        /// Requested region end.
        end: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn input_error_file_not_found_display() {
        let err = InputError::FileNotFound {
            path: PathBuf::from("/tmp/missing.jsonl"),
        };
        let msg = err.to_string();
        assert!(msg.contains("File not found"));
        assert!(msg.contains("/tmp/missing.jsonl"));
    }

    #[test]
    fn input_error_no_input_display() {
        let msg = InputError::NoInput.to_string();
        assert!(msg.contains("No input source"));
        assert!(msg.contains("file path or pipe data to stdin"));
    }

    #[test]
    fn parse_error_invalid_interval_display() {
        let err = ParseError::InvalidInterval {
            line: 7,
            onset: 200,
            offset: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("onset 200"));
        assert!(msg.contains("offset 100"));
    }

    #[test]
    fn layout_error_classes() {
        let unsorted = LayoutError::UnsortedTrack {
            track: TrackIndex::new(1),
            position: 2,
            onset: 10,
            previous_onset: 50,
        };
        let regression = LayoutError::TimeRegression {
            time: 10,
            last_time: 20,
        };
        assert!(unsorted.is_precondition());
        assert!(!regression.is_precondition());
        assert!(regression.to_string().contains("event at 10 after 20"));
    }

    #[test]
    fn tick_out_of_range_is_a_precondition() {
        let err = LayoutError::TickOutOfRange {
            track: TrackIndex::new(0),
            position: 1,
            tick: i64::MIN,
        };
        assert!(err.is_precondition());
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn app_error_from_layout_error() {
        let app_err: AppError = LayoutError::TimeRegression {
            time: 1,
            last_time: 2,
        }
        .into();
        assert!(app_err.to_string().contains("Layout failed"));
    }

    #[test]
    fn app_error_nested_io_through_input_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let input_err: InputError = io_err.into();
        let app_err: AppError = input_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Failed to read input"));
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn viewport_error_display() {
        let err = ViewportError::InvalidWindow { start: 5, end: 1 };
        assert_eq!(err.to_string(), "Invalid viewport window [5, 1]");
    }
}
