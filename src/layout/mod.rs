//! Temporal layout engine.
//!
//! Assigns every interval a vertical position and height.
//!
//! # Module Structure
//!
//! - `params`: LayoutParams - gap, margin and scale constants
//! - `heights`: HeightTable - owned preferred heights
//! - `result`: LayoutResult, CellGeometry, HitTestResult
//! - `weak`: weak temporal ordering (event sweep with cross-track alignment)
//! - `strong`: strong temporal ordering (absolute time scale)
//! - `ordinal`: ordinal ordering (plain per-track stacking)
//!
//! Every pass is synchronous and recomputes the whole sheet. Inputs are
//! validated first; nothing is re-sorted or corrected.

pub mod heights;
pub mod ordinal;
pub mod params;
pub mod result;
pub mod strong;
pub mod weak;

pub use heights::HeightTable;
pub use params::LayoutParams;
pub use result::{CellGeometry, HitTestResult, LayoutResult};

use crate::model::{Interval, IntervalId, LayoutError, Track, TrackIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How intervals are placed vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Align simultaneous starts and ends across tracks using minimal space.
    #[default]
    Weak,
    /// Place intervals proportionally to absolute time.
    Strong,
    /// Stack intervals per track by position only.
    Ordinal,
}

impl LayoutPolicy {
    /// Name used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutPolicy::Weak => "weak",
            LayoutPolicy::Strong => "strong",
            LayoutPolicy::Ordinal => "ordinal",
        }
    }
}

impl fmt::Display for LayoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown layout policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown layout policy '{0}' (expected weak, strong or ordinal)")]
pub struct UnknownPolicy(pub String);

impl FromStr for LayoutPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weak" => Ok(LayoutPolicy::Weak),
            "strong" => Ok(LayoutPolicy::Strong),
            "ordinal" => Ok(LayoutPolicy::Ordinal),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

/// Check every precondition of a layout pass.
///
/// # Errors
/// - [`LayoutError::TrackMismatch`] if a track is not at the slice position its
///   index names, or holds an interval owned by another track
/// - [`LayoutError::TickOutOfRange`] if a tick lies outside `[MIN_TICK, MAX_TICK]`
/// - [`LayoutError::UnsortedTrack`] if a track is not onset-sorted
pub fn validate(tracks: &[Track]) -> Result<(), LayoutError> {
    for (slot, track) in tracks.iter().enumerate() {
        if track.index().get() != slot {
            return Err(LayoutError::TrackMismatch {
                track: TrackIndex::new(slot),
                position: 0,
                owner: track.index(),
            });
        }
        track.validate()?;
    }
    Ok(())
}

/// Evaluate the caller's height function once per interval.
fn resolve_heights<F>(tracks: &[Track], preferred_height: F) -> Result<Vec<Vec<i32>>, LayoutError>
where
    F: Fn(IntervalId, &Interval) -> i32,
{
    tracks
        .iter()
        .map(|track| {
            track
                .iter()
                .map(|(id, interval)| {
                    let height = preferred_height(id, interval);
                    if height < 0 {
                        Err(LayoutError::NegativePreferredHeight { id, height })
                    } else {
                        Ok(height)
                    }
                })
                .collect()
        })
        .collect()
}

/// Run one full layout pass.
///
/// # Arguments
///
/// * `policy` - Placement rule
/// * `tracks` - Tracks in index order, each onset-sorted
/// * `params` - Gap, margin and scale constants
/// * `preferred_height` - Minimum height of each interval (e.g. from text metrics)
///
/// # Errors
///
/// Precondition errors are returned before any geometry is computed.
/// [`LayoutError::TimeRegression`] aborts the weak sweep; no partial result is returned.
///
/// # Examples
///
/// ```
/// # use sheetline::layout::{layout, LayoutParams, LayoutPolicy};
/// # use sheetline::model::{Interval, Track, TrackIndex};
/// let t0 = TrackIndex::new(0);
/// let t1 = TrackIndex::new(1);
/// let tracks = vec![
///     Track::new(t0, vec![Interval::new(0, 100, t0).unwrap()]).unwrap(),
///     Track::new(t1, vec![Interval::new(0, 50, t1).unwrap()]).unwrap(),
/// ];
/// let result = layout(LayoutPolicy::Weak, &tracks, &LayoutParams::default(), |_, _| 20).unwrap();
/// assert_eq!(result.track(t0)[0].y_top, result.track(t1)[0].y_top);
/// ```
pub fn layout<F>(
    policy: LayoutPolicy,
    tracks: &[Track],
    params: &LayoutParams,
    preferred_height: F,
) -> Result<LayoutResult, LayoutError>
where
    F: Fn(IntervalId, &Interval) -> i32,
{
    validate(tracks)?;
    let heights = resolve_heights(tracks, preferred_height)?;
    let slices: Vec<&[Interval]> = tracks.iter().map(Track::intervals).collect();

    match policy {
        LayoutPolicy::Weak => weak::layout(&slices, &heights, params),
        LayoutPolicy::Strong => Ok(strong::layout(&slices, params)),
        LayoutPolicy::Ordinal => Ok(ordinal::layout(&slices, &heights, params)),
    }
}
