//! Sheet state: tracks, layout settings and the last good layout.

use crate::layout::{self, HeightTable, LayoutParams, LayoutPolicy, LayoutResult};
use crate::model::{Interval, IntervalId, LayoutError, Track, TrackIndex};
use tracing::{debug, error};

/// Receives a signal whenever the sheet's layout goes stale.
pub trait LayoutListener: Send + Sync {
    /// Called after every structural change.
    fn on_layout_invalidated(&self);
}

/// Everything needed to lay out one sheet.
///
/// # Invariants
/// - `tracks[i].index() == i`
/// - `result` is the outcome of the last successful pass; a failed pass never
///   replaces it
pub struct SheetState {
    tracks: Vec<Track>,
    heights: HeightTable,
    policy: LayoutPolicy,
    params: LayoutParams,
    result: LayoutResult,
    stale: bool,
    listeners: Vec<Box<dyn LayoutListener>>,
}

impl SheetState {
    /// Sheet over `tracks`, not yet laid out.
    pub fn new(tracks: Vec<Track>, heights: HeightTable, policy: LayoutPolicy, params: LayoutParams) -> Self {
        Self {
            tracks,
            heights,
            policy,
            params,
            result: LayoutResult::default(),
            stale: true,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for invalidation signals.
    pub fn add_listener(&mut self, listener: Box<dyn LayoutListener>) {
        self.listeners.push(listener);
    }

    /// Tracks in index order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Preferred heights.
    pub fn heights(&self) -> &HeightTable {
        &self.heights
    }

    /// Active placement rule.
    pub fn policy(&self) -> LayoutPolicy {
        self.policy
    }

    /// Active layout constants.
    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Last good layout.
    pub fn result(&self) -> &LayoutResult {
        &self.result
    }

    /// Whether something changed since the last successful pass.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Interval at `id`.
    pub fn interval(&self, id: IntervalId) -> Option<&Interval> {
        self.tracks.get(id.track.get())?.get(id.position)
    }

    /// Largest offset over all tracks.
    pub fn max_offset(&self) -> Option<i64> {
        self.tracks.iter().filter_map(Track::max_offset).max()
    }

    /// Switch the placement rule.
    pub fn set_policy(&mut self, policy: LayoutPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.invalidate();
        }
    }

    /// Replace the layout constants.
    pub fn set_params(&mut self, params: LayoutParams) {
        if self.params != params {
            self.params = params;
            self.invalidate();
        }
    }

    /// Change the preferred height of one interval.
    pub fn set_preferred_height(&mut self, id: IntervalId, height: i32) {
        self.heights.set(id, height);
        self.invalidate();
    }

    /// Append an empty track and return its index.
    pub fn add_track(&mut self) -> TrackIndex {
        let index = TrackIndex::new(self.tracks.len());
        self.tracks.push(Track::empty(index));
        self.invalidate();
        index
    }

    /// Insert an interval into its track, creating missing tracks up to it.
    ///
    /// Returns the id the interval now has.
    pub fn insert_interval(&mut self, interval: Interval, height: Option<i32>) -> Result<IntervalId, LayoutError> {
        let track = interval.track();
        while self.tracks.len() <= track.get() {
            let index = TrackIndex::new(self.tracks.len());
            self.tracks.push(Track::empty(index));
        }
        let position = self.tracks[track.get()].insert(interval)?;
        let id = IntervalId::new(track, position);
        self.heights.insert_at(id, height);
        self.invalidate();
        Ok(id)
    }

    /// Remove the interval at `id`. Later intervals of the track move up one position.
    pub fn remove_interval(&mut self, id: IntervalId) -> Option<Interval> {
        let removed = self.tracks.get_mut(id.track.get())?.remove(id.position)?;
        self.heights.remove_at(id);
        self.invalidate();
        Some(removed)
    }

    /// Mark the layout stale and tell every listener.
    pub fn invalidate(&mut self) {
        self.stale = true;
        for listener in &self.listeners {
            listener.on_layout_invalidated();
        }
    }

    /// Re-run the full layout pass.
    ///
    /// On error the previous result stays in place and the error is returned.
    pub fn relayout(&mut self) -> Result<&LayoutResult, LayoutError> {
        let heights = &self.heights;
        let outcome = layout::layout(self.policy, &self.tracks, &self.params, |id, interval| {
            heights.preferred_height(id, interval)
        });
        self.apply(outcome)
    }

    /// Accept the outcome of a pass computed elsewhere, e.g. on a worker thread.
    pub fn apply(&mut self, outcome: Result<LayoutResult, LayoutError>) -> Result<&LayoutResult, LayoutError> {
        match outcome {
            Ok(result) => {
                debug!(
                    policy = %self.policy,
                    content_height = result.content_height(),
                    "Layout updated"
                );
                self.result = result;
                self.stale = false;
                Ok(&self.result)
            }
            Err(err) => {
                error!(error = %err, "Layout pass failed; keeping previous result");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for SheetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetState")
            .field("tracks", &self.tracks.len())
            .field("policy", &self.policy)
            .field("stale", &self.stale)
            .field("content_height", &self.result.content_height())
            .finish()
    }
}

#[cfg(test)]
#[path = "sheet_tests.rs"]
mod tests;
