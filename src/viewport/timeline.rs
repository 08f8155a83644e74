//! Timeline: viewport plus region and needle, driven together.

use super::controller::{ViewportChange, ViewportController, ViewportListener};
use super::overlay::{NeedleState, OverlayModel, RegionState};
use super::state::{Viewport, MINIMUM_MAX_END};
use crate::model::ViewportError;
use std::sync::Arc;
use tracing::{debug, info};

/// Share of the region duration shown on each side by [`Timeline::zoom_to_region`].
pub const REGION_PADDING_PERCENT: i64 = 5;

/// Viewport controller with its dependent overlays.
///
/// The overlay model is registered as a viewport listener, so every content
/// bound change reaches it without further wiring.
#[derive(Debug)]
pub struct Timeline {
    controller: ViewportController,
    overlay: Arc<OverlayModel>,
    track_count: usize,
}

impl Timeline {
    /// Empty timeline showing the minimum content range at `width` pixels.
    pub fn new(width: f64) -> Result<Self, ViewportError> {
        let controller = ViewportController::with_width(width)?;
        let overlay = Arc::new(OverlayModel::new(MINIMUM_MAX_END));
        controller.add_listener(overlay.clone());
        Ok(Self {
            controller,
            overlay,
            track_count: 0,
        })
    }

    /// Underlying viewport controller.
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// Register an additional viewport listener.
    pub fn add_listener(&self, listener: Arc<dyn ViewportListener>) {
        self.controller.add_listener(listener);
    }

    /// Current viewport snapshot.
    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    /// Current region of interest.
    pub fn region(&self) -> RegionState {
        self.overlay.region()
    }

    /// Current needle.
    pub fn needle(&self) -> NeedleState {
        self.overlay.needle()
    }

    /// Replace the region of interest.
    pub fn set_region(&self, start: i64, end: i64) -> Result<(), ViewportError> {
        self.overlay.set_region(RegionState::new(start, end)?);
        Ok(())
    }

    /// Move the needle, clamped into the content range.
    pub fn set_needle(&self, time: i64) {
        self.overlay.set_needle(time.min(self.viewport().max_end()));
    }

    /// Change the content bound (never below one minute).
    ///
    /// With `reset_window` the whole content becomes visible and the region
    /// is reset to cover it.
    pub fn set_max_end(
        &self,
        end: i64,
        reset_window: bool,
    ) -> Result<Option<ViewportChange>, ViewportError> {
        let max_end = end.max(MINIMUM_MAX_END);
        if !reset_window {
            return self.controller.set_max_end(max_end);
        }
        let change = self.controller.set_max_end_and_reset(max_end)?;
        self.overlay.reset_region(max_end);
        Ok(change)
    }

    /// Account for a newly added track ending at `track_end`.
    ///
    /// The content bound grows when the track outlasts it, or when it is the
    /// first track with any content.
    pub fn register_track_end(&mut self, track_end: i64) -> Result<Option<ViewportChange>, ViewportError> {
        let grows = track_end > self.viewport().max_end() || (self.track_count == 0 && track_end > 0);
        self.track_count += 1;
        if !grows {
            return Ok(None);
        }
        info!(track_end, tracks = self.track_count, "Content bound extended by new track");
        self.set_max_end(track_end, true)
    }

    /// Number of tracks registered so far.
    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Show the region with a little padding on each side and park the needle
    /// at its start.
    pub fn zoom_to_region(&self) -> Result<Option<ViewportChange>, ViewportError> {
        let region = self.region();
        let padding = region.duration() * REGION_PADDING_PERCENT / 100;
        let start = (region.start() - padding).max(0);
        let end = (region.end() + padding).min(self.viewport().max_end());
        debug!(start, end, "Zooming to region");

        let change = self.controller.set_window(start, end.max(start))?;
        self.overlay.set_needle(region.start());
        Ok(change)
    }

    /// Drop the region of interest and show the whole content.
    pub fn clear_region_and_zoom_out(&self) -> Result<Option<ViewportChange>, ViewportError> {
        self.overlay.reset_region(self.viewport().max_end());
        self.zoom_to_region()
    }

    /// Zoom keeping the needle fixed on screen.
    pub fn zoom_to_needle(&self, level: f64) -> Result<Option<ViewportChange>, ViewportError> {
        self.controller.zoom_to(level, self.needle().time())
    }

    /// Forget all tracks and return to the initial state.
    pub fn clear(&mut self) -> Result<(), ViewportError> {
        self.track_count = 0;
        self.set_max_end(MINIMUM_MAX_END, true)?;
        self.overlay.set_needle(0);
        Ok(())
    }
}
