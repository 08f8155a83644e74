//! Region of interest and playback needle that follow the content bound.

use super::controller::{ViewportChange, ViewportListener};
use crate::model::ViewportError;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Selected time range, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionState {
    start: i64,
    end: i64,
}

impl RegionState {
    /// Smart constructor enforcing `0 <= start <= end`.
    pub fn new(start: i64, end: i64) -> Result<Self, ViewportError> {
        if start < 0 || start > end {
            return Err(ViewportError::InvalidRegion { start, end });
        }
        Ok(Self { start, end })
    }

    /// Region covering `[0, max_end]`.
    pub fn whole(max_end: i64) -> Self {
        Self {
            start: 0,
            end: max_end.max(0),
        }
    }

    /// First tick of the region.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last tick of the region.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of ticks covered.
    pub fn duration(&self) -> i64 {
        self.end - self.start + 1
    }

    /// Region after the content bound moved from `old_max` to `new_max`.
    ///
    /// A region tracking the old end, or sticking out past the new one, is
    /// stretched to the new end; a start beyond the new end resets to 0.
    pub fn rebound(&self, old_max: i64, new_max: i64) -> Self {
        let tracks_end = self.end == old_max;
        let out_of_bounds = self.start > new_max || self.end > new_max;
        if !(tracks_end || out_of_bounds) {
            return *self;
        }
        let start = if self.start > new_max { 0 } else { self.start };
        Self {
            start,
            end: new_max,
        }
    }
}

/// Current playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NeedleState {
    time: i64,
}

impl NeedleState {
    /// Needle at `time`, clamped to be non-negative.
    pub fn new(time: i64) -> Self {
        Self { time: time.max(0) }
    }

    /// Position in ticks.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Needle after the content bound moved: an end-parked needle follows the
    /// end, anything else is clamped into the new range.
    pub fn rebound(&self, old_max: i64, new_max: i64) -> Self {
        if self.time == old_max {
            Self::new(new_max)
        } else {
            Self::new(self.time.min(new_max))
        }
    }
}

/// Region and needle kept consistent with the viewport's content bound.
#[derive(Debug)]
pub struct OverlayModel {
    region: Mutex<RegionState>,
    needle: Mutex<NeedleState>,
}

impl OverlayModel {
    /// Overlays spanning the whole of `[0, max_end]`, needle at 0.
    pub fn new(max_end: i64) -> Self {
        Self {
            region: Mutex::new(RegionState::whole(max_end)),
            needle: Mutex::new(NeedleState::default()),
        }
    }

    /// Current region.
    pub fn region(&self) -> RegionState {
        *lock(&self.region)
    }

    /// Current needle.
    pub fn needle(&self) -> NeedleState {
        *lock(&self.needle)
    }

    /// Replace the region.
    pub fn set_region(&self, region: RegionState) {
        *lock(&self.region) = region;
    }

    /// Reset the region to `[0, max_end]`.
    pub fn reset_region(&self, max_end: i64) {
        self.set_region(RegionState::whole(max_end));
    }

    /// Move the needle.
    pub fn set_needle(&self, time: i64) {
        *lock(&self.needle) = NeedleState::new(time);
    }
}

impl ViewportListener for OverlayModel {
    fn on_viewport_changed(&self, change: &ViewportChange) {
        if !change.max_end_changed() {
            return;
        }
        let (old_max, new_max) = (change.old.max_end(), change.new.max_end());

        let mut region = lock(&self.region);
        let rebounded = region.rebound(old_max, new_max);
        if rebounded != *region {
            debug!(
                start = rebounded.start(),
                end = rebounded.end(),
                "Region rebounded to new content end"
            );
            *region = rebounded;
        }
        drop(region);

        let mut needle = lock(&self.needle);
        *needle = needle.rebound(old_max, new_max);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
