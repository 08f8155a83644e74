//! Owner of the current viewport snapshot and its change notifications.

use super::state::{Viewport, MINIMUM_MAX_END};
use crate::model::ViewportError;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

/// A replaced viewport snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportChange {
    /// Snapshot before the update.
    pub old: Viewport,
    /// Snapshot after the update.
    pub new: Viewport,
}

impl ViewportChange {
    /// Whether the content bound moved.
    pub fn max_end_changed(&self) -> bool {
        self.old.max_end() != self.new.max_end()
    }
}

/// Receives viewport change notifications.
///
/// Callbacks run while the controller holds its snapshot lock, so a listener
/// must not call back into the same controller.
pub trait ViewportListener: Send + Sync {
    /// Called once per effective change.
    fn on_viewport_changed(&self, change: &ViewportChange);
}

/// Channel fan-out: forwards every change to the receiving end.
impl ViewportListener for mpsc::Sender<ViewportChange> {
    fn on_viewport_changed(&self, change: &ViewportChange) {
        if self.send(*change).is_err() {
            trace!("Viewport change receiver dropped");
        }
    }
}

/// Holds the current [`Viewport`] and notifies listeners when it changes.
///
/// Every setter builds a new snapshot, validates it, and replaces the current
/// one only if it differs. No-op updates produce no notification.
pub struct ViewportController {
    current: Mutex<Viewport>,
    listeners: Mutex<Vec<Arc<dyn ViewportListener>>>,
}

impl ViewportController {
    /// Controller starting from `initial`.
    pub fn new(initial: Viewport) -> Self {
        Self {
            current: Mutex::new(initial),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Controller showing the minimum one-minute content range at `width` pixels.
    pub fn with_width(width: f64) -> Result<Self, ViewportError> {
        Ok(Self::new(Viewport::full(MINIMUM_MAX_END, width)?))
    }

    /// Register a listener for subsequent changes.
    pub fn add_listener(&self, listener: Arc<dyn ViewportListener>) {
        lock(&self.listeners).push(listener);
    }

    /// Current snapshot.
    pub fn viewport(&self) -> Viewport {
        *lock(&self.current)
    }

    /// Show `[start, end]`.
    pub fn set_window(&self, start: i64, end: i64) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| v.with_window(start, end))
    }

    /// Change the content bound, keeping the window.
    pub fn set_max_end(&self, max_end: i64) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| v.with_max_end(max_end))
    }

    /// Change the content bound and show all of it.
    pub fn set_max_end_and_reset(&self, max_end: i64) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| Viewport::full(max_end, v.width()))
    }

    /// Change the pixel width, keeping the window.
    pub fn resize(&self, width: f64) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| v.with_width(width))
    }

    /// Zoom to `level` anchored at `center`.
    pub fn zoom_to(&self, level: f64, center: i64) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| v.zoom(level, center))
    }

    /// Show the whole content range.
    pub fn reset(&self) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| Ok(v.reset()))
    }

    /// Scroll the window by `delta` ticks.
    pub fn pan_by(&self, delta: i64) -> Result<Option<ViewportChange>, ViewportError> {
        self.update(|v| Ok(v.pan(delta)))
    }

    /// Read-modify-write of the snapshot under the controller lock.
    fn update<F>(&self, next: F) -> Result<Option<ViewportChange>, ViewportError>
    where
        F: FnOnce(&Viewport) -> Result<Viewport, ViewportError>,
    {
        let mut current = lock(&self.current);
        let candidate = next(&current)?;
        if candidate == *current {
            trace!("Viewport unchanged; no notification");
            return Ok(None);
        }

        let change = ViewportChange {
            old: *current,
            new: candidate,
        };
        *current = candidate;
        debug!(
            start = candidate.start(),
            end = candidate.end(),
            max_end = candidate.max_end(),
            width = candidate.width(),
            "Viewport changed"
        );

        let listeners: Vec<_> = lock(&self.listeners).clone();
        for listener in &listeners {
            listener.on_viewport_changed(&change);
        }
        Ok(Some(change))
    }
}

impl std::fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("current", &self.viewport())
            .field("listeners", &lock(&self.listeners).len())
            .finish()
    }
}

/// Lock ignoring poisoning: a snapshot is replaced whole, never half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
