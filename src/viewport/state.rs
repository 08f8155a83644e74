//! Immutable viewport snapshot and its time/pixel mapping.

use crate::model::{ViewportError, MAX_TICK};
use serde::Serialize;

/// Smallest content bound a fresh timeline starts with (one minute of ticks).
pub const MINIMUM_MAX_END: i64 = 60_000;

/// Finest zoom: one tick per pixel.
pub const LOWER_MS_PER_PIXEL: f64 = 1.0;

/// Content length used for the coarsest zoom when there is no content.
const EMPTY_CONTENT_SPAN: i64 = 24 * 60 * 60 * 1000;

/// Visible time window mapped onto a fixed pixel width.
///
/// # Invariants
/// - `0 <= start <= end <= MAX_TICK`
/// - `0 <= max_end <= MAX_TICK`
/// - `width >= 0` and finite
///
/// Every operation returns a new value; a `Viewport` is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    max_end: i64,
    width: f64,
    start: i64,
    end: i64,
}

impl Viewport {
    /// Smart constructor validating the window, content bound and width.
    pub fn new(max_end: i64, width: f64, start: i64, end: i64) -> Result<Self, ViewportError> {
        if max_end < 0 {
            return Err(ViewportError::NegativeMaxEnd(max_end));
        }
        if max_end > MAX_TICK {
            return Err(ViewportError::MaxEndOutOfRange {
                got: max_end,
                max: MAX_TICK,
            });
        }
        if !width.is_finite() || width < 0.0 {
            return Err(ViewportError::InvalidWidth(width));
        }
        if start < 0 || start > end || end > MAX_TICK {
            return Err(ViewportError::InvalidWindow { start, end });
        }
        Ok(Self {
            max_end,
            width,
            start,
            end,
        })
    }

    /// Viewport showing the whole content range `[0, max_end]`.
    pub fn full(max_end: i64, width: f64) -> Result<Self, ViewportError> {
        Self::new(max_end, width, 0, max_end.max(0))
    }

    /// End time of the longest track.
    pub fn max_end(&self) -> i64 {
        self.max_end
    }

    /// Pixel width the window is drawn into.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// First visible tick.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last visible tick.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Ticks per pixel; NaN when the width is zero.
    pub fn resolution(&self) -> f64 {
        if self.width > 0.0 {
            (self.end - self.start) as f64 / self.width
        } else {
            f64::NAN
        }
    }

    /// Number of ticks in the window, both ends inclusive.
    pub fn view_duration(&self) -> i64 {
        self.end - self.start + 1
    }

    fn usable_resolution(&self) -> Option<f64> {
        let resolution = self.resolution();
        (resolution.is_finite() && resolution > 0.0).then_some(resolution)
    }

    /// Unrounded pixel offset of `time` from the window start.
    pub fn pixel_offset(&self, time: i64) -> f64 {
        (time - self.start) as f64 / self.resolution()
    }

    /// Pixel column of `time`, or `None` when the window has no usable resolution.
    pub fn time_to_pixel(&self, time: i64) -> Option<i64> {
        let resolution = self.usable_resolution()?;
        Some(((time - self.start) as f64 / resolution).round() as i64)
    }

    /// Number of ticks spanned by `pixels`.
    pub fn pixel_to_ticks(&self, pixels: f64) -> i64 {
        match self.usable_resolution() {
            Some(resolution) => (pixels * resolution).round() as i64,
            None => 0,
        }
    }

    /// Absolute time under pixel column `pixel`; inverse of [`Self::time_to_pixel`].
    pub fn pixel_to_time(&self, pixel: f64) -> i64 {
        self.start + self.pixel_to_ticks(pixel)
    }

    /// Whether `time` lies inside the window.
    pub fn is_time_in_viewport(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }

    /// Whether pixel offset `offset` lies between the window edges.
    pub fn is_offset_in_viewport(&self, offset: f64) -> bool {
        self.pixel_offset(self.start) <= offset && offset <= self.pixel_offset(self.end)
    }

    /// Whether the window shows the entire content range.
    pub fn is_entire_track_visible(&self) -> bool {
        self.start == 0 && self.end == self.max_end
    }

    /// Coarsest zoom: the whole content fits the width.
    pub fn upper_ms_per_pixel(&self) -> f64 {
        let span = if self.max_end > 0 {
            self.max_end
        } else {
            EMPTY_CONTENT_SPAN
        };
        (span as f64 / self.width).ceil()
    }

    /// Resolution selected by zoom `level`: exponential between the bounds.
    pub fn ms_per_pixel_for(&self, level: f64) -> f64 {
        let upper = self.upper_ms_per_pixel();
        let value = LOWER_MS_PER_PIXEL * ((upper / LOWER_MS_PER_PIXEL).ln() * (1.0 - level)).exp();
        value.max(LOWER_MS_PER_PIXEL).min(upper)
    }

    /// Zoom level that would select `ms_per_pixel`.
    pub fn zoom_level_for(&self, ms_per_pixel: f64) -> f64 {
        if self.width <= 0.0 || ms_per_pixel.is_nan() {
            return 0.0;
        }
        let upper = self.upper_ms_per_pixel();
        if ms_per_pixel >= upper {
            return 0.0;
        }
        let value = 1.0 - (ms_per_pixel / LOWER_MS_PER_PIXEL).ln() / (upper / LOWER_MS_PER_PIXEL).ln();
        value.max(0.0).min(1.0)
    }

    /// Current zoom level in `[0, 1]`.
    pub fn zoom_level(&self) -> f64 {
        self.zoom_level_for(self.resolution())
    }

    /// Zoom to `level`, keeping `center` at the same relative pixel position.
    ///
    /// A `center` outside the current window falls back to the window midpoint.
    /// Levels outside `[0, 1]` are clamped. A zero-width viewport is returned
    /// unchanged.
    ///
    /// # Errors
    /// [`ViewportError::InvalidZoomLevel`] if `level` is not finite.
    pub fn zoom(&self, level: f64, center: i64) -> Result<Self, ViewportError> {
        if !level.is_finite() {
            return Err(ViewportError::InvalidZoomLevel(level));
        }
        if self.width <= 0.0 {
            return Ok(*self);
        }
        let ms_per_pixel = self.ms_per_pixel_for(level.max(0.0).min(1.0));

        let (anchor, ratio) = if center >= 0 && self.is_time_in_viewport(center) {
            let anchor = center.min(self.max_end);
            let ratio = (anchor - self.start) as f64 / self.view_duration() as f64;
            (anchor, ratio)
        } else {
            ((self.start + self.end) / 2, 0.5)
        };
        let ratio = ratio.max(0.0).min(1.0);

        let range = ((ms_per_pixel * self.width).round() as i64)
            .max(1)
            .min(self.max_end + 1);

        let mut start = (anchor as f64 - ratio * range as f64).round() as i64;
        if start + range > self.max_end {
            start = self.max_end - range + 1;
        }
        let start = start.max(0);
        Self::new(self.max_end, self.width, start, start + range - 1)
    }

    /// Same content bound and width with a new window.
    pub fn with_window(&self, start: i64, end: i64) -> Result<Self, ViewportError> {
        Self::new(self.max_end, self.width, start, end)
    }

    /// Same window with a new content bound.
    pub fn with_max_end(&self, max_end: i64) -> Result<Self, ViewportError> {
        Self::new(max_end, self.width, self.start, self.end)
    }

    /// Same window drawn into a new pixel width.
    pub fn with_width(&self, width: f64) -> Result<Self, ViewportError> {
        Self::new(self.max_end, width, self.start, self.end)
    }

    /// Window reset to show the whole content.
    pub fn reset(&self) -> Self {
        Self {
            start: 0,
            end: self.max_end,
            ..*self
        }
    }

    /// Window shifted by `delta` ticks, kept inside `[0, max_end]` where it fits.
    pub fn pan(&self, delta: i64) -> Self {
        let span = self.end - self.start;
        let start = self
            .start
            .saturating_add(delta)
            .min(self.max_end - span)
            .max(0);
        Self {
            start,
            end: start + span,
            ..*self
        }
    }
}
