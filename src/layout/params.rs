//! Global layout parameters.

/// Vertical spacing (px) inserted at a time discontinuity.
pub const DEFAULT_GAP: i32 = 3;

/// Fixed margin (px) below the tallest track.
pub const DEFAULT_BOTTOM_MARGIN: i32 = 5;

/// Ticks per second (millisecond ticks).
pub const DEFAULT_TICKS_PER_SECOND: i64 = 1000;

/// Scroll extent (px) for short recordings under the strong policy.
pub const DEFAULT_MIN_SCROLL_PIXELS: i32 = 2000;

/// Scroll extent (px) for very long recordings under the strong policy.
pub const DEFAULT_MAX_SCROLL_PIXELS: i32 = 10000;

/// Parameters shared by every layout policy.
///
/// Used for invalidation: if current params != last layout params,
/// a full relayout is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Vertical gap inserted between non-adjacent time regions.
    pub gap: i32,
    /// Margin added below the content.
    pub bottom_margin: i32,
    /// Tick resolution used to convert ranges to seconds.
    pub ticks_per_second: i64,
    /// Strong policy: pixel extent for ranges under 600 s.
    pub min_scroll_pixels: i32,
    /// Strong policy: pixel extent for ranges of 10000 s and more.
    pub max_scroll_pixels: i32,
}

impl LayoutParams {
    /// Create params with the given gap and bottom margin, other values default.
    pub fn new(gap: i32, bottom_margin: i32) -> Self {
        Self {
            gap,
            bottom_margin,
            ..Self::default()
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            min_scroll_pixels: DEFAULT_MIN_SCROLL_PIXELS,
            max_scroll_pixels: DEFAULT_MAX_SCROLL_PIXELS,
        }
    }
}
