//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod error;
pub mod identifiers;
pub mod interval;
pub mod track;

// Re-export for convenience
pub use error::{
    AppError, InputError, InvalidInterval, LayoutError, ParseError, ViewportError,
};
pub use identifiers::{IntervalId, TrackIndex};
pub use interval::{is_valid_tick, Interval, MAX_TICK, MIN_TICK};
pub use track::Track;
