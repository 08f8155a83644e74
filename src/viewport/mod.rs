//! Visible time window and its dependents.
//!
//! # Module Structure
//!
//! - `state`: Viewport - immutable window snapshot with time/pixel mapping and zoom
//! - `controller`: ViewportController - locked current snapshot plus change fan-out
//! - `overlay`: RegionState, NeedleState, OverlayModel - follow content bound changes
//! - `timeline`: Timeline - controller and overlays driven together

pub mod controller;
pub mod overlay;
pub mod state;
pub mod timeline;

pub use controller::{ViewportChange, ViewportController, ViewportListener};
pub use overlay::{NeedleState, OverlayModel, RegionState};
pub use state::{Viewport, MINIMUM_MAX_END};
pub use timeline::Timeline;
