//! Sheet state and layout scheduling.
//!
//! `sheet` owns tracks and the last good layout; `worker` runs passes on a
//! background thread and hands results back over a channel.

pub mod sheet;
pub mod worker;

pub use sheet::{LayoutListener, SheetState};
pub use worker::{LayoutRequest, LayoutResponse, LayoutWorker, WorkerStopped};
