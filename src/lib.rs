//! sheetline
//!
//! Temporal layout and viewport engine for time-coded annotation
//! spreadsheets. Intervals live in tracks; a layout policy turns them into
//! vertical cell geometry, and a viewport maps ticks to pixels for zooming
//! and panning along the timeline.
//!
//! The library follows a Pure Core / Impure Shell split: `model`, `layout`,
//! `viewport` and `view` are pure; `source`, `logging` and the binary do
//! the I/O.

pub mod config;
pub mod integration;
pub mod layout;
pub mod logging;
pub mod model;
pub mod parser;
pub mod source;
pub mod state;
pub mod view;
pub mod viewport;
