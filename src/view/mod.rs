//! Plain-text and JSON reports of a laid-out sheet.
//!
//! Reports are built from the last good layout and the current viewport.
//! They are pure: rendering returns a `String` and never touches stdout.

use crate::layout::LayoutPolicy;
use crate::state::SheetState;
use crate::viewport::Viewport;
use serde::Serialize;
use std::fmt::Write;

/// Geometry and timing of one interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    /// Position within its track.
    pub position: usize,
    /// Onset in ticks.
    pub onset: i64,
    /// Offset in ticks.
    pub offset: i64,
    /// Top edge in pixels.
    pub y_top: i32,
    /// Height in pixels.
    pub height: i32,
    /// 1-based ordinal within the track.
    pub ordinal: usize,
    /// Shrunk or overlapping its successor.
    pub overlap: bool,
    /// Intersects the viewport window.
    pub visible: bool,
}

/// All cells of one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackReport {
    /// Dense track index used by the layout.
    pub index: usize,
    /// Track number as written in the input.
    pub input_track: usize,
    /// Cells in onset order.
    pub cells: Vec<CellReport>,
}

/// Viewport state included in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportReport {
    /// First visible tick.
    pub start: i64,
    /// Last visible tick.
    pub end: i64,
    /// Content bound.
    pub max_end: i64,
    /// Pixel width.
    pub width: f64,
    /// Ticks per pixel, absent when the width is zero.
    pub resolution: Option<f64>,
    /// Zoom level in `[0, 1]`.
    pub zoom_level: f64,
}

impl From<&Viewport> for ViewportReport {
    fn from(viewport: &Viewport) -> Self {
        let resolution = viewport.resolution();
        Self {
            start: viewport.start(),
            end: viewport.end(),
            max_end: viewport.max_end(),
            width: viewport.width(),
            resolution: resolution.is_finite().then_some(resolution),
            zoom_level: viewport.zoom_level(),
        }
    }
}

/// Serializable summary of a sheet's layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    /// Policy the layout was computed with.
    pub policy: LayoutPolicy,
    /// Total scrollable height.
    pub content_height: i32,
    /// Viewport the visibility flags refer to.
    pub viewport: ViewportReport,
    /// Per-track cells.
    pub tracks: Vec<TrackReport>,
}

impl LayoutReport {
    /// Build a report from the sheet's last good layout.
    ///
    /// `input_tracks[i]` is the input track number of dense track `i`; missing
    /// entries fall back to the dense index.
    pub fn new(sheet: &SheetState, input_tracks: &[usize], viewport: &Viewport) -> Self {
        let result = sheet.result();
        let tracks = sheet
            .tracks()
            .iter()
            .map(|track| {
                let index = track.index();
                let geometry = result.track(index);
                let cells = track
                    .intervals()
                    .iter()
                    .zip(geometry)
                    .enumerate()
                    .map(|(position, (interval, cell))| CellReport {
                        position,
                        onset: interval.onset(),
                        offset: interval.offset(),
                        y_top: cell.y_top,
                        height: cell.height,
                        ordinal: cell.ordinal,
                        overlap: cell.overlap,
                        visible: interval.onset() <= viewport.end() && interval.offset() >= viewport.start(),
                    })
                    .collect();
                TrackReport {
                    index: index.get(),
                    input_track: input_tracks.get(index.get()).copied().unwrap_or(index.get()),
                    cells,
                }
            })
            .collect();

        Self {
            policy: sheet.policy(),
            content_height: result.content_height(),
            viewport: ViewportReport::from(viewport),
            tracks,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn push_row(out: &mut String, columns: [&str; 6], flags: &str) {
    let line = format!(
        "{:<5} {:>3} {:>8} {:>8} {:>6} {:>6}  {}",
        columns[0], columns[1], columns[2], columns[3], columns[4], columns[5], flags
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

/// One row per interval followed by the content height.
pub fn render_layout_table(report: &LayoutReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "policy: {}", report.policy);
    push_row(&mut out, ["track", "pos", "onset", "offset", "y_top", "height"], "flags");

    for track in &report.tracks {
        for cell in &track.cells {
            let mut flags = Vec::new();
            if cell.overlap {
                flags.push("overlap");
            }
            if !cell.visible {
                flags.push("offscreen");
            }
            push_row(
                &mut out,
                [
                    &track.input_track.to_string(),
                    &cell.position.to_string(),
                    &cell.onset.to_string(),
                    &cell.offset.to_string(),
                    &cell.y_top.to_string(),
                    &cell.height.to_string(),
                ],
                &flags.join(","),
            );
        }
    }

    let _ = writeln!(out, "content height: {}", report.content_height);
    out
}

/// Window, content bound, resolution and zoom level on one line.
pub fn render_viewport_summary(viewport: &Viewport) -> String {
    let resolution = viewport.resolution();
    let resolution = if resolution.is_finite() {
        format!("{:.3} ticks/px", resolution)
    } else {
        "no resolution".to_string()
    };
    format!(
        "window {}..={} of {} at {} px ({}, zoom {:.3})\n",
        viewport.start(),
        viewport.end(),
        viewport.max_end(),
        viewport.width(),
        resolution,
        viewport.zoom_level()
    )
}
