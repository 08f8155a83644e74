//! Property-based tests for viewport zoom and pixel mapping.
//!
//! Widths are whole pixels and content bounds whole multiples of the width,
//! so the coarsest resolution is exact and no window gets clamped.

use proptest::prelude::*;
use sheetline::viewport::Viewport;

/// Window strictly between the finest and coarsest resolution.
fn mid_zoom_viewport() -> impl Strategy<Value = Viewport> {
    (100i64..2000, 3i64..200)
        .prop_flat_map(|(width, factor)| {
            let max_end = width * factor;
            (Just(width), Just(max_end), 2 * width..=(factor - 1) * width)
        })
        .prop_flat_map(|(width, max_end, span)| (Just(width), Just(max_end), Just(span), 0..=max_end - span))
        .prop_map(|(width, max_end, span, start)| Viewport::new(max_end, width as f64, start, start + span).unwrap())
}

/// Coarse window with a centre inside it and a finer target resolution.
fn zoom_in_case() -> impl Strategy<Value = (Viewport, i64, f64)> {
    (200i64..1000, 100i64..900)
        .prop_flat_map(|(width, coarse)| {
            let max_end = width * 1000;
            let span = width * coarse;
            (Just(width), Just(max_end), Just(span), 0..=max_end - span, 10.0..coarse as f64)
        })
        .prop_flat_map(|(width, max_end, span, start, fine)| {
            (
                Just(Viewport::new(max_end, width as f64, start, start + span).unwrap()),
                start..=start + span,
                Just(fine),
            )
        })
}

/// Window at one tick per pixel or coarser.
fn mapping_case() -> impl Strategy<Value = (Viewport, i64)> {
    (100i64..2000, 1i64..50, 0i64..1_000_000)
        .prop_map(|(width, ratio, start)| {
            let span = width * ratio;
            Viewport::new(start + span + 1, width as f64, start, start + span).unwrap()
        })
        .prop_flat_map(|viewport| {
            let width = viewport.width() as i64;
            (Just(viewport), 0..=width)
        })
}

proptest! {
    #[test]
    fn zoom_level_round_trips_resolution(viewport in mid_zoom_viewport()) {
        let zoomed = viewport.zoom(viewport.zoom_level(), viewport.start()).unwrap();
        let tolerance = 2.5 / viewport.width();
        prop_assert!(
            (zoomed.resolution() - viewport.resolution()).abs() <= tolerance,
            "resolution {} became {}",
            viewport.resolution(),
            zoomed.resolution()
        );
    }

    #[test]
    fn zoom_keeps_centre_on_the_same_pixel((viewport, center, fine) in zoom_in_case()) {
        let before = (center - viewport.start()) as f64 / viewport.resolution();
        let zoomed = viewport.zoom(viewport.zoom_level_for(fine), center).unwrap();
        let after = (center - zoomed.start()) as f64 / zoomed.resolution();
        prop_assert!((after - before).abs() <= 1.0, "pixel {} moved to {}", before, after);
    }

    #[test]
    fn pixel_time_mapping_round_trips((viewport, pixel) in mapping_case()) {
        let time = viewport.pixel_to_time(pixel as f64);
        prop_assert_eq!(viewport.time_to_pixel(time), Some(pixel));
    }

    #[test]
    fn zoom_level_stays_in_unit_range(viewport in mid_zoom_viewport(), level in -2.0f64..3.0) {
        let zoomed = viewport.zoom(level, viewport.start()).unwrap();
        let zoom_level = zoomed.zoom_level();
        prop_assert!((0.0..=1.0).contains(&zoom_level));
        prop_assert!(zoomed.end() <= zoomed.max_end());
    }
}
