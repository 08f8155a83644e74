//! Property-based tests for layout invariants.
//!
//! Tests validate:
//! 1. Intervals of one track never overlap vertically (weak and strong)
//! 2. Simultaneous onsets in different tracks share a top edge (weak)
//! 3. Content height covers every cell

use proptest::prelude::*;
use sheetline::layout::{layout, LayoutParams, LayoutPolicy, LayoutResult};
use sheetline::model::{Interval, IntervalId, Track, TrackIndex};
use std::collections::HashMap;

fn build_tracks(spans: Vec<Vec<(i64, i64)>>) -> Vec<Track> {
    spans
        .into_iter()
        .enumerate()
        .map(|(index, mut spans)| {
            spans.sort_by_key(|&(onset, _)| onset);
            let owner = TrackIndex::new(index);
            let intervals = spans
                .into_iter()
                .map(|(onset, length)| Interval::new(onset, onset + length, owner).unwrap())
                .collect();
            Track::new(owner, intervals).unwrap()
        })
        .collect()
}

fn preferred(id: IntervalId, _: &Interval) -> i32 {
    5 + (id.position as i32 % 3) * 7
}

/// Arbitrary onset-sorted tracks; duplicate onsets and overlaps allowed.
fn any_tracks() -> impl Strategy<Value = Vec<Track>> {
    prop::collection::vec(prop::collection::vec((0i64..200, 0i64..100), 0..10), 0..5).prop_map(build_tracks)
}

/// Tracks with strictly increasing onsets on a coarse grid, so onsets often
/// coincide across tracks.
fn grid_tracks() -> impl Strategy<Value = Vec<Track>> {
    let track = prop::collection::btree_set(0i64..20, 0..8).prop_flat_map(|slots| {
        let onsets: Vec<i64> = slots.into_iter().map(|slot| slot * 10).collect();
        let count = onsets.len();
        (Just(onsets), prop::collection::vec(1i64..30, count))
    });
    prop::collection::vec(track, 1..5).prop_map(|tracks| {
        build_tracks(
            tracks
                .into_iter()
                .map(|(onsets, lengths)| onsets.into_iter().zip(lengths).collect())
                .collect(),
        )
    })
}

fn assert_no_overlap(tracks: &[Track], result: &LayoutResult) -> Result<(), TestCaseError> {
    for track in tracks {
        let cells = result.track(track.index());
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                if a.height == 0 || b.height == 0 {
                    continue;
                }
                prop_assert!(
                    a.bottom() <= b.y_top || b.bottom() <= a.y_top,
                    "cells {:?} and {:?} overlap in track {}",
                    a,
                    b,
                    track.index()
                );
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn weak_cells_never_overlap_within_a_track(tracks in any_tracks()) {
        let result = layout(LayoutPolicy::Weak, &tracks, &LayoutParams::default(), preferred).unwrap();
        assert_no_overlap(&tracks, &result)?;
    }

    #[test]
    fn strong_cells_never_overlap_within_a_track(tracks in any_tracks()) {
        let result = layout(LayoutPolicy::Strong, &tracks, &LayoutParams::default(), preferred).unwrap();
        assert_no_overlap(&tracks, &result)?;
    }

    #[test]
    fn weak_aligns_simultaneous_onsets(tracks in grid_tracks()) {
        let result = layout(LayoutPolicy::Weak, &tracks, &LayoutParams::default(), preferred).unwrap();

        let mut tops: HashMap<i64, i32> = HashMap::new();
        for track in &tracks {
            for (id, interval) in track.iter() {
                let y_top = result.geometry(id).unwrap().y_top;
                let first = *tops.entry(interval.onset()).or_insert(y_top);
                prop_assert_eq!(first, y_top, "onset {} misaligned in track {}", interval.onset(), track.index());
            }
        }
    }

    #[test]
    fn weak_cells_keep_their_preferred_height(tracks in any_tracks()) {
        let result = layout(LayoutPolicy::Weak, &tracks, &LayoutParams::default(), preferred).unwrap();
        for track in &tracks {
            for (id, interval) in track.iter() {
                prop_assert!(result.geometry(id).unwrap().height >= preferred(id, interval));
            }
        }
    }

    #[test]
    fn content_height_covers_every_cell(tracks in any_tracks(), policy in prop_oneof![
        Just(LayoutPolicy::Weak),
        Just(LayoutPolicy::Strong),
        Just(LayoutPolicy::Ordinal),
    ]) {
        let result = layout(policy, &tracks, &LayoutParams::default(), preferred).unwrap();
        prop_assert!(result.content_height() >= result.max_bottom());
    }
}
