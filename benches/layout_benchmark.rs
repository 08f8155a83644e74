//! Layout and hit-test benchmarks.
//!
//! A full pass over a sheet of a few thousand intervals should stay well
//! under a frame; hit-testing should scale logarithmically with track size.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sheetline::layout::{layout, LayoutParams, LayoutPolicy};
use sheetline::model::{Interval, Track, TrackIndex};

/// Generate `tracks` tracks of `per_track` intervals with staggered onsets.
fn generate_tracks(tracks: usize, per_track: usize) -> Vec<Track> {
    (0..tracks)
        .map(|t| {
            let owner = TrackIndex::new(t);
            let intervals = (0..per_track)
                .map(|i| {
                    let onset = (i as i64) * 1000 + (t as i64) * 250;
                    let offset = onset + 600 + ((i % 4) as i64) * 300;
                    Interval::new(onset, offset, owner).expect("onset before offset")
                })
                .collect();
            Track::new(owner, intervals).expect("onset-sorted track")
        })
        .collect()
}

fn benchmark_layout_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_policies");
    let params = LayoutParams::default();

    for per_track in [100, 1_000, 10_000] {
        let tracks = generate_tracks(8, per_track);
        for policy in [LayoutPolicy::Weak, LayoutPolicy::Strong, LayoutPolicy::Ordinal] {
            group.bench_with_input(
                BenchmarkId::new(policy.as_str(), per_track * 8),
                &tracks,
                |b, tracks| {
                    b.iter(|| layout(black_box(policy), black_box(tracks), &params, |_, _| 20));
                },
            );
        }
    }

    group.finish();
}

fn benchmark_hit_test(c: &mut Criterion) {
    let tracks = generate_tracks(1, 100_000);
    let result = layout(LayoutPolicy::Weak, &tracks, &LayoutParams::default(), |_, _| 20)
        .expect("valid layout");
    let height = result.content_height();
    let track = TrackIndex::new(0);

    let mut group = c.benchmark_group("hit_test_100k");
    for (name, y) in [
        ("start", 0),
        ("middle", height / 2),
        ("end", height.saturating_sub(1)),
    ] {
        group.bench_with_input(BenchmarkId::new("position", name), &y, |b, &y| {
            b.iter(|| result.hit_test(black_box(track), black_box(y)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_layout_policies, benchmark_hit_test);
criterion_main!(benches);
