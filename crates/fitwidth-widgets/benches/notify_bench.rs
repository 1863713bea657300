//! Notification throughput: how much a viewport event costs per mounted
//! instance when nothing changed versus when every instance re-measures.
//!
//! Run with: cargo bench -p fitwidth-widgets -- notify

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use fitwidth_core::{ProbeConfig, RemeasurePolicy};
use fitwidth_harness::{HostTree, NodeStyle, Stage};
use fitwidth_widgets::{AvailableWidth, Content, WidthProps, content_fn};

fn width_only() -> impl Content<(), Output = u32> {
    content_fn(|p: &WidthProps<'_, ()>| p.available_width.get())
}

fn staged(count: u64, policy: RemeasurePolicy) -> Stage {
    let mut stage = Stage::new(HostTree::new(1200));
    let root = stage.root();
    let widget = AvailableWidth::new(width_only())
        .config(ProbeConfig::default().with_policy(policy));
    for _ in 0..count {
        let slot = stage.tree().append(root, NodeStyle::block());
        stage.mount(&widget, (), slot).expect("mount");
    }
    stage
}

// ---------------------------------------------------------------------------
// 1. Spurious notifications (unchanged width)
// ---------------------------------------------------------------------------

fn bench_spurious(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify/spurious");
    for count in [10, 100, 1_000] {
        group.throughput(Throughput::Elements(count));
        let mut stage = staged(count, RemeasurePolicy::InPlace);
        group.bench_with_input(BenchmarkId::from_parameter(count), &(), |b, _| {
            b.iter(|| black_box(stage.nudge_viewport()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. Every instance re-measures
// ---------------------------------------------------------------------------

fn bench_remeasure(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify/remeasure");
    for policy in [RemeasurePolicy::InPlace, RemeasurePolicy::FullReset] {
        for count in [10, 100] {
            group.throughput(Throughput::Elements(count));
            let mut stage = staged(count, policy);
            let mut wide = false;
            group.bench_with_input(BenchmarkId::new(policy.as_str(), count), &(), |b, _| {
                b.iter(|| {
                    wide = !wide;
                    black_box(stage.resize_viewport(if wide { 1280 } else { 1200 }))
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_spurious, bench_remeasure);
criterion_main!(benches);
