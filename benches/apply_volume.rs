//! Full-set volume application benchmark.
//!
//! Measures the per-element cost of the apply-walk (resolve + write) at
//! different tracked-set sizes, plus the bare resolver.
//!
//! Run with: cargo bench --bench apply_volume
//! Results saved to: target/criterion/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tab_mixer::dom::sim::SimDocument;
use tab_mixer::mixer::{ElementTracker, MixerState, resolve};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const ELEMENT_COUNTS: &[usize] = &[10, 100, 1000];

// ============================================================================
// Benchmark: Resolver
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve", |b| {
        b.iter(|| {
            black_box(resolve(
                black_box(0.8),
                black_box(0.5),
                black_box(0.9),
                black_box(false),
            ))
        });
    });
}

// ============================================================================
// Benchmark: Full-Set Application
// ============================================================================

fn bench_apply_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_walk");

    for &count in ELEMENT_COUNTS {
        let document = SimDocument::new();
        for i in 0..count {
            let original = f64::from(u32::try_from(i % 100).unwrap_or_default()) / 100.0;
            document.insert_media_silently(original);
        }

        let tracker = ElementTracker::new();
        let state = MixerState {
            tab_volume: 0.5,
            master_volume: 0.8,
            muted: false,
        };
        tracker.discover(document.as_ref(), &state);

        group.bench_with_input(BenchmarkId::new("elements", count), &count, |b, _| {
            b.iter(|| {
                for handle in tracker.snapshot() {
                    let element = handle.element();
                    if element.is_connected() {
                        element.set_volume(state.effective(handle.original_volume()));
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_apply_walk);
criterion_main!(benches);
