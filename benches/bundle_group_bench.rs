//! Throughput benchmark for `BundleGroup::resolve` across a range of
//! cluster sizes.

use aletsch_core::{BundleGroup, Config, Interval, PhaseSet, WeightedCount};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Deterministic xorshift, good enough to spread synthetic splice sites
/// across a handful of clusters without pulling in a dependency the
/// library itself has no other use for.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn synthetic_gset(n: usize, seed: u64) -> Vec<aletsch_core::CombinedGraph> {
    let mut rng = Xorshift(seed | 1);
    (0..n)
        .map(|_| {
            let cluster_base = rng.below(20) as i32 * 1000;
            let mut splices: Vec<i32> = (0..8)
                .map(|k| cluster_base + k * 100 + rng.below(5) as i32)
                .collect();
            splices.sort_unstable();
            splices.dedup();

            let mut g = aletsch_core::CombinedGraph::new();
            g.chrm = "chr1".to_string();
            g.strand = '+';
            g.num_combined = 1;
            g.splices = splices;
            g.junctions = g
                .splices
                .windows(2)
                .map(|w| (Interval::new(w[0], w[0] + 1), WeightedCount::new(1.0, 1)))
                .collect();
            g.ps = PhaseSet::new();
            g
        })
        .collect()
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("bundle_group_resolve");
    for &n in &[64usize, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || synthetic_gset(n, 42),
                |gset| {
                    let cfg = Config::default();
                    let bg = BundleGroup::new("chr1", '+', &gset, cfg);
                    black_box(bg.resolve());
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_resolve);
criterion_main!(benches);
