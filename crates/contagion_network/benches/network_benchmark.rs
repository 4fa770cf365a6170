//! # Network Generation Benchmark
//!
//! Preferential attachment cost as N grows. Sampling walks the degree
//! sequence, so growth is O(N² · M) in the worst case.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use contagion_network::{GraphBuilder, NetworkConfig};

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_build");

    for node_count in [100, 500, 2_000] {
        let builder = GraphBuilder::new(NetworkConfig::new(node_count, 4, 4)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("preferential_attachment", node_count),
            &node_count,
            |b, _| {
                b.iter(|| black_box(builder.build_seeded(42)));
            },
        );
    }

    group.finish();
}

fn bench_dense_export(c: &mut Criterion) {
    let network = GraphBuilder::new(NetworkConfig::new(500, 4, 4))
        .unwrap()
        .build_seeded(42);

    c.bench_function("dense_adjacency_500", |b| {
        b.iter(|| black_box(network.adjacency().to_dense_i32()));
    });
}

criterion_group!(benches, bench_build, bench_dense_export);
criterion_main!(benches);
