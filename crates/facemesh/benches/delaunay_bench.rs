//! Criterion benchmarks for incremental triangulation.
//! Focus sizes: the common detector families (68, 468) plus a small and a
//! large synthetic count to show the O(n^2) insertion curve.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use facemesh::delaunay::{triangulate, Rect};
use facemesh::landmark::PointSet;
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(n: usize, seed: u64) -> PointSet {
    let mut rng = StdRng::seed_from_u64(seed);
    PointSet::from_points(
        (0..n)
            .map(|_| {
                Vector2::new(
                    rng.gen_range(1.0..511.0f64),
                    rng.gen_range(1.0..511.0f64),
                )
            })
            .collect(),
    )
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("delaunay");
    let region = Rect::of_image(512, 512);
    for &n in &[10usize, 68, 200, 468] {
        group.bench_with_input(BenchmarkId::new("triangulate", n), &n, |b, &n| {
            b.iter_batched(
                || random_points(n, 43),
                |pts| {
                    let _tris = triangulate(&pts, region).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_triangulate);
criterion_main!(benches);
