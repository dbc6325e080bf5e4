use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use damascus::{alpha_shape_edges, stitch, AlphaShape, RegionClusterer};
use ndarray::{array, concatenate, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn field(center: [f64; 2], n: usize) -> Array2<f64> {
    Array2::random((n, 2), Uniform::new(-1., 1.)) + &array![center[0], center[1]]
}

fn hull_benchmark(c: &mut Criterion) {
    let mut hull = c.benchmark_group("hull");
    hull.sample_size(20);

    let points = field([0., 0.], 2_000);
    hull.bench_function("alpha shape", |b| {
        b.iter_batched(
            || AlphaShape::new(points.clone(), 0.1),
            |shape| shape.hulls(),
            BatchSize::SmallInput,
        )
    });

    let edges = alpha_shape_edges(points.view(), 0.1, true).unwrap();
    hull.bench_function("stitch", |b| b.iter(|| stitch(&edges)));
}

fn regions_benchmark(c: &mut Criterion) {
    let mut regions = c.benchmark_group("regions");
    regions.sample_size(10);

    let points = concatenate![
        Axis(0),
        field([0., 0.], 5_000),
        field([10., 0.], 5_000),
        field([0., 10.], 5_000)
    ];
    let clusterer = RegionClusterer::new(0.2, 3_000);

    regions.bench_function("regions blocking", |b| {
        b.iter(|| clusterer.cluster_regions(points.view(), &mut StdRng::seed_from_u64(0)))
    });

    regions.bench_function("regions parallel", |b| {
        b.iter(|| clusterer.cluster_regions_par(points.view(), &mut StdRng::seed_from_u64(0)))
    });
}

criterion_group!(benches, hull_benchmark, regions_benchmark);
criterion_main!(benches);
