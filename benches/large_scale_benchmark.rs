use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use geoflux::prelude::*;
use rand::Rng;
use std::hint::black_box;
use std::time::Duration;

fn bench_100k_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("100K Clustered");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(90)); // Room for the slow contender

    // Dataset generation: three wide bands of similar values, the shape
    // block migration is built for.
    let mut rng = rand::rng();
    let count = 100_000;
    let third = count / 3;

    let mut clustered: Vec<u32> = Vec::with_capacity(count);
    clustered.extend((0..third).map(|_| rng.random_range(1..=10)));
    clustered.extend((0..third).map(|_| rng.random_range(40..=50)));
    clustered.extend((0..count - 2 * third).map(|_| rng.random_range(90..=100)));

    group.throughput(Throughput::Elements(count as u64));

    // Geoflux
    group.bench_function("geoflux_sort (in-place)", |b| {
        b.iter_batched(
            || clustered.clone(),
            |mut data| geoflux_sort(black_box(&mut data)).unwrap(),
            BatchSize::LargeInput,
        )
    });

    // Std Sort (Stable)
    group.bench_function("slice::sort (stable)", |b| {
        b.iter_batched(
            || clustered.clone(),
            |mut data| data.sort(),
            BatchSize::LargeInput,
        )
    });

    // Std Sort Unstable
    group.bench_function("slice::sort_unstable", |b| {
        b.iter_batched(
            || clustered.clone(),
            |mut data| data.sort_unstable(),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_100k_clustered);
criterion_main!(benches);
