//! # Dedup Engine Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | Unit add / test | < 1μs per item |
//! | Batch add, 1000 URLs | < 1ms |
//! | Batch exists on a grown chain | linear in chain length |
//! | Snapshot encode / decode | proportional to bit array size |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dedup_filters::{
    AllowList, BatchCoordinator, ChainSnapshot, CollectionRegistry, FilterChain, FilterConfig,
    FilterUnit,
};
use rand::Rng;

fn random_urls(count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            format!(
                "https://{:x}.example.com/{:x}",
                rng.gen::<u32>(),
                rng.gen::<u64>()
            )
        })
        .collect()
}

fn coordinator(config: FilterConfig) -> BatchCoordinator {
    let registry = Arc::new(CollectionRegistry::new(AllowList::default(), config).unwrap());
    BatchCoordinator::new(registry)
}

fn bench_filter_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter-unit");

    for capacity in [1_000usize, 100_000, 1_000_000] {
        let urls = random_urls(1_000);
        let mut unit = FilterUnit::try_new(capacity, 0.005, 1 << 34).unwrap();
        for url in &urls[..500] {
            unit.add(url.as_bytes());
        }

        group.throughput(Throughput::Elements(urls.len() as u64));
        group.bench_with_input(BenchmarkId::new("test", capacity), &urls, |b, urls| {
            b.iter(|| {
                let mut hits = 0u32;
                for url in urls {
                    if unit.test(url.as_bytes()) {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }

    group.finish();
}

fn bench_batch_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch-add");
    group.measurement_time(Duration::from_secs(10));

    for size in [100usize, 1_000, 10_000] {
        let urls = random_urls(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("fresh_collection", size), &urls, |b, urls| {
            b.iter_with_setup(
                || coordinator(FilterConfig::default()),
                |coordinator| black_box(coordinator.batch_add("main", urls).unwrap()),
            )
        });
    }

    group.finish();
}

fn bench_exists_on_grown_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch-exists");

    // Default growth: 100 * (2^n - 1) items fill n units.
    for units in [1usize, 5, 10] {
        let coordinator = coordinator(FilterConfig::default());
        let fill = 100 * ((1 << units) - 1);
        coordinator.batch_add("urls", &random_urls(fill)).unwrap();

        let probes = random_urls(1_000);
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_with_input(BenchmarkId::new("units", units), &probes, |b, probes| {
            b.iter(|| black_box(coordinator.batch_test("urls", probes).unwrap()))
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");

    let name = AllowList::default().validate("main").unwrap();
    let mut chain = FilterChain::new(name, &FilterConfig::default()).unwrap();
    for url in random_urls(100_000) {
        chain.add(url.as_bytes()).unwrap();
    }
    let snapshot = chain.to_snapshot();
    let encoded = snapshot.encode().unwrap();

    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("encode", |b| b.iter(|| black_box(snapshot.encode().unwrap())));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(ChainSnapshot::decode("main", &encoded).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_unit,
    bench_batch_add,
    bench_exists_on_grown_chain,
    bench_snapshot
);
criterion_main!(benches);
