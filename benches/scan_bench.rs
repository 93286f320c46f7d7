//! Scan throughput across pattern-set sizes
//!
//! Input size is fixed per group while the pattern set grows; the per-byte
//! cost should stay flat.

use acscan::{AcBuilder, BuildConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const INPUT_LEN: usize = 64 * 1024;

// Patterns use uppercase, input uses lowercase, so no scan stops early
fn generate_patterns(rng: &mut StdRng, count: usize, len: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|_| (0..len).map(|_| rng.random_range(b'A'..=b'Z')).collect())
        .collect()
}

fn generate_input(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.random_range(b'a'..=b'z')).collect()
}

fn bench_scan_by_pattern_count(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let input = generate_input(&mut rng, INPUT_LEN);

    let mut group = c.benchmark_group("scan_by_pattern_count");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));

    for count in [1, 10, 100, 1_000, 10_000] {
        let patterns = generate_patterns(&mut rng, count, 12);
        // prefilter off: measure the table walk itself
        let ac = AcBuilder::new(BuildConfig::new().with_prefilter(false))
            .build(&patterns)
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| black_box(ac.find(black_box(input))))
        });
    }

    group.finish();
}

fn bench_scan_by_pattern_len(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x1e9);
    let input = generate_input(&mut rng, INPUT_LEN);

    let mut group = c.benchmark_group("scan_by_pattern_len");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));

    for len in [2, 8, 32, 128] {
        let patterns = generate_patterns(&mut rng, 100, len);
        let ac = AcBuilder::new(BuildConfig::new().with_prefilter(false))
            .build(&patterns)
            .unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(len), &input, |b, input| {
            b.iter(|| black_box(ac.find(black_box(input))))
        });
    }

    group.finish();
}

fn bench_prefilter(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let input = generate_input(&mut rng, INPUT_LEN);
    let patterns = vec![b"QUIT".to_vec()];

    let mut group = c.benchmark_group("prefilter");
    group.throughput(Throughput::Bytes(INPUT_LEN as u64));

    for (name, enabled) in [("on", true), ("off", false)] {
        let ac = AcBuilder::new(BuildConfig::new().with_prefilter(enabled))
            .build(&patterns)
            .unwrap();
        group.bench_function(name, |b| b.iter(|| black_box(ac.find(black_box(&input)))));
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(99);
    let mut group = c.benchmark_group("build");

    for count in [100, 1_000, 10_000] {
        let patterns = generate_patterns(&mut rng, count, 12);
        group.bench_with_input(BenchmarkId::from_parameter(count), &patterns, |b, patterns| {
            b.iter(|| black_box(AcBuilder::default().build(patterns).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scan_by_pattern_count,
    bench_scan_by_pattern_len,
    bench_prefilter,
    bench_build
);
criterion_main!(benches);
