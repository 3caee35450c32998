use bitvalue::BitValue;
use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::*;

fn random_value(length: usize, offset: usize) -> BitValue {
    let mut random_number_generator = StdRng::seed_from_u64(length as u64);
    BitValue::random(length, &mut random_number_generator).aligned(offset)
}

pub fn append_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitValue::append");
    for size in [100usize, 10_000, 1_000_000] {
        let tail = random_value(size, 5);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, &size| {
            bencher.iter_batched(
                || random_value(size, 3),
                |mut value| value.append(&tail),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

pub fn equality_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitValue::eq");
    for size in [100usize, 10_000, 1_000_000] {
        let left = random_value(size, 0);
        let right = left.aligned(6);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, _| {
            bencher.iter(|| left == right);
        });
    }
    group.finish();
}

pub fn find_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitValue::find");
    for size in [10_000usize, 1_000_000] {
        let mut haystack = BitValue::zeros(size);
        let needle = BitValue::from_hex("deadbeef").unwrap();
        haystack.overwrite(&needle, size - 64).unwrap();
        group.bench_with_input(BenchmarkId::new("bits", size), &size, |bencher, _| {
            bencher.iter(|| haystack.find(&needle));
        });
        group.bench_with_input(BenchmarkId::new("bytes", size), &size, |bencher, _| {
            bencher.iter(|| haystack.find_bytes(&[0xDE, 0xAD, 0xBE, 0xEF], 0, size));
        });
    }
    group.finish();
}

pub fn repeat_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("BitValue::repeat");
    let unit = random_value(13, 2);
    for count in [10usize, 1000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |bencher, &count| {
            bencher.iter(|| unit.repeat(count));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    append_benchmark,
    equality_benchmark,
    find_benchmark,
    repeat_benchmark
);
criterion_main!(benches);
