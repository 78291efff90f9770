//! toygc Benchmarks
//!
//! Allocation throughput, collection cost for live and dead heaps, and
//! marking of deep graphs.
//! Run with: `cargo bench --package toygc`

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use toygc::{GcConfig, Heap};

fn create_heap(threshold: usize) -> Heap {
    Heap::new(GcConfig {
        initial_threshold: threshold,
        root_capacity: 1 << 20,
        event_history: 0,
        ..Default::default()
    })
    .unwrap()
}

fn bench_heap_creation(c: &mut Criterion) {
    c.bench_function("heap_creation", |b| {
        b.iter(|| black_box(Heap::new(GcConfig::default()).unwrap()))
    });
}

fn bench_allocation_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_churn");

    for &threshold in &[8usize, 64, 1024] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::from_parameter(threshold),
            &threshold,
            |b, &threshold| {
                let mut heap = create_heap(threshold);
                let mut value = 0i64;
                b.iter(|| {
                    value = value.wrapping_add(1);
                    black_box(heap.allocate_scalar(value).unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_collect_live_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_live_heap");

    for &size in &[1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut heap = create_heap(usize::MAX / 4);
            for value in 0..size {
                heap.push_scalar(value as i64).unwrap();
            }
            b.iter(|| black_box(heap.collect()))
        });
    }

    group.finish();
}

fn bench_collect_dead_heap(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_dead_heap");

    for &size in &[1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || {
                    let mut heap = create_heap(usize::MAX / 4);
                    for value in 0..size {
                        heap.allocate_scalar(value as i64).unwrap();
                    }
                    heap
                },
                |mut heap| black_box(heap.collect()),
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_mark_deep_chain(c: &mut Criterion) {
    let mut heap = create_heap(usize::MAX / 4);
    let leaf = heap.allocate_scalar(0).unwrap();
    let mut tail = leaf;
    for _ in 0..100_000 {
        tail = heap.allocate_pair(tail, leaf).unwrap();
    }
    heap.push_root(tail).unwrap();

    c.bench_function("mark_deep_chain_100k", |b| b.iter(|| black_box(heap.collect())));
}

criterion_group!(
    benches,
    bench_heap_creation,
    bench_allocation_churn,
    bench_collect_live_heap,
    bench_collect_dead_heap,
    bench_mark_deep_chain
);
criterion_main!(benches);
