//! Criterion micro-benchmarks for `DynamicArray` over the stock allocators.

use criterion::{criterion_group, criterion_main, Criterion};
use ravel_alloc::{ArenaConfig, BudgetAllocator, BumpArena, CountingAllocator, Global};
use ravel_array::DynamicArray;
use ravel_bench::{mixed_trace, run_trace, REFERENCE_LEN};

/// Arena large enough for every buffer one benchmark iteration leaves behind.
fn make_arena() -> BumpArena {
    BumpArena::new(ArenaConfig::new(4 << 20)).unwrap()
}

/// Benchmark: append 10K values through each allocator.
fn bench_push_by_allocator(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_10k_by_allocator");
    group.bench_function("global", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new_in(Global);
            for i in 0..REFERENCE_LEN as u64 {
                array.push_back(i);
            }
            std::hint::black_box(array.len())
        });
    });
    group.bench_function("bump_arena", |b| {
        let mut arena = make_arena();
        b.iter(|| {
            {
                let mut array = DynamicArray::new_in(&arena);
                for i in 0..REFERENCE_LEN as u64 {
                    array.push_back(i);
                }
                std::hint::black_box(array.len());
            }
            arena.reset();
        });
    });
    group.bench_function("counting", |b| {
        let counting = CountingAllocator::new();
        b.iter(|| {
            let mut array = DynamicArray::new_in(&counting);
            for i in 0..REFERENCE_LEN as u64 {
                array.push_back(i);
            }
            std::hint::black_box(array.len())
        });
    });
    group.bench_function("budget", |b| {
        let budget = BudgetAllocator::new(1 << 20);
        b.iter(|| {
            let mut array = DynamicArray::new_in(&budget);
            for i in 0..REFERENCE_LEN as u64 {
                array.push_back(i);
            }
            std::hint::black_box(array.len())
        });
    });
    group.finish();
}

/// Benchmark: mixed trace replayed inside a bump arena, reset between runs.
fn bench_mixed_trace_arena(c: &mut Criterion) {
    let trace = mixed_trace(REFERENCE_LEN, 512, 42);
    let mut arena = make_arena();
    c.bench_function("mixed_trace_10k_arena", |b| {
        b.iter(|| {
            let checksum = {
                let mut array = DynamicArray::new_in(&arena);
                run_trace(&mut array, &trace)
            };
            arena.reset();
            std::hint::black_box(checksum)
        });
    });
}

criterion_group!(benches, bench_push_by_allocator, bench_mixed_trace_arena);
criterion_main!(benches);
