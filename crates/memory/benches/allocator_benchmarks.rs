//! Allocator benchmarks
//!
//! Compares the stack allocator with the host heap wrapper across the
//! protocol operations.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use strata_memory::allocator::{
    Allocator, Request, StackAllocator, StackConfig, StackFrame, SystemAllocator, dispatch,
    move_allocation,
};

const ARENA: usize = 1024 * 1024;

/// Benchmark single allocation/release cycle
fn bench_single_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_allocation");

    group.bench_function("stack_64b", |b| {
        let mut buf = vec![0u8; ARENA];
        let allocator = StackAllocator::new(&mut buf).unwrap();

        b.iter(|| unsafe {
            let ptr = allocator.allocate(black_box(64)).unwrap();
            allocator.release(ptr.cast(), 64).unwrap();
            black_box(ptr);
        });
    });

    group.bench_function("stack_64b_debug_fill", |b| {
        let mut buf = vec![0u8; ARENA];
        let allocator = StackAllocator::with_config(
            &mut buf,
            StackConfig {
                alloc_pattern: Some(0xCC),
                dealloc_pattern: Some(0xDD),
                ..StackConfig::default()
            },
        )
        .unwrap();

        b.iter(|| unsafe {
            let ptr = allocator.allocate(black_box(64)).unwrap();
            allocator.release(ptr.cast(), 64).unwrap();
            black_box(ptr);
        });
    });

    group.bench_function("system_64b", |b| {
        let allocator = SystemAllocator::new();

        b.iter(|| unsafe {
            let ptr = allocator.allocate(black_box(64)).unwrap();
            allocator.release(ptr.cast(), 64).unwrap();
            black_box(ptr);
        });
    });

    group.bench_function("dyn_dispatch_stack_64b", |b| {
        let mut buf = vec![0u8; ARENA];
        let stack = StackAllocator::new(&mut buf).unwrap();
        let allocator: &dyn Allocator = &stack;

        b.iter(|| unsafe {
            let block = dispatch(allocator, Request::Alloc { size: black_box(64) })
                .unwrap()
                .into_allocation()
                .unwrap();
            dispatch(
                allocator,
                Request::Free {
                    ptr: block.cast(),
                    size: 64,
                },
            )
            .unwrap();
            black_box(block);
        });
    });

    group.finish();
}

/// Benchmark a burst of allocations followed by one bulk release
fn bench_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("burst");

    for count in [16usize, 256, 4096] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("stack_frame", count), &count, |b, &count| {
            let mut buf = vec![0u8; ARENA];
            let allocator = StackAllocator::new(&mut buf).unwrap();

            b.iter(|| {
                let frame = StackFrame::new(&allocator);
                for _ in 0..count {
                    black_box(frame.allocator().allocate(32).unwrap());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("stack_reset", count), &count, |b, &count| {
            let mut buf = vec![0u8; ARENA];
            let allocator = StackAllocator::new(&mut buf).unwrap();

            b.iter(|| {
                for _ in 0..count {
                    black_box(allocator.allocate(32).unwrap());
                }
                allocator.reset().unwrap();
            });
        });

        group.bench_with_input(BenchmarkId::new("system", count), &count, |b, &count| {
            let allocator = SystemAllocator::new();
            let mut live = Vec::with_capacity(count);

            b.iter(|| {
                for _ in 0..count {
                    live.push(allocator.allocate(32).unwrap());
                }
                for block in live.drain(..) {
                    unsafe { allocator.release(block.cast(), 32).unwrap() };
                }
            });
        });
    }

    group.finish();
}

/// Benchmark growing the top allocation
fn bench_realloc(c: &mut Criterion) {
    let mut group = c.benchmark_group("realloc_grow");

    group.bench_function("stack_in_place", |b| {
        let mut buf = vec![0u8; ARENA];
        let allocator = StackAllocator::new(&mut buf).unwrap();

        b.iter(|| unsafe {
            let block = allocator.allocate(64).unwrap();
            let grown = allocator.resize(block.cast(), 64, black_box(4096)).unwrap();
            allocator.release(grown.cast(), 4096).unwrap();
        });
    });

    group.bench_function("system", |b| {
        let allocator = SystemAllocator::new();

        b.iter(|| unsafe {
            let block = allocator.allocate(64).unwrap();
            let grown = allocator.resize(block.cast(), 64, black_box(4096)).unwrap();
            allocator.release(grown.cast(), 4096).unwrap();
        });
    });

    group.finish();
}

/// Benchmark moving a block out of a stack and back
fn bench_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_allocation");

    for size in [64usize, 4096] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("stack_to_system", size), &size, |b, &size| {
            let mut buf = vec![0u8; ARENA];
            let stack = StackAllocator::new(&mut buf).unwrap();
            let heap = SystemAllocator::new();

            b.iter(|| unsafe {
                let block = stack.allocate(size).unwrap();
                let moved = move_allocation(block.cast(), size, &stack, &heap).unwrap();
                heap.release(moved.cast(), size).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_allocation,
    bench_burst,
    bench_realloc,
    bench_move
);
criterion_main!(benches);
