// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use criterion::{
    BatchSize, BenchmarkGroup, BenchmarkId, Criterion, Throughput, black_box, criterion_group,
    criterion_main, measurement::WallTime,
};

use rampart::{
    ChecksumProtection, Checksummed, GuardProtection, Guarded, Stack, Unchecksummed, Unguarded,
    provenance,
};

// Fast mode: FAST_BENCH=1 cargo bench -p benchmarks --bench stack
fn is_fast_mode() -> bool {
    std::env::var("FAST_BENCH")
        .map(|v| v == "1")
        .unwrap_or(false)
}

fn configure_group(group: &mut BenchmarkGroup<WallTime>) {
    if is_fast_mode() {
        group.measurement_time(std::time::Duration::from_millis(500));
        group.sample_size(10);
    } else {
        group.measurement_time(std::time::Duration::from_secs(3));
        group.sample_size(50);
    }
}

fn filled<G: GuardProtection, C: ChecksumProtection>(size: usize) -> Stack<u64, G, C> {
    let mut stack =
        Stack::with_capacity(size, provenance!("bench")).expect("Failed to with_capacity(..)");
    for i in 0..size {
        stack.push(i as u64).expect("Failed to push(..)");
    }
    stack
}

fn bench_push_mode<G: GuardProtection, C: ChecksumProtection>(
    group: &mut BenchmarkGroup<WallTime>,
    label: &str,
    size: usize,
) {
    group.bench_with_input(BenchmarkId::new(label, size), &size, |b, &s| {
        b.iter(|| {
            let mut stack =
                Stack::<u64, G, C>::new(provenance!("bench")).expect("Failed to new(..)");
            for i in 0..s {
                stack.push(i as u64).expect("Failed to push(..)");
            }
            black_box(stack.len())
        });
    });
}

// =============================================================================
// push(): Vec vs every protection mode
// =============================================================================

fn bench_push_with_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_push_with_growth");
    configure_group(&mut group);

    for size in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |b, &s| {
            b.iter(|| {
                let mut vec = Vec::with_capacity(1);
                for i in 0..s {
                    vec.push(i as u64);
                }
                black_box(vec)
            });
        });

        bench_push_mode::<Unguarded, Unchecksummed>(&mut group, "Unprotected", size);
        bench_push_mode::<Guarded, Unchecksummed>(&mut group, "Guarded", size);
        bench_push_mode::<Unguarded, Checksummed>(&mut group, "Checksummed", size);
        bench_push_mode::<Guarded, Checksummed>(&mut group, "Full", size);
    }

    group.finish();
}

// =============================================================================
// pop(): checksum cost grows with the live region
// =============================================================================

fn bench_pop_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_pop_all");
    configure_group(&mut group);

    for size in [100, 1_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("Unprotected", size), &size, |b, &s| {
            b.iter_batched(
                || filled::<Unguarded, Unchecksummed>(s),
                |mut stack| {
                    while let Ok(v) = stack.pop() {
                        black_box(v);
                    }
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("Full", size), &size, |b, &s| {
            b.iter_batched(
                || filled::<Guarded, Checksummed>(s),
                |mut stack| {
                    while let Ok(v) = stack.pop() {
                        black_box(v);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// verify()
// =============================================================================

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_verify");
    configure_group(&mut group);

    for size in [16, 1_024, 65_536] {
        group.throughput(Throughput::Bytes((size * 8) as u64));

        let guarded = filled::<Guarded, Unchecksummed>(size);
        group.bench_with_input(BenchmarkId::new("Guarded", size), &guarded, |b, stack| {
            b.iter(|| black_box(stack.verify()));
        });

        let full = filled::<Guarded, Checksummed>(size);
        group.bench_with_input(BenchmarkId::new("Full", size), &full, |b, stack| {
            b.iter(|| black_box(stack.verify()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_push_with_growth, bench_pop_all, bench_verify);
criterion_main!(benches);
