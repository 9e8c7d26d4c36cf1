//! List construction benchmarks
//!
//! Measures sentinel-scanned construction against the builder. Every
//! iteration gets its own `Heap`, so cells are released between batches.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use guile_shim::heap::Heap;
use guile_shim::{list_from_iter, list_n, Primitives, Scm};

fn terminated_symbols(heap: &Heap, n: usize) -> Vec<Scm> {
    let mut elts: Vec<Scm> = (0..n).map(|i| heap.symbol(&format!("sym_{}", i))).collect();
    elts.push(heap.undefined());
    elts
}

fn setup(size: usize) -> (Heap, Vec<Scm>) {
    let heap = Heap::new();
    let elts = terminated_symbols(&heap, size);
    (heap, elts)
}

fn bench_list_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_n");

    for size in [1, 16, 256, 4096] {
        group.bench_with_input(BenchmarkId::new("sentinel", size), &size, |b, &size| {
            b.iter_batched_ref(
                || setup(size),
                |(heap, elts)| unsafe { black_box(list_n(&*heap, elts.as_ptr())) },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("builder", size), &size, |b, &size| {
            b.iter_batched_ref(
                || setup(size),
                |(heap, elts)| black_box(list_from_iter(&*heap, elts[..size].iter().copied())),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_list_n);
criterion_main!(benches);
