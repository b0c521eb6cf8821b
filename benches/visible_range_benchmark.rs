//! Visible-range performance benchmarks for O(log n) verification.
//!
//! A window lookup and a batch of row measurements should stay cheap as the
//! row count grows to a million rows.
//!
//! Run with: cargo bench --bench visible_range_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vgrid::grid::{
    compute_visible_range, FenwickVirtualizer, HeightIndex, RowHeight, RowIndex, RowVirtualizer,
    Window,
};

const ESTIMATE: usize = 260;
const GAP: usize = 16;
const VIEWPORT: usize = 900;

fn benchmark_visible_range_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_range_scaling");

    for rows in [1_000, 100_000, 1_000_000] {
        let index = HeightIndex::filled(rows, ESTIMATE + GAP);
        let total = index.total();

        group.bench_with_input(BenchmarkId::new("window", rows), &index, |b, index| {
            b.iter(|| {
                for top in [0, total / 4, total / 2, total * 3 / 4, total] {
                    let window = Window::from_container(top, VIEWPORT, 0);
                    black_box(compute_visible_range(index, window, 4));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_measurement_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("measurement_flush");

    for rows in [1_000, 100_000, 1_000_000] {
        group.bench_function(BenchmarkId::new("flush_mounted_rows", rows), |b| {
            let mut virtualizer = FenwickVirtualizer::new(RowHeight::new(ESTIMATE), GAP, 4);
            virtualizer.reset(rows);
            let middle = rows / 2;
            let mut height = ESTIMATE;
            b.iter(|| {
                // Alternate heights so every flush changes something.
                height = if height == ESTIMATE { ESTIMATE + 40 } else { ESTIMATE };
                for row in middle..middle + 12 {
                    virtualizer.measure(RowIndex::new(row), RowHeight::new(height));
                }
                black_box(virtualizer.flush());
                black_box(virtualizer.row_offset(RowIndex::new(rows - 1)));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_visible_range_scaling,
    benchmark_measurement_flush
);
criterion_main!(benches);
