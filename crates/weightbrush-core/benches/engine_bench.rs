//! Criterion benchmarks for the weightbrush-core edit engine
//!
//! Run with: cargo bench -p weightbrush-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use weightbrush_core::{
    AdjacencyGraph, Chunk, EditOperation, LockState, RedistributionEngine, SelectionRegion,
    SmoothParams, WeightMatrix, redistribute,
};

const DRIVERS: usize = 24;
const ROW_COUNTS: &[usize] = &[256, 1024, 4096];

/// Deterministic sparse skin matrix: four influences per row.
fn skin_matrix(rows: usize) -> WeightMatrix {
    let mut m = WeightMatrix::new(rows, DRIVERS);
    for r in 0..rows {
        let base = r % DRIVERS;
        let shares = [0.4, 0.3, 0.2, 0.1];
        for (k, share) in shares.iter().enumerate() {
            m.set(r, (base + k) % DRIVERS, *share);
        }
    }
    m
}

/// Grid-like adjacency: each row linked to its neighbors at distance 1 and 16.
fn grid(rows: usize) -> AdjacencyGraph {
    let lists = (0..rows)
        .map(|r| {
            [r.wrapping_sub(1), r + 1, r.wrapping_sub(16), r + 16]
                .into_iter()
                .filter(|&n| n < rows)
                .collect()
        })
        .collect();
    AdjacencyGraph::new(lists).unwrap()
}

fn bench_redistribute(c: &mut Criterion) {
    let mut group = c.benchmark_group("Redistribute");

    let operations = [
        ("absolute", EditOperation::Absolute(0.5)),
        ("add", EditOperation::Add(0.1)),
        ("average", EditOperation::average()),
        ("prune", EditOperation::Prune(0.15)),
        ("normalize", EditOperation::Normalize),
    ];

    for &rows in ROW_COUNTS {
        let m = skin_matrix(rows);
        let locks = LockState::from_indices(rows, DRIVERS, &[], &[0, 1]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, rows - 1, 2, 5));
        for (name, op) in operations {
            group.bench_with_input(BenchmarkId::new(name, rows), &rows, |b, _| {
                b.iter(|| black_box(redistribute(black_box(&m), &locks, &sel, op).unwrap()));
            });
        }
    }

    group.finish();
}

fn bench_smooth(c: &mut Criterion) {
    let mut group = c.benchmark_group("Smooth");

    for &rows in ROW_COUNTS {
        let m = skin_matrix(rows);
        let adjacency = grid(rows);
        let locks = LockState::unlocked(rows, DRIVERS);
        let sel = SelectionRegion::from_chunk(Chunk::new(0, rows - 1, 0, DRIVERS - 1));
        let engine = RedistributionEngine::new().with_adjacency(&adjacency);

        for iterations in [1u32, 4] {
            let op = EditOperation::Smooth(SmoothParams::smooth(iterations));
            group.bench_with_input(
                BenchmarkId::new(format!("iterations_{iterations}"), rows),
                &rows,
                |b, _| {
                    b.iter(|| black_box(engine.apply(black_box(&m), &locks, &sel, op).unwrap()));
                },
            );
        }
    }

    // Padded table construction after invalidation
    group.bench_function("padded_table_4096", |b| {
        let adjacency = grid(4096);
        b.iter(|| {
            let fresh = adjacency.with_depth(1);
            black_box(fresh.padded().width)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_redistribute, bench_smooth);
criterion_main!(benches);
