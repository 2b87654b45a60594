//! Property-based tests for the redistribution engine.
//!
//! Random normalized matrices, random locks, an optional hidden column and
//! one or two rectangular chunks: every operation must keep row budgets,
//! leave locked cells alone and stay inside `[0, 1]`.

use proptest::prelude::*;
use proptest::sample::Index;
use weightbrush_core::{
    AdjacencyGraph, Chunk, DEFAULT_TOLERANCE, EditError, EditOperation, LockState,
    RedistributionEngine, SelectionRegion, SmoothParams, WeightMatrix, check_invariants,
    max_drift, redistribute,
};

#[derive(Debug, Clone)]
struct Case {
    matrix: WeightMatrix,
    locks: LockState,
    selection: SelectionRegion,
}

type ChunkIndices = (Index, Index, Index, Index);

fn chunk(rows: usize, cols: usize, (r0, r1, c0, c1): ChunkIndices) -> Chunk {
    Chunk::new(r0.index(rows), r1.index(rows), c0.index(cols), c1.index(cols))
}

/// Row-normalized matrix with some exact zeros, plus locks, one or two
/// chunks and at most one hidden column.
fn case() -> impl Strategy<Value = Case> {
    (1usize..7, 2usize..6)
        .prop_flat_map(|(rows, cols)| {
            (
                prop::collection::vec(
                    prop::collection::vec(prop_oneof![Just(0.0), 0.0f64..1.0], cols),
                    rows,
                ),
                prop::collection::vec(prop::bool::weighted(0.15), rows),
                prop::collection::vec(prop::bool::weighted(0.25), cols),
                any::<ChunkIndices>(),
                prop::option::of(any::<ChunkIndices>()),
                prop::option::of(any::<Index>()),
                prop::option::of(prop::collection::vec(0.0f64..=1.0, rows)),
            )
        })
        .prop_map(|(raw, row_locks, col_locks, first, second, hidden, soft)| {
            let rows = raw.len();
            let cols = raw[0].len();
            let normalized = raw
                .into_iter()
                .map(|mut row| {
                    let sum: f64 = row.iter().sum();
                    if sum > 0.0 {
                        row.iter_mut().for_each(|v| *v /= sum);
                    } else {
                        row[0] = 1.0;
                    }
                    row
                })
                .collect();
            let mut selection = SelectionRegion::from_chunk(chunk(rows, cols, first));
            if let Some(second) = second {
                selection = selection.with_chunk(chunk(rows, cols, second));
            }
            if let Some(hidden) = hidden {
                selection = selection.with_hidden_columns(vec![hidden.index(cols)]);
            }
            if let Some(weights) = soft {
                selection = selection.with_soft_weights(weights);
            }
            Case {
                matrix: WeightMatrix::from_rows(normalized).unwrap(),
                locks: LockState::from_flags(row_locks, col_locks),
                selection,
            }
        })
}

fn operation() -> impl Strategy<Value = EditOperation> {
    prop_oneof![
        (0.0f64..=1.0).prop_map(EditOperation::Absolute),
        (-1.0f64..=1.0).prop_map(EditOperation::Add),
        (-1.0f64..2.0).prop_map(EditOperation::AddPercent),
        (0.0f64..=1.0).prop_map(|strength| EditOperation::Average { strength }),
        (0.0f64..=1.0).prop_map(EditOperation::Prune),
        (0.0f64..0.3).prop_map(EditOperation::Prune),
        Just(EditOperation::Normalize),
    ]
}

fn editable(case: &Case, col: usize) -> bool {
    !case.locks.is_column_locked(col) && !case.selection.is_hidden(col)
}

/// Rows where a prune must zero its selected cells below `threshold`:
/// unlocked, at full soft weight, and holding some editable weight at or
/// above the threshold to carry the row budget.
fn pruned_rows(case: &Case, threshold: f64) -> Vec<usize> {
    (0..case.matrix.rows())
        .filter(|&row| !case.locks.is_row_locked(row) && case.selection.soft_weight(row) >= 1.0)
        .filter(|&row| {
            (0..case.matrix.cols()).any(|col| {
                let v = case.matrix.get(row, col);
                editable(case, col) && v >= threshold && v > 0.0
            })
        })
        .collect()
}

/// Ring adjacency over `rows` elements.
fn ring(rows: usize) -> AdjacencyGraph {
    let lists = (0..rows)
        .map(|i| vec![(i + rows - 1) % rows, (i + 1) % rows])
        .collect();
    AdjacencyGraph::new(lists).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every edit keeps unlocked row mass on budget, locked cells unchanged,
    /// and values inside [0, 1].
    #[test]
    fn edits_preserve_invariants(case in case(), op in operation()) {
        let out = match redistribute(&case.matrix, &case.locks, &case.selection, op) {
            Ok(out) => out,
            Err(e) => {
                prop_assert!(e.is_no_op(), "unexpected error {}", e);
                return Ok(());
            }
        };
        let violations = check_invariants(&case.matrix, &out, &case.locks, DEFAULT_TOLERANCE);
        prop_assert!(violations.is_empty(), "{:?} on {:?}: {:?}", op, case, violations);
        prop_assert!(max_drift(&out, &case.locks) < DEFAULT_TOLERANCE);
        if let EditOperation::Prune(threshold) = op {
            for row in pruned_rows(&case, threshold) {
                for col in 0..case.matrix.cols() {
                    let chunk_cell = case.selection.contains(row, col) && editable(&case, col);
                    if chunk_cell && case.matrix.get(row, col) < threshold {
                        prop_assert_eq!(out.get(row, col), 0.0, "row {} col {} of {:?}", row, col, case);
                    }
                }
            }
        }
    }

    /// Smoothing and sharpening keep the same invariants over several rounds.
    #[test]
    fn smoothing_preserves_invariants(
        case in case(),
        iterations in 1u32..4,
        strength in 0.1f64..=1.0,
        invert in any::<bool>(),
    ) {
        let adjacency = ring(case.matrix.rows());
        let params = SmoothParams { iterations, strength, invert };
        let result = RedistributionEngine::new()
            .with_adjacency(&adjacency)
            .apply(&case.matrix, &case.locks, &case.selection, EditOperation::Smooth(params));
        let out = match result {
            Ok(out) => out,
            Err(e) => {
                prop_assert_eq!(e, EditError::EmptySelection);
                return Ok(());
            }
        };
        let violations = check_invariants(&case.matrix, &out, &case.locks, DEFAULT_TOLERANCE);
        prop_assert!(violations.is_empty(), "{:?}", violations);
    }

    /// Auto-prune never breaks the invariants.
    #[test]
    fn auto_prune_preserves_invariants(case in case(), op in operation(), threshold in 0.0f64..0.3) {
        let result = RedistributionEngine::new()
            .with_auto_prune(Some(threshold))
            .apply(&case.matrix, &case.locks, &case.selection, op);
        if let Ok(out) = result {
            let violations = check_invariants(&case.matrix, &out, &case.locks, DEFAULT_TOLERANCE);
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
    }

    /// Normalize applied to its own output changes nothing.
    #[test]
    fn normalize_is_idempotent(case in case()) {
        let Ok(once) = redistribute(&case.matrix, &case.locks, &case.selection, EditOperation::Normalize) else {
            return Ok(());
        };
        let twice = redistribute(&once, &case.locks, &case.selection, EditOperation::Normalize).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// The same input always yields the same output.
    #[test]
    fn edits_are_deterministic(case in case(), op in operation()) {
        let a = redistribute(&case.matrix, &case.locks, &case.selection, op);
        let b = redistribute(&case.matrix, &case.locks, &case.selection, op);
        prop_assert_eq!(a, b);
    }

    /// Rows outside the edited range are never touched.
    #[test]
    fn rows_outside_range_pass_through(case in case(), op in operation()) {
        let Ok(out) = redistribute(&case.matrix, &case.locks, &case.selection, op) else {
            return Ok(());
        };
        let (first, last) = case.selection.row_range().unwrap();
        for row in (0..case.matrix.rows()).filter(|r| *r < first || *r > last) {
            prop_assert_eq!(out.row(row), case.matrix.row(row));
        }
    }

    /// A row whose unselected columns are all zero still reaches its budget
    /// when the selected column is set to zero.
    #[test]
    fn degenerate_rows_reach_budget(cols in 2usize..6, col in any::<Index>(), locked in any::<bool>()) {
        let selected = col.index(cols);
        let mut row = vec![0.0; cols];
        row[selected] = 1.0;
        let mut lock_flags = vec![false; cols];
        if locked {
            let other = (selected + 1) % cols;
            row[selected] = 0.7;
            row[other] = 0.3;
            lock_flags[other] = true;
        }
        let m = WeightMatrix::from_rows(vec![row]).unwrap();
        let locks = LockState::from_flags(vec![false], lock_flags);
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, selected, selected));
        let out = redistribute(&m, &locks, &sel, EditOperation::Absolute(0.0)).unwrap();
        prop_assert!((out.row_sum(0) - 1.0).abs() < DEFAULT_TOLERANCE);
    }
}
