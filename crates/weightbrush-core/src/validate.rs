//! Invariant checks for edit results.
//!
//! Used by tests, by [`EditSession`](crate::EditSession) to decide when a
//! drifted matrix needs renormalizing, and by the CLI `check` command.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::lock::LockState;
use crate::matrix::WeightMatrix;

/// Default tolerance for mass checks.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// One broken invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvariantViolation {
    /// Unlocked mass of a row differs from its budget.
    Mass {
        /// Row index.
        row: usize,
        /// Signed difference `Σ unlocked − budget`.
        drift: f64,
    },
    /// A locked cell changed.
    Lock {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },
    /// A value left `[0, 1]`.
    Range {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
    },
    /// The two matrices have different shapes.
    Shape,
}

impl core::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Mass { row, drift } => write!(f, "row {row}: unlocked mass drifts by {drift:e}"),
            Self::Lock { row, col } => write!(f, "locked cell ({row}, {col}) changed"),
            Self::Range { row, col, value } => {
                write!(f, "cell ({row}, {col}) = {value} outside [0, 1]")
            }
            Self::Shape => write!(f, "matrix shape changed"),
        }
    }
}

/// Signed drift of one row: `Σ unlocked − (1 − Σ locked)`.
///
/// Locked rows report zero.
pub fn row_drift(matrix: &WeightMatrix, locks: &LockState, row: usize) -> f64 {
    if locks.is_row_locked(row) {
        return 0.0;
    }
    let (locked, unlocked) = matrix
        .row(row)
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(l, u), (c, &v)| {
            if locks.is_column_locked(c) {
                (l + v, u)
            } else {
                (l, u + v)
            }
        });
    unlocked - (1.0 - locked).max(0.0)
}

/// Largest absolute row drift over the matrix.
pub fn max_drift(matrix: &WeightMatrix, locks: &LockState) -> f64 {
    (0..matrix.rows())
        .map(|r| row_drift(matrix, locks, r).abs())
        .fold(0.0, f64::max)
}

/// Compares an edit result against its input.
///
/// Mass is only checked on rows that changed, so unnormalized input rows
/// outside the edit are not reported.
pub fn check_invariants(
    before: &WeightMatrix,
    after: &WeightMatrix,
    locks: &LockState,
    tolerance: f64,
) -> Vec<InvariantViolation> {
    if before.rows() != after.rows() || before.cols() != after.cols() {
        return Vec::from([InvariantViolation::Shape]);
    }
    let mut violations = Vec::new();
    for row in 0..after.rows() {
        let changed = before.row(row) != after.row(row);
        for col in 0..after.cols() {
            let value = after.get(row, col);
            if locks.is_locked(row, col) && value != before.get(row, col) {
                violations.push(InvariantViolation::Lock { row, col });
            }
            if !(-tolerance..=1.0 + tolerance).contains(&value) {
                violations.push(InvariantViolation::Range { row, col, value });
            }
        }
        if changed {
            let drift = row_drift(after, locks, row);
            if drift.abs() > tolerance {
                violations.push(InvariantViolation::Mass { row, drift });
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_accounts_for_locks() {
        let m = WeightMatrix::from_rows(vec![vec![0.3, 0.5, 0.1]]).unwrap();
        let locks = LockState::from_indices(1, 3, &[], &[0]).unwrap();
        assert!((row_drift(&m, &locks, 0) + 0.1).abs() < 1e-12);
        assert!((max_drift(&m, &locks) - 0.1).abs() < 1e-12);
        let row_locked = LockState::from_indices(1, 3, &[0], &[]).unwrap();
        assert_eq!(row_drift(&m, &row_locked, 0), 0.0);
    }

    #[test]
    fn detects_each_violation() {
        let before = WeightMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();
        let after = WeightMatrix::from_rows(vec![vec![0.4, 0.5], vec![1.2, -0.2]]).unwrap();
        let locks = LockState::from_indices(2, 2, &[], &[1]).unwrap();
        let found = check_invariants(&before, &after, &locks, DEFAULT_TOLERANCE);
        assert!(found.iter().any(|v| matches!(v, InvariantViolation::Mass { row: 0, .. })));
        assert!(found.contains(&InvariantViolation::Lock { row: 1, col: 1 }));
        assert!(found.iter().any(|v| matches!(v, InvariantViolation::Range { row: 1, col: 0, .. })));
    }

    #[test]
    fn unchanged_rows_skip_mass_check() {
        let m = WeightMatrix::from_rows(vec![vec![0.2, 0.2]]).unwrap();
        let locks = LockState::unlocked(1, 2);
        assert!(check_invariants(&m, &m, &locks, DEFAULT_TOLERANCE).is_empty());
    }

    #[test]
    fn shape_change_is_reported() {
        let locks = LockState::unlocked(1, 1);
        assert_eq!(
            check_invariants(&WeightMatrix::new(1, 1), &WeightMatrix::new(2, 1), &locks, 0.0),
            vec![InvariantViolation::Shape]
        );
    }

    #[test]
    fn display() {
        let v = InvariantViolation::Lock { row: 1, col: 2 };
        assert_eq!(v.to_string(), "locked cell (1, 2) changed");
    }
}
