//! Row and column lock flags.
//!
//! A locked row passes through every edit unchanged. A locked column keeps its
//! values and its mass is subtracted from the row budget.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::EditError;

/// Per-row and per-column lock flags for one matrix shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockState {
    rows: Vec<bool>,
    columns: Vec<bool>,
}

impl LockState {
    /// Creates a fully unlocked state for a `rows × cols` matrix.
    pub fn unlocked(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![false; rows],
            columns: vec![false; cols],
        }
    }

    /// Creates a state from explicit flag vectors.
    pub fn from_flags(rows: Vec<bool>, columns: Vec<bool>) -> Self {
        Self { rows, columns }
    }

    /// Creates a state from lists of locked row and column indices.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ShapeMismatch`] if an index is out of range.
    pub fn from_indices(
        rows: usize,
        cols: usize,
        locked_rows: &[usize],
        locked_columns: &[usize],
    ) -> Result<Self, EditError> {
        let mut state = Self::unlocked(rows, cols);
        for &r in locked_rows {
            if r >= rows {
                return Err(EditError::shape("locked row index", rows, r));
            }
            state.rows[r] = true;
        }
        for &c in locked_columns {
            if c >= cols {
                return Err(EditError::shape("locked column index", cols, c));
            }
            state.columns[c] = true;
        }
        Ok(state)
    }

    /// Number of rows covered.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns covered.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether `row` is locked. Out-of-range rows read as unlocked.
    #[inline]
    pub fn is_row_locked(&self, row: usize) -> bool {
        self.rows.get(row).copied().unwrap_or(false)
    }

    /// Whether `col` is locked. Out-of-range columns read as unlocked.
    #[inline]
    pub fn is_column_locked(&self, col: usize) -> bool {
        self.columns.get(col).copied().unwrap_or(false)
    }

    /// Whether cell `(row, col)` is protected by a row or column lock.
    #[inline]
    pub fn is_locked(&self, row: usize, col: usize) -> bool {
        self.is_row_locked(row) || self.is_column_locked(col)
    }

    /// Locks or unlocks the given rows. Out-of-range indices are ignored.
    pub fn set_rows_locked(&mut self, rows: &[usize], locked: bool) {
        for &r in rows {
            if let Some(flag) = self.rows.get_mut(r) {
                *flag = locked;
            }
        }
    }

    /// Locks or unlocks the given columns. Out-of-range indices are ignored.
    pub fn set_columns_locked(&mut self, columns: &[usize], locked: bool) {
        for &c in columns {
            if let Some(flag) = self.columns.get_mut(c) {
                *flag = locked;
            }
        }
    }

    /// Indices of locked columns, ascending.
    pub fn locked_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| l.then_some(i))
            .collect()
    }

    /// Indices of locked rows, ascending.
    pub fn locked_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, &l)| l.then_some(i))
            .collect()
    }

    /// Checks that the flags cover a `rows × cols` matrix.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ShapeMismatch`] on disagreement.
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<(), EditError> {
        if self.rows.len() != rows {
            return Err(EditError::shape("locked rows", rows, self.rows.len()));
        }
        if self.columns.len() != cols {
            return Err(EditError::shape("locked columns", cols, self.columns.len()));
        }
        Ok(())
    }
}
