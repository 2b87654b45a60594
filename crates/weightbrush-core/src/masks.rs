//! Selected / remaining masks and per-row mass bookkeeping.
//!
//! Built once per edit over the edited row range of the selection:
//!
//! - `selected[r][d]  = chunk ∧ ¬locked(r) ∧ ¬locked(d) ∧ ¬hidden(d)`
//! - `remaining[r][d] = ¬chunk ∧ ¬locked(r) ∧ ¬locked(d) ∧ ¬hidden(d)`
//! - `locked_mass[r]  = Σ M[r][d]` over locked columns
//!
//! Rows with a selected cell but no remaining mass are *widened*: every
//! editable column of the row becomes selected and the remaining mask is
//! cleared, so freed or requested mass always has somewhere to go. Widened
//! columns are selected but not *targeted*: the operation's candidate only
//! applies to targeted cells, the others enter the rescale with their current
//! value.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::EditError;
use crate::lock::LockState;
use crate::matrix::WeightMatrix;
use crate::selection::SelectionRegion;
use crate::validate::DEFAULT_TOLERANCE;

/// How chunk coverage turns into the selected mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Chunks define the selection; degenerate rows are widened.
    Chunks,
    /// Any row touched by a chunk is selected across every editable column.
    WholeRow,
}

/// Masks and row bookkeeping over the edited row range.
#[derive(Debug, Clone)]
pub struct EditMasks {
    first_row: usize,
    rows: usize,
    cols: usize,
    selected: Vec<bool>,
    targeted: Vec<bool>,
    remaining: Vec<bool>,
    row_locked: Vec<bool>,
    editable_cols: Vec<bool>,
    locked_mass: Vec<f64>,
    hidden_mass: Vec<f64>,
    widened: Vec<bool>,
}

impl EditMasks {
    /// Validates the inputs and builds the masks.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] when the lock state or selection does not
    /// fit the matrix, [`EditError::InvalidWeight`] when a cell is not a finite
    /// weight in `[0, 1]`, [`EditError::EmptySelection`] when no chunk covers
    /// an editable cell.
    pub fn build(
        matrix: &WeightMatrix,
        locks: &LockState,
        selection: &SelectionRegion,
        mode: MaskMode,
    ) -> Result<Self, EditError> {
        let cols = matrix.cols();
        locks.check_shape(matrix.rows(), cols)?;
        selection.validate(matrix.rows(), cols)?;
        matrix.check_values(DEFAULT_TOLERANCE)?;
        let (first_row, last_row) = selection.row_range().ok_or(EditError::EmptySelection)?;
        let rows = last_row - first_row + 1;

        let editable_cols: Vec<bool> = (0..cols)
            .map(|c| !locks.is_column_locked(c) && !selection.is_hidden(c))
            .collect();

        let mut masks = Self {
            first_row,
            rows,
            cols,
            selected: vec![false; rows * cols],
            targeted: vec![false; rows * cols],
            remaining: vec![false; rows * cols],
            row_locked: vec![false; rows],
            editable_cols,
            locked_mass: vec![0.0; rows],
            hidden_mass: vec![0.0; rows],
            widened: vec![false; rows],
        };

        for local in 0..rows {
            let row = first_row + local;
            let values = matrix.row(row);
            let row_locked = locks.is_row_locked(row);
            masks.row_locked[local] = row_locked;

            let mut locked_mass = 0.0;
            let mut hidden_mass = 0.0;
            for c in 0..cols {
                if locks.is_column_locked(c) {
                    locked_mass += values[c];
                } else if selection.is_hidden(c) {
                    hidden_mass += values[c];
                }
            }
            masks.locked_mass[local] = locked_mass;
            masks.hidden_mass[local] = hidden_mass;
            if row_locked {
                continue;
            }

            let touched = (0..cols).any(|c| selection.contains(row, c));
            let mut any_selected = false;
            let mut remaining_mass = 0.0;
            for c in 0..cols {
                if !masks.editable_cols[c] {
                    continue;
                }
                let in_chunk = match mode {
                    MaskMode::Chunks => selection.contains(row, c),
                    MaskMode::WholeRow => touched,
                };
                let idx = local * cols + c;
                if in_chunk {
                    masks.selected[idx] = true;
                    masks.targeted[idx] = true;
                    any_selected = true;
                } else {
                    masks.remaining[idx] = true;
                    remaining_mass += values[c];
                }
            }

            if any_selected && remaining_mass == 0.0 {
                for c in 0..cols {
                    let idx = local * cols + c;
                    masks.selected[idx] = masks.editable_cols[c];
                    masks.remaining[idx] = false;
                }
                masks.widened[local] = true;
            }
        }

        if !masks.selected.iter().any(|&s| s) {
            return Err(EditError::EmptySelection);
        }
        Ok(masks)
    }

    /// First absolute row of the edited range.
    pub fn first_row(&self) -> usize {
        self.first_row
    }

    /// Last absolute row of the edited range (inclusive).
    pub fn last_row(&self) -> usize {
        self.first_row + self.rows - 1
    }

    /// Absolute rows of the edited range.
    pub fn row_indices(&self) -> core::ops::RangeInclusive<usize> {
        self.first_row..=self.last_row()
    }

    /// Whether `(row, col)` is selected. `row` is absolute.
    #[inline]
    pub fn is_selected(&self, row: usize, col: usize) -> bool {
        self.local(row)
            .is_some_and(|l| self.selected[l * self.cols + col])
    }

    /// Whether the operation's candidate applies to `(row, col)`: selected and
    /// not merely added by widening. `row` is absolute.
    #[inline]
    pub fn is_targeted(&self, row: usize, col: usize) -> bool {
        self.local(row)
            .is_some_and(|l| self.targeted[l * self.cols + col])
    }

    /// Whether `(row, col)` belongs to the remaining mask. `row` is absolute.
    #[inline]
    pub fn is_remaining(&self, row: usize, col: usize) -> bool {
        self.local(row)
            .is_some_and(|l| self.remaining[l * self.cols + col])
    }

    /// Whether `col` is neither locked nor hidden.
    #[inline]
    pub fn is_editable_column(&self, col: usize) -> bool {
        self.editable_cols[col]
    }

    /// Whether `row` is locked.
    pub fn is_row_locked(&self, row: usize) -> bool {
        self.local(row).is_some_and(|l| self.row_locked[l])
    }

    /// Whether the degenerate-row fallback widened `row`.
    pub fn is_widened(&self, row: usize) -> bool {
        self.local(row).is_some_and(|l| self.widened[l])
    }

    /// Number of targeted cells in `row` (the settable count).
    pub fn settable_count(&self, row: usize) -> usize {
        self.local(row).map_or(0, |l| {
            self.targeted[l * self.cols..(l + 1) * self.cols]
                .iter()
                .filter(|&&s| s)
                .count()
        })
    }

    /// Whether `row` has at least one targeted cell.
    pub fn has_selection(&self, row: usize) -> bool {
        self.settable_count(row) > 0
    }

    /// Summed weight of the locked columns of `row`.
    pub fn locked_mass(&self, row: usize) -> f64 {
        self.local(row).map_or(0.0, |l| self.locked_mass[l])
    }

    /// Summed weight of hidden (unlocked) columns of `row`.
    pub fn hidden_mass(&self, row: usize) -> f64 {
        self.local(row).map_or(0.0, |l| self.hidden_mass[l])
    }

    /// `1 − locked_mass`, floored at zero.
    pub fn budget(&self, row: usize) -> f64 {
        (1.0 - self.locked_mass(row)).max(0.0)
    }

    /// Mass the selected and remaining cells of `row` must sum to: the budget
    /// minus whatever the hidden columns hold.
    pub fn target(&self, row: usize) -> f64 {
        (self.budget(row) - self.hidden_mass(row)).max(0.0)
    }

    /// Number of widened rows.
    pub fn widened_count(&self) -> usize {
        self.widened.iter().filter(|&&w| w).count()
    }

    fn local(&self, row: usize) -> Option<usize> {
        row.checked_sub(self.first_row).filter(|&l| l < self.rows)
    }
}
