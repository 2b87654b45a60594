//! Redistribution engine.
//!
//! Every edit runs the same per-row procedure over the edited row range:
//!
//! 1. Compute a candidate for each targeted cell and clip it to `[0, 1]`.
//!    Cells added by widening keep their current value as candidate.
//! 2. *Open rows* (some remaining mass): rescale the candidate down if it
//!    exceeds the target, then scale the remaining cells so the row lands on
//!    its target: `M' = clip(M · (target − Σcandidate) / Σremaining)`.
//! 3. *Closed rows* (widened rows, [`Prune`](EditOperation::Prune),
//!    [`Normalize`](EditOperation::Normalize)): rescale the candidate alone to
//!    the target, leaving unselected cells as they are. A prune that zeroes
//!    every selected cell of a row runs open instead, so the freed mass lands
//!    on the remaining cells.
//! 4. Optional auto-prune, then the soft-selection blend
//!    `w · M' + (1 − w) · M` against the input snapshot.
//!
//! The input matrix is never mutated. All validation happens before any
//! value is computed, so an error leaves nothing half-written.

#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

use crate::adjacency::AdjacencyGraph;
use crate::error::EditError;
use crate::lock::LockState;
use crate::masks::{EditMasks, MaskMode};
use crate::matrix::WeightMatrix;
use crate::operation::{EditOperation, MassPolicy, SmoothParams};
use crate::selection::SelectionRegion;
use crate::spatial::{RestPositions, local_split};

/// Candidate sums within this distance of the target are left unscaled.
pub const RESCALE_EPSILON: f64 = 1e-12;

/// Configurable edit engine.
///
/// The plain [`redistribute`] function covers operations that only need the
/// matrix; smoothing needs an [`AdjacencyGraph`] and local reassignment needs
/// [`RestPositions`].
///
/// # Example
///
/// ```rust
/// use weightbrush_core::{Chunk, EditOperation, LockState, RedistributionEngine, SelectionRegion, WeightMatrix};
///
/// let m = WeightMatrix::from_rows(vec![vec![0.5, 0.5, 0.0]]).unwrap();
/// let out = RedistributionEngine::new()
///     .apply(
///         &m,
///         &LockState::unlocked(1, 3),
///         &SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0)),
///         EditOperation::Absolute(0.8),
///     )
///     .unwrap();
/// assert!((out.get(0, 0) - 0.8).abs() < 1e-12);
/// assert!((out.get(0, 1) - 0.2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RedistributionEngine<'a> {
    adjacency: Option<&'a AdjacencyGraph>,
    positions: Option<&'a RestPositions>,
    policy: MassPolicy,
    auto_prune: Option<f64>,
}

impl<'a> RedistributionEngine<'a> {
    /// Engine with the [`MassPolicy::Normalized`] policy and no auto-prune.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjacency used by [`EditOperation::Smooth`].
    pub fn with_adjacency(mut self, adjacency: &'a AdjacencyGraph) -> Self {
        self.adjacency = Some(adjacency);
        self
    }

    /// Rest positions used by [`EditOperation::ReassignLocally`].
    pub fn with_positions(mut self, positions: &'a RestPositions) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Sets the mass policy.
    pub fn with_policy(mut self, policy: MassPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Zeroes editable cells below `threshold` after every edit.
    pub fn with_auto_prune(mut self, threshold: Option<f64>) -> Self {
        self.auto_prune = threshold;
        self
    }

    /// The configured mass policy.
    pub fn policy(&self) -> MassPolicy {
        self.policy
    }

    /// Applies `operation` and returns the new matrix.
    ///
    /// # Errors
    ///
    /// - [`EditError::InvalidOperationParameter`] for out-of-range parameters,
    ///   a missing adjacency (smooth) or missing positions (reassign).
    /// - [`EditError::ShapeMismatch`] when locks, selection, adjacency or
    ///   positions do not fit the matrix.
    /// - [`EditError::EmptySelection`] when no editable cell is selected.
    pub fn apply(
        &self,
        matrix: &WeightMatrix,
        locks: &LockState,
        selection: &SelectionRegion,
        operation: EditOperation,
    ) -> Result<WeightMatrix, EditError> {
        operation.validate()?;
        if let Some(t) = self.auto_prune {
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(EditError::parameter(
                    "auto_prune",
                    format!("threshold {t} outside [0, 1]"),
                ));
            }
        }

        let mode = if matches!(operation, EditOperation::Normalize) {
            MaskMode::WholeRow
        } else {
            MaskMode::Chunks
        };
        let masks = EditMasks::build(matrix, locks, selection, mode)?;

        let edited = match operation {
            EditOperation::Smooth(params) => {
                self.require_adjacency(matrix, operation)?;
                self.smooth_rounds(matrix, locks, selection, &masks, params)?
            }
            EditOperation::ReassignLocally { .. } => {
                let positions = self.positions.ok_or_else(|| {
                    EditError::parameter(operation.name(), "element and driver positions required")
                })?;
                positions.check_shape(matrix.rows(), matrix.cols())?;
                self.pass(matrix, &masks, operation)
            }
            _ => self.pass(matrix, &masks, operation),
        };

        let strength = match operation {
            EditOperation::ReassignLocally { strength } => strength,
            _ => 1.0,
        };
        let out = blend(matrix, edited, selection, &masks, strength);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "redistribute: {} over rows {}..={} ({} widened)",
            operation.name(),
            masks.first_row(),
            masks.last_row(),
            masks.widened_count()
        );

        Ok(out)
    }

    fn require_adjacency(
        &self,
        matrix: &WeightMatrix,
        operation: EditOperation,
    ) -> Result<(), EditError> {
        let adjacency = self
            .adjacency
            .ok_or_else(|| EditError::parameter(operation.name(), "adjacency graph required"))?;
        if adjacency.len() != matrix.rows() {
            return Err(EditError::shape("adjacency elements", matrix.rows(), adjacency.len()));
        }
        Ok(())
    }

    fn smooth_rounds(
        &self,
        matrix: &WeightMatrix,
        locks: &LockState,
        selection: &SelectionRegion,
        first_masks: &EditMasks,
        params: SmoothParams,
    ) -> Result<WeightMatrix, EditError> {
        let operation = EditOperation::Smooth(params);
        let mut current = self.pass(matrix, first_masks, operation);
        for _ in 1..params.iterations {
            let masks = EditMasks::build(&current, locks, selection, MaskMode::Chunks)?;
            current = self.pass(&current, &masks, operation);
        }
        Ok(current)
    }

    /// One full redistribution pass over the edited row range of `matrix`.
    fn pass(
        &self,
        matrix: &WeightMatrix,
        masks: &EditMasks,
        operation: EditOperation,
    ) -> WeightMatrix {
        let cols = matrix.cols();
        let column_means: Vec<f64> = if matches!(operation, EditOperation::Average { .. }) {
            (0..cols)
                .map(|c| matrix.column_mean(c, masks.first_row(), masks.last_row()))
                .collect()
        } else {
            Vec::new()
        };

        let mut out = matrix.clone();
        let mut targeted = Vec::with_capacity(cols);
        let mut selected = Vec::with_capacity(cols);
        let mut candidate = vec![0.0; cols];

        for row in masks.row_indices() {
            if masks.is_row_locked(row) || !masks.has_selection(row) {
                continue;
            }
            targeted.clear();
            targeted.extend((0..cols).filter(|&c| masks.is_targeted(row, c)));
            selected.clear();
            selected.extend((0..cols).filter(|&c| masks.is_selected(row, c)));

            let values = matrix.row(row);
            self.fill_candidates(
                operation,
                matrix,
                masks,
                row,
                &targeted,
                &column_means,
                &mut candidate,
            );
            for &c in &selected {
                if !masks.is_targeted(row, c) {
                    candidate[c] = values[c].clamp(0.0, 1.0);
                }
            }

            let written = out.row_mut(row);
            match self.policy {
                MassPolicy::Independent => {
                    for &c in &targeted {
                        written[c] = candidate[c];
                    }
                }
                MassPolicy::Normalized => {
                    // A prune that clears every selected cell hands its mass
                    // to the remaining cells.
                    let spill = matches!(operation, EditOperation::Prune(_))
                        && selected.iter().all(|&c| candidate[c] == 0.0);
                    let closed = (operation.is_closed() || masks.is_widened(row)) && !spill;
                    balance_row(written, values, &candidate, &selected, masks, row, closed);
                }
            }
            if let Some(threshold) = self.auto_prune {
                self.prune_row(written, masks, row, threshold);
            }
            out.refresh_row(row);
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_candidates(
        &self,
        operation: EditOperation,
        matrix: &WeightMatrix,
        masks: &EditMasks,
        row: usize,
        cells: &[usize],
        column_means: &[f64],
        candidate: &mut [f64],
    ) {
        let values = matrix.row(row);
        match operation {
            EditOperation::Absolute(v) => {
                for &c in cells {
                    candidate[c] = v;
                }
            }
            EditOperation::Add(delta) => {
                let share = delta / cells.len() as f64;
                for &c in cells {
                    candidate[c] = values[c] + share;
                }
            }
            EditOperation::AddPercent(p) => {
                for &c in cells {
                    candidate[c] = values[c] * (1.0 + p);
                }
            }
            EditOperation::Average { strength } => {
                for &c in cells {
                    candidate[c] = strength * column_means[c] + (1.0 - strength) * values[c];
                }
            }
            EditOperation::Smooth(params) => {
                let s = params.signed_strength();
                let padded = self.adjacency.map(AdjacencyGraph::padded);
                for &c in cells {
                    let mut sum = 0.0;
                    let mut count = 0usize;
                    if let Some(padded) = padded {
                        for (n, valid) in padded.slots(row) {
                            if valid {
                                sum += matrix.get(n, c);
                                count += 1;
                            }
                        }
                    }
                    candidate[c] = if count == 0 {
                        values[c]
                    } else {
                        let mean = sum / count as f64;
                        values[c] + s * (mean - values[c])
                    };
                }
            }
            EditOperation::Prune(threshold) => {
                for &c in cells {
                    candidate[c] = if values[c] < threshold { 0.0 } else { values[c] };
                }
            }
            EditOperation::Normalize => {
                for &c in cells {
                    candidate[c] = values[c];
                }
            }
            EditOperation::ReassignLocally { .. } => {
                let target = masks.target(row);
                let split = self.positions.and_then(|p| {
                    p.elements
                        .get(row)
                        .and_then(|&point| local_split(point, &p.drivers, cells))
                });
                for &c in cells {
                    candidate[c] = split.map_or(values[c], |s| s.share(c) * target);
                }
            }
        }
        for &c in cells {
            candidate[c] = candidate[c].clamp(0.0, 1.0);
        }
    }

    /// Zeroes editable cells below `threshold` and renormalizes the row in
    /// closed mode.
    fn prune_row(&self, written: &mut [f64], masks: &EditMasks, row: usize, threshold: f64) {
        let editable: Vec<usize> = (0..written.len())
            .filter(|&c| masks.is_selected(row, c) || masks.is_remaining(row, c))
            .collect();
        if !editable.iter().any(|&c| written[c] < threshold) {
            return;
        }
        let current: Vec<f64> = written.to_vec();
        let mut pruned = current.clone();
        for &c in &editable {
            if pruned[c] < threshold {
                pruned[c] = 0.0;
            }
        }
        match self.policy {
            MassPolicy::Independent => written.copy_from_slice(&pruned),
            MassPolicy::Normalized => {
                fill_closed(written, &current, &pruned, &editable, masks.target(row));
            }
        }
    }
}

/// Writes the selected cells of one row and rebalances the rest.
fn balance_row(
    written: &mut [f64],
    values: &[f64],
    candidate: &[f64],
    cells: &[usize],
    masks: &EditMasks,
    row: usize,
    closed: bool,
) {
    let target = masks.target(row);
    let remaining: f64 = (0..values.len())
        .filter(|&c| masks.is_remaining(row, c))
        .map(|c| values[c])
        .sum();

    if closed || remaining <= 0.0 {
        fill_closed(written, values, candidate, cells, (target - remaining).max(0.0));
        return;
    }

    let sum: f64 = cells.iter().map(|&c| candidate[c]).sum();
    let scale = if sum > target { target / sum } else { 1.0 };
    for &c in cells {
        written[c] = candidate[c] * scale;
    }
    let factor = (target - sum * scale) / remaining;
    for c in 0..values.len() {
        if masks.is_remaining(row, c) {
            written[c] = (values[c] * factor).clamp(0.0, 1.0);
        }
    }
}

/// Rescales `candidate` over `cells` to exactly `target`.
///
/// A zero candidate falls back to the current values, and an all-zero row
/// to an even split.
fn fill_closed(written: &mut [f64], current: &[f64], candidate: &[f64], cells: &[usize], target: f64) {
    let sum: f64 = cells.iter().map(|&c| candidate[c]).sum();
    if sum > 0.0 {
        let scale = if (sum - target).abs() <= RESCALE_EPSILON {
            1.0
        } else {
            target / sum
        };
        for &c in cells {
            written[c] = candidate[c] * scale;
        }
        return;
    }
    if target <= RESCALE_EPSILON {
        for &c in cells {
            written[c] = 0.0;
        }
        return;
    }
    let current_sum: f64 = cells.iter().map(|&c| current[c]).sum();
    if current_sum > 0.0 {
        for &c in cells {
            written[c] = current[c] * target / current_sum;
        }
    } else {
        let even = target / cells.len() as f64;
        for &c in cells {
            written[c] = even;
        }
    }
}

/// `w · edited + (1 − w) · original` over editable cells, `w = soft weight · strength`.
fn blend(
    original: &WeightMatrix,
    mut edited: WeightMatrix,
    selection: &SelectionRegion,
    masks: &EditMasks,
    strength: f64,
) -> WeightMatrix {
    if !selection.has_soft_weights() && strength >= 1.0 {
        return edited;
    }
    for row in masks.row_indices() {
        let w = selection.soft_weight(row) * strength;
        if w >= 1.0 || masks.is_row_locked(row) {
            continue;
        }
        let source = original.row(row);
        for (col, (value, &orig)) in edited.row_mut(row).iter_mut().zip(source).enumerate() {
            let editable = masks.is_selected(row, col) || masks.is_remaining(row, col);
            if editable && *value != orig {
                *value = w * *value + (1.0 - w) * orig;
            }
        }
        edited.refresh_row(row);
    }
    edited
}

/// Applies `operation` with the default engine.
///
/// # Errors
///
/// See [`RedistributionEngine::apply`]. [`EditOperation::Smooth`] and
/// [`EditOperation::ReassignLocally`] need the builder.
pub fn redistribute(
    matrix: &WeightMatrix,
    locks: &LockState,
    selection: &SelectionRegion,
    operation: EditOperation,
) -> Result<WeightMatrix, EditError> {
    RedistributionEngine::new().apply(matrix, locks, selection, operation)
}

/// Smooths (or sharpens, with `invert`) every column of the selected rows.
///
/// # Errors
///
/// [`EditError::ShapeMismatch`] if `selection_rows` or `adjacency` do not
/// have one entry per matrix row; otherwise see [`RedistributionEngine::apply`].
pub fn smooth(
    matrix: &WeightMatrix,
    adjacency: &AdjacencyGraph,
    selection_rows: &[bool],
    iterations: u32,
    invert: bool,
) -> Result<WeightMatrix, EditError> {
    if selection_rows.len() != matrix.rows() {
        return Err(EditError::shape("selection rows", matrix.rows(), selection_rows.len()));
    }
    let params = SmoothParams {
        iterations,
        strength: 1.0,
        invert,
    };
    RedistributionEngine::new().with_adjacency(adjacency).apply(
        matrix,
        &LockState::unlocked(matrix.rows(), matrix.cols()),
        &SelectionRegion::from_row_mask(selection_rows, matrix.cols()),
        EditOperation::Smooth(params),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Chunk;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn unlocked(m: &WeightMatrix) -> LockState {
        LockState::unlocked(m.rows(), m.cols())
    }

    #[test]
    fn absolute_redistributes_to_remaining() {
        let m = WeightMatrix::from_rows(vec![vec![0.5, 0.3, 0.2]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Absolute(0.8)).unwrap();
        assert_close(out.get(0, 0), 0.8);
        assert_close(out.get(0, 1), 0.12);
        assert_close(out.get(0, 2), 0.08);
        assert_close(out.row_sum(0), 1.0);
    }

    #[test]
    fn add_splits_delta_over_settable_cells() {
        let m = WeightMatrix::from_rows(vec![vec![0.2, 0.2, 0.6]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 1));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Add(0.2)).unwrap();
        assert_close(out.get(0, 0), 0.3);
        assert_close(out.get(0, 1), 0.3);
        assert_close(out.get(0, 2), 0.4);
    }

    #[test]
    fn add_percent_scales_selected() {
        let m = WeightMatrix::from_rows(vec![vec![0.4, 0.6]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::AddPercent(0.5)).unwrap();
        assert_close(out.get(0, 0), 0.6);
        assert_close(out.get(0, 1), 0.4);
    }

    #[test]
    fn candidate_above_budget_is_rescaled() {
        let m = WeightMatrix::from_rows(vec![vec![0.3, 0.3, 0.4]]).unwrap();
        let locks = LockState::from_indices(1, 3, &[], &[2]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = redistribute(&m, &locks, &sel, EditOperation::Absolute(1.0)).unwrap();
        assert_close(out.get(0, 0), 0.6);
        assert_close(out.get(0, 1), 0.0);
        assert_eq!(out.get(0, 2), 0.4);
    }

    #[test]
    fn average_uses_whole_edited_range() {
        let m = WeightMatrix::from_rows(vec![vec![0.8, 0.2], vec![0.0, 1.0], vec![0.4, 0.6]])
            .unwrap();
        let sel = SelectionRegion::new()
            .with_chunk(Chunk::new(0, 0, 0, 0))
            .with_chunk(Chunk::new(2, 2, 0, 0));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::average()).unwrap();
        assert_close(out.get(0, 0), 0.4);
        assert_close(out.get(0, 1), 0.6);
        assert_eq!(out.row(1), m.row(1), "unselected row passes through");
        assert_close(out.get(2, 0), 0.4);
        assert_close(out.get(2, 1), 0.6);
    }

    #[test]
    fn average_strength_blends_toward_mean() {
        let m = WeightMatrix::from_rows(vec![vec![0.8, 0.2], vec![0.0, 1.0]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 1, 0, 0));
        let half = EditOperation::Average { strength: 0.5 };
        let out = redistribute(&m, &unlocked(&m), &sel, half).unwrap();
        // mean of column 0 is 0.4
        assert_close(out.get(0, 0), 0.6);
        assert_close(out.get(0, 1), 0.4);
        assert_close(out.get(1, 0), 0.2);
        assert_close(out.get(1, 1), 0.8);

        let none = EditOperation::Average { strength: 0.0 };
        let out = redistribute(&m, &unlocked(&m), &sel, none).unwrap();
        assert_close(out.get(0, 0), 0.8);
        assert_close(out.get(1, 0), 0.0);
    }

    #[test]
    fn prune_is_closed() {
        let m = WeightMatrix::from_rows(vec![vec![0.05, 0.45, 0.5]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 1));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Prune(0.1)).unwrap();
        assert_eq!(out.get(0, 0), 0.0);
        assert_close(out.get(0, 1), 0.5);
        assert_eq!(out.get(0, 2), 0.5);
    }

    #[test]
    fn prune_of_single_column_frees_mass_to_remaining() {
        let m = WeightMatrix::from_rows(vec![vec![0.05, 0.95]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Prune(0.1)).unwrap();
        assert_eq!(out.get(0, 0), 0.0);
        assert_close(out.get(0, 1), 1.0);
    }

    #[test]
    fn prune_of_all_selected_columns_frees_mass_to_remaining() {
        let m = WeightMatrix::from_rows(vec![vec![0.05, 0.05, 0.9]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 1));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Prune(0.1)).unwrap();
        assert_eq!(&out.row(0)[..2], &[0.0, 0.0]);
        assert_close(out.get(0, 2), 1.0);
    }

    #[test]
    fn prune_spill_respects_locked_budget() {
        let m = WeightMatrix::from_rows(vec![vec![0.05, 0.45, 0.5]]).unwrap();
        let locks = LockState::from_indices(1, 3, &[], &[2]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = redistribute(&m, &locks, &sel, EditOperation::Prune(0.1)).unwrap();
        assert_eq!(out.get(0, 0), 0.0);
        assert_close(out.get(0, 1), 0.5);
        assert_eq!(out.get(0, 2), 0.5);
    }

    #[test]
    fn prune_without_remaining_mass_keeps_row_budget() {
        let m = WeightMatrix::from_rows(vec![vec![0.05, 0.0, 0.95]]).unwrap();
        let locks = LockState::from_indices(1, 3, &[], &[2]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = redistribute(&m, &locks, &sel, EditOperation::Prune(0.1)).unwrap();
        assert_close(out.row_sum(0), 1.0);
        assert_eq!(out.get(0, 2), 0.95);
    }

    #[test]
    fn non_finite_input_fails_before_writing() {
        let m = WeightMatrix::from_rows(vec![vec![f64::NAN, 0.5]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 1, 1));
        let err = redistribute(&m, &unlocked(&m), &sel, EditOperation::Absolute(0.2)).unwrap_err();
        assert!(matches!(err, EditError::InvalidWeight { row: 0, col: 0, .. }));
    }

    #[test]
    fn normalize_selects_whole_row() {
        let m = WeightMatrix::from_rows(vec![vec![0.2, 0.2, 0.1], vec![0.5, 0.5, 0.5]]).unwrap();
        let locks = LockState::from_indices(2, 3, &[], &[2]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 1, 0, 0));
        let out = redistribute(&m, &locks, &sel, EditOperation::Normalize).unwrap();
        assert_close(out.get(0, 0), 0.45);
        assert_close(out.get(0, 1), 0.45);
        assert_close(out.get(1, 0), 0.25);
        assert_close(out.row_sum(1), 1.0);
    }

    #[test]
    fn zero_candidate_on_closed_row_keeps_current_values() {
        let m = WeightMatrix::from_rows(vec![vec![0.0, 1.0, 0.0]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 1, 1));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Absolute(0.0)).unwrap();
        assert_eq!(out.row(0), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn all_zero_closed_row_spreads_evenly() {
        let m = WeightMatrix::from_rows(vec![vec![0.0, 0.0]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 1));
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Normalize).unwrap();
        assert_eq!(out.row(0), &[0.5, 0.5]);
    }

    #[test]
    fn soft_weight_blends_against_original() {
        let m = WeightMatrix::from_rows(vec![vec![0.5, 0.5]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0)).with_soft_weights(vec![0.5]);
        let out = redistribute(&m, &unlocked(&m), &sel, EditOperation::Absolute(1.0)).unwrap();
        assert_close(out.get(0, 0), 0.75);
        assert_close(out.get(0, 1), 0.25);
    }

    #[test]
    fn auto_prune_cleans_small_weights() {
        let m = WeightMatrix::from_rows(vec![vec![0.5, 0.46, 0.04]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = RedistributionEngine::new()
            .with_auto_prune(Some(0.05))
            .apply(&m, &unlocked(&m), &sel, EditOperation::Absolute(0.5))
            .unwrap();
        assert_eq!(out.get(0, 2), 0.0);
        assert_close(out.row_sum(0), 1.0);
    }

    #[test]
    fn independent_policy_writes_clipped_candidates() {
        let m = WeightMatrix::from_rows(vec![vec![0.2, 0.9]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let out = RedistributionEngine::new()
            .with_policy(MassPolicy::Independent)
            .apply(&m, &unlocked(&m), &sel, EditOperation::Add(1.0))
            .unwrap();
        assert_eq!(out.row(0), &[1.0, 0.9]);
    }

    #[test]
    fn smooth_requires_adjacency() {
        let m = WeightMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 0));
        let op = EditOperation::Smooth(SmoothParams::smooth(1));
        let err = redistribute(&m, &unlocked(&m), &sel, op).unwrap_err();
        assert!(matches!(err, EditError::InvalidOperationParameter { operation: "smooth", .. }));
    }

    #[test]
    fn smooth_moves_toward_neighbor_mean() {
        let m = WeightMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]])
            .unwrap();
        let adjacency = AdjacencyGraph::new(vec![vec![1], vec![0, 2], vec![1]]).unwrap();
        let out = smooth(&m, &adjacency, &[false, true, false], 1, false).unwrap();
        assert_close(out.get(1, 0), 1.0);
        assert_close(out.get(1, 1), 0.0);
        assert_eq!(out.row(0), m.row(0));
    }

    #[test]
    fn reassign_needs_positions() {
        let m = WeightMatrix::from_rows(vec![vec![0.5, 0.5]]).unwrap();
        let sel = SelectionRegion::from_chunk(Chunk::new(0, 0, 0, 1));
        let op = EditOperation::ReassignLocally { strength: 1.0 };
        assert!(redistribute(&m, &unlocked(&m), &sel, op).is_err());

        let positions = RestPositions::new(
            vec![[0.25, 0.0, 0.0]],
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        );
        let out = RedistributionEngine::new()
            .with_positions(&positions)
            .apply(&m, &unlocked(&m), &sel, op)
            .unwrap();
        assert_close(out.get(0, 0), 0.75);
        assert_close(out.get(0, 1), 0.25);
    }

    #[test]
    fn invalid_parameter_rejected_before_anything() {
        let m = WeightMatrix::from_rows(vec![vec![0.5, 0.5]]).unwrap();
        let err = redistribute(
            &m,
            &LockState::unlocked(3, 3),
            &SelectionRegion::new(),
            EditOperation::Absolute(2.0),
        )
        .unwrap_err();
        assert!(matches!(err, EditError::InvalidOperationParameter { .. }));
    }

    #[test]
    fn smooth_checks_row_mask_length() {
        let m = WeightMatrix::new(2, 1);
        let adjacency = AdjacencyGraph::isolated(2);
        assert!(matches!(
            smooth(&m, &adjacency, &[true], 1, false),
            Err(EditError::ShapeMismatch { what: "selection rows", .. })
        ));
    }
}
