//! Edit session: the current matrix plus everything an edit gesture needs.
//!
//! A session owns its matrix snapshot, lock state, optional adjacency, rest
//! positions and mirror tables, and keeps bounded undo/redo stacks of matrix
//! snapshots. Hosts create one per tool activation and pass it around
//! explicitly.

#[cfg(not(feature = "std"))]
use alloc::{collections::VecDeque, vec, vec::Vec};
#[cfg(feature = "std")]
use std::collections::VecDeque;

use crate::adjacency::AdjacencyGraph;
use crate::engine::RedistributionEngine;
use crate::error::EditError;
use crate::lock::LockState;
use crate::matrix::WeightMatrix;
use crate::mirror_map::{IndexMap, MirrorMap};
use crate::operation::{EditOperation, MassPolicy};
use crate::selection::SelectionRegion;
use crate::spatial::RestPositions;
use crate::validate::max_drift;

/// Default number of undo snapshots kept.
pub const DEFAULT_UNDO_LIMIT: usize = 32;

/// Matrix snapshot, locks, tables and history for one editing session.
#[derive(Debug, Clone)]
pub struct EditSession {
    matrix: WeightMatrix,
    locks: LockState,
    adjacency: Option<AdjacencyGraph>,
    positions: Option<RestPositions>,
    mirror: Option<MirrorMap>,
    index: Option<IndexMap>,
    policy: MassPolicy,
    auto_prune: Option<f64>,
    undo_limit: usize,
    undo: VecDeque<WeightMatrix>,
    redo: Vec<WeightMatrix>,
}

impl EditSession {
    /// Starts a session with nothing locked.
    pub fn new(matrix: WeightMatrix) -> Self {
        let locks = LockState::unlocked(matrix.rows(), matrix.cols());
        Self {
            matrix,
            locks,
            adjacency: None,
            positions: None,
            mirror: None,
            index: None,
            policy: MassPolicy::Normalized,
            auto_prune: None,
            undo_limit: DEFAULT_UNDO_LIMIT,
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    /// Replaces the lock state.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] if the locks do not cover the matrix.
    pub fn with_locks(mut self, locks: LockState) -> Result<Self, EditError> {
        locks.check_shape(self.matrix.rows(), self.matrix.cols())?;
        self.locks = locks;
        Ok(self)
    }

    /// Attaches the adjacency used for smoothing.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] unless the graph has one element per row.
    pub fn with_adjacency(mut self, adjacency: AdjacencyGraph) -> Result<Self, EditError> {
        if adjacency.len() != self.matrix.rows() {
            return Err(EditError::shape(
                "adjacency elements",
                self.matrix.rows(),
                adjacency.len(),
            ));
        }
        self.adjacency = Some(adjacency);
        Ok(self)
    }

    /// Attaches rest positions for local reassignment.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] if the counts do not match the matrix.
    pub fn with_positions(mut self, positions: RestPositions) -> Result<Self, EditError> {
        positions.check_shape(self.matrix.rows(), self.matrix.cols())?;
        self.positions = Some(positions);
        Ok(self)
    }

    /// Attaches the driver mirror table.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] unless the table has one entry per column.
    pub fn with_mirror(mut self, mirror: MirrorMap) -> Result<Self, EditError> {
        if mirror.len() != self.matrix.cols() {
            return Err(EditError::shape("mirror table", self.matrix.cols(), mirror.len()));
        }
        self.mirror = Some(mirror);
        Ok(self)
    }

    /// Attaches the dense/sparse driver index tables.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] unless the map has one dense index per column.
    pub fn with_index_map(mut self, index: IndexMap) -> Result<Self, EditError> {
        if index.dense_len() != self.matrix.cols() {
            return Err(EditError::shape("index map", self.matrix.cols(), index.dense_len()));
        }
        self.index = Some(index);
        Ok(self)
    }

    /// Sets the mass policy.
    pub fn with_policy(mut self, policy: MassPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables auto-prune after every edit.
    pub fn with_auto_prune(mut self, threshold: Option<f64>) -> Self {
        self.auto_prune = threshold;
        self
    }

    /// Bounds the undo history. Zero disables undo.
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = limit;
        self.trim_undo();
        self
    }

    /// The current matrix.
    pub fn matrix(&self) -> &WeightMatrix {
        &self.matrix
    }

    /// Consumes the session, returning the current matrix.
    pub fn into_matrix(self) -> WeightMatrix {
        self.matrix
    }

    /// The current lock state.
    pub fn locks(&self) -> &LockState {
        &self.locks
    }

    /// The mirror table, if attached.
    pub fn mirror(&self) -> Option<&MirrorMap> {
        self.mirror.as_ref()
    }

    /// The index tables, if attached.
    pub fn index_map(&self) -> Option<&IndexMap> {
        self.index.as_ref()
    }

    /// The mass policy.
    pub fn policy(&self) -> MassPolicy {
        self.policy
    }

    /// Number of snapshots available to [`undo`](Self::undo).
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Whether [`undo`](Self::undo) would change anything.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`redo`](Self::redo) would change anything.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn engine(&self) -> RedistributionEngine<'_> {
        let mut engine = RedistributionEngine::new()
            .with_policy(self.policy)
            .with_auto_prune(self.auto_prune);
        if let Some(adjacency) = &self.adjacency {
            engine = engine.with_adjacency(adjacency);
        }
        if let Some(positions) = &self.positions {
            engine = engine.with_positions(positions);
        }
        engine
    }

    /// Applies one operation and records an undo snapshot.
    ///
    /// # Errors
    ///
    /// Any [`EditError`] from the engine; the session is unchanged on error.
    pub fn apply(
        &mut self,
        selection: &SelectionRegion,
        operation: EditOperation,
    ) -> Result<(), EditError> {
        let next = self
            .engine()
            .apply(&self.matrix, &self.locks, selection, operation)?;
        self.commit(next);
        Ok(())
    }

    /// Applies the operation to `selection` together with its mirrored
    /// counterpart in a single pass, as one undo step.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidOperationParameter`] without a mirror table,
    /// otherwise any engine error. The session is unchanged on error.
    pub fn apply_mirrored(
        &mut self,
        selection: &SelectionRegion,
        operation: EditOperation,
    ) -> Result<(), EditError> {
        let mirror = self
            .mirror
            .as_ref()
            .ok_or_else(|| EditError::parameter(operation.name(), "no mirror table attached"))?;
        let both = selection.with_mirrored(mirror);
        let next = self
            .engine()
            .apply(&self.matrix, &self.locks, &both, operation)?;
        self.commit(next);
        Ok(())
    }

    /// Restores the previous snapshot. Returns `false` with nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let current = core::mem::replace(&mut self.matrix, previous);
        self.redo.push(current);
        #[cfg(feature = "tracing")]
        tracing::debug!("session_undo: {} snapshots left", self.undo.len());
        true
    }

    /// Re-applies the last undone snapshot. Returns `false` with nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let current = core::mem::replace(&mut self.matrix, next);
        self.undo.push_back(current);
        self.trim_undo();
        true
    }

    /// Renormalizes every unlocked row when the largest row drift exceeds
    /// `tolerance`. Returns whether a normalize ran.
    ///
    /// Sessions with the [`MassPolicy::Independent`] policy never drift.
    ///
    /// # Errors
    ///
    /// Any engine error other than [`EditError::EmptySelection`].
    pub fn normalize_if_drifted(&mut self, tolerance: f64) -> Result<bool, EditError> {
        if self.policy == MassPolicy::Independent
            || max_drift(&self.matrix, &self.locks) <= tolerance
        {
            return Ok(false);
        }
        let rows = vec![true; self.matrix.rows()];
        let selection = SelectionRegion::from_row_mask(&rows, self.matrix.cols());
        match self.apply(&selection, EditOperation::Normalize) {
            Ok(()) => Ok(true),
            Err(e) if e.is_no_op() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Locks rows.
    pub fn lock_rows(&mut self, rows: &[usize]) {
        self.locks.set_rows_locked(rows, true);
    }

    /// Unlocks rows.
    pub fn unlock_rows(&mut self, rows: &[usize]) {
        self.locks.set_rows_locked(rows, false);
    }

    /// Locks columns (dense indices).
    pub fn lock_columns(&mut self, columns: &[usize]) {
        self.locks.set_columns_locked(columns, true);
    }

    /// Unlocks columns (dense indices).
    pub fn unlock_columns(&mut self, columns: &[usize]) {
        self.locks.set_columns_locked(columns, false);
    }

    /// Translates host (sparse) driver indices to dense columns through the
    /// attached index map. Holes and unknown indices are dropped; without a
    /// map the indices are returned as is.
    pub fn dense_columns(&self, sparse: &[usize]) -> Vec<usize> {
        match &self.index {
            Some(index) => sparse.iter().filter_map(|&s| index.to_dense(s)).collect(),
            None => sparse.to_vec(),
        }
    }

    fn commit(&mut self, next: WeightMatrix) {
        let previous = core::mem::replace(&mut self.matrix, next);
        if self.undo_limit > 0 {
            self.undo.push_back(previous);
            self.trim_undo();
        }
        self.redo.clear();
    }

    fn trim_undo(&mut self) {
        while self.undo.len() > self.undo_limit {
            self.undo.pop_front();
        }
    }
}
