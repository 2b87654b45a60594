//! Driver mirror table and dense/sparse driver index translation.
//!
//! Hosts address drivers by *logical* (sparse) indices that may have holes
//! after drivers are removed; the engine addresses them by dense column
//! index. [`IndexMap`] holds both directions, built once per session.
//! [`MirrorMap`] pairs each dense column with its bilateral counterpart.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::EditError;

/// Involutive mapping `driver → mirrored driver`.
///
/// Unpaired drivers map to themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorMap {
    targets: Vec<usize>,
}

impl MirrorMap {
    /// Every driver mirrors to itself.
    pub fn identity(len: usize) -> Self {
        Self {
            targets: (0..len).collect(),
        }
    }

    /// Builds a map from an explicit target table.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ShapeMismatch`] if a target is out of range, and
    /// [`EditError::InvalidOperationParameter`] if the table is not an
    /// involution.
    pub fn from_targets(targets: Vec<usize>) -> Result<Self, EditError> {
        let len = targets.len();
        if let Some(&bad) = targets.iter().find(|&&t| t >= len) {
            return Err(EditError::shape("mirror target", len, bad));
        }
        let map = Self { targets };
        if !map.is_involution() {
            return Err(EditError::parameter(
                "mirror",
                "mirror table must map every pair both ways",
            ));
        }
        Ok(map)
    }

    /// Records `a ↔ b`. Both must currently mirror to themselves.
    ///
    /// Returns `false` (and changes nothing) when either side is already paired
    /// or out of range.
    pub fn pair(&mut self, a: usize, b: usize) -> bool {
        let len = self.targets.len();
        if a >= len || b >= len || self.is_paired(a) || self.is_paired(b) {
            return false;
        }
        self.targets[a] = b;
        self.targets[b] = a;
        true
    }

    /// Mirror of `driver`; out-of-range indices mirror to themselves.
    #[inline]
    pub fn mirror(&self, driver: usize) -> usize {
        self.targets.get(driver).copied().unwrap_or(driver)
    }

    /// Whether `driver` has a counterpart other than itself.
    #[inline]
    pub fn is_paired(&self, driver: usize) -> bool {
        self.mirror(driver) != driver
    }

    /// Number of drivers.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` for an empty table.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The dense target table.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Distinct pairs `(a, b)` with `a < b`.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.targets
            .iter()
            .enumerate()
            .filter(|&(a, &b)| a < b)
            .map(|(a, &b)| (a, b))
            .collect()
    }

    /// `mirror(mirror(i)) == i` for every `i`.
    pub fn is_involution(&self) -> bool {
        self.targets
            .iter()
            .enumerate()
            .all(|(i, &t)| self.mirror(t) == i)
    }

    /// Host-indexed table: slot `sparse` holds the sparse index of its mirror,
    /// `None` for logical slots no driver occupies.
    pub fn to_sparse(&self, index: &IndexMap) -> Vec<Option<usize>> {
        let mut table = vec![None; index.sparse_len()];
        for (dense, &target) in self.targets.iter().enumerate() {
            if let (Some(from), Some(to)) = (index.to_sparse(dense), index.to_sparse(target)) {
                table[from] = Some(to);
            }
        }
        table
    }
}

/// Dense ↔ sparse driver index tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
    dense_to_sparse: Vec<usize>,
    sparse_to_dense: Vec<Option<usize>>,
}

impl IndexMap {
    /// Builds the tables from the host's sparse index of each dense column.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidOperationParameter`] if a sparse index repeats.
    pub fn from_sparse(sparse: Vec<usize>) -> Result<Self, EditError> {
        let len = sparse.iter().max().map_or(0, |&m| m + 1);
        let mut sparse_to_dense = vec![None; len];
        for (dense, &s) in sparse.iter().enumerate() {
            if sparse_to_dense[s].is_some() {
                return Err(EditError::parameter(
                    "index map",
                    "sparse driver indices must be unique",
                ));
            }
            sparse_to_dense[s] = Some(dense);
        }
        Ok(Self {
            dense_to_sparse: sparse,
            sparse_to_dense,
        })
    }

    /// Identity tables for `len` contiguous drivers.
    pub fn contiguous(len: usize) -> Self {
        Self {
            dense_to_sparse: (0..len).collect(),
            sparse_to_dense: (0..len).map(Some).collect(),
        }
    }

    /// Sparse index of a dense column.
    #[inline]
    pub fn to_sparse(&self, dense: usize) -> Option<usize> {
        self.dense_to_sparse.get(dense).copied()
    }

    /// Dense column of a sparse index, `None` for holes.
    #[inline]
    pub fn to_dense(&self, sparse: usize) -> Option<usize> {
        self.sparse_to_dense.get(sparse).copied().flatten()
    }

    /// Number of dense columns.
    pub fn dense_len(&self) -> usize {
        self.dense_to_sparse.len()
    }

    /// Size of the sparse index space (largest sparse index + 1).
    pub fn sparse_len(&self) -> usize {
        self.sparse_to_dense.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_involution() {
        let m = MirrorMap::identity(4);
        assert!(m.is_involution());
        assert!(m.pairs().is_empty());
        assert_eq!(m.mirror(9), 9);
    }

    #[test]
    fn pair_records_both_directions() {
        let mut m = MirrorMap::identity(4);
        assert!(m.pair(0, 3));
        assert_eq!(m.mirror(0), 3);
        assert_eq!(m.mirror(3), 0);
        assert!(!m.pair(3, 1), "already paired drivers are not re-paired");
        assert_eq!(m.pairs(), vec![(0, 3)]);
    }

    #[test]
    fn from_targets_rejects_non_involution() {
        assert!(MirrorMap::from_targets(vec![1, 2, 0]).is_err());
        assert!(MirrorMap::from_targets(vec![1, 0, 5]).is_err());
        assert!(MirrorMap::from_targets(vec![1, 0, 2]).is_ok());
    }

    #[test]
    fn index_map_translates_both_ways() {
        let index = IndexMap::from_sparse(vec![0, 2, 5]).unwrap();
        assert_eq!(index.to_sparse(1), Some(2));
        assert_eq!(index.to_dense(5), Some(2));
        assert_eq!(index.to_dense(3), None);
        assert_eq!(index.sparse_len(), 6);
        assert_eq!(index.dense_len(), 3);
    }

    #[test]
    fn index_map_rejects_duplicates() {
        assert!(IndexMap::from_sparse(vec![1, 1]).is_err());
    }

    #[test]
    fn mirror_to_sparse_fills_holes_with_none() {
        let index = IndexMap::from_sparse(vec![0, 2, 5]).unwrap();
        let mut m = MirrorMap::identity(3);
        m.pair(0, 2);
        assert_eq!(
            m.to_sparse(&index),
            vec![Some(5), None, Some(2), None, None, Some(0)]
        );
    }
}
