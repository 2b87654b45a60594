//! Rectangular selections, hidden columns, and soft-selection ordering.
//!
//! A [`SelectionRegion`] is what a host table or brush hands to the engine:
//! one or more inclusive rectangles over the matrix, a set of hidden columns
//! that are never edited, and an optional per-row soft weight.
//!
//! [`SoftOrder`] captures the display order used when rows are sorted by
//! soft-selection strength, and restores host order before commit.

#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

use crate::error::EditError;
use crate::matrix::WeightMatrix;
use crate::mirror_map::MirrorMap;

/// Inclusive rectangle `(row_start..=row_end, col_start..=col_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    /// First selected row.
    pub row_start: usize,
    /// Last selected row (inclusive).
    pub row_end: usize,
    /// First selected column.
    pub col_start: usize,
    /// Last selected column (inclusive).
    pub col_end: usize,
}

impl Chunk {
    /// Creates a chunk, swapping reversed bounds.
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start: row_start.min(row_end),
            row_end: row_start.max(row_end),
            col_start: col_start.min(col_end),
            col_end: col_start.max(col_end),
        }
    }

    /// Whether `(row, col)` falls inside the rectangle.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row_start..=self.row_end).contains(&row)
            && (self.col_start..=self.col_end).contains(&col)
    }
}

/// Union of chunks plus hidden columns and soft weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionRegion {
    chunks: Vec<Chunk>,
    hidden_columns: Vec<usize>,
    soft_weights: Option<Vec<f64>>,
}

impl SelectionRegion {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection covering one chunk.
    pub fn from_chunk(chunk: Chunk) -> Self {
        Self::new().with_chunk(chunk)
    }

    /// Selection of whole rows: every `true` entry of `rows` selects all
    /// `cols` columns of that row. Contiguous runs become one chunk.
    pub fn from_row_mask(rows: &[bool], cols: usize) -> Self {
        let mut selection = Self::new();
        if cols == 0 {
            return selection;
        }
        let mut start = None;
        for (r, &selected) in rows.iter().chain(core::iter::once(&false)).enumerate() {
            match (selected, start) {
                (true, None) => start = Some(r),
                (false, Some(s)) => {
                    selection.chunks.push(Chunk::new(s, r - 1, 0, cols - 1));
                    start = None;
                }
                _ => {}
            }
        }
        selection
    }

    /// Adds a chunk.
    pub fn with_chunk(mut self, chunk: Chunk) -> Self {
        self.chunks.push(chunk);
        self
    }

    /// Sets the hidden columns.
    pub fn with_hidden_columns(mut self, columns: Vec<usize>) -> Self {
        self.hidden_columns = columns;
        self
    }

    /// Sets per-row soft weights, indexed by absolute matrix row.
    pub fn with_soft_weights(mut self, weights: Vec<f64>) -> Self {
        self.soft_weights = Some(weights);
        self
    }

    /// The chunks in insertion order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Hidden column indices.
    pub fn hidden_columns(&self) -> &[usize] {
        &self.hidden_columns
    }

    /// Whether `col` is hidden.
    #[inline]
    pub fn is_hidden(&self, col: usize) -> bool {
        self.hidden_columns.contains(&col)
    }

    /// Whether any chunk contains `(row, col)`.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.chunks.iter().any(|c| c.contains(row, col))
    }

    /// The edited row range `(min row_start, max row_end)`, or `None` when
    /// the selection has no chunk.
    pub fn row_range(&self) -> Option<(usize, usize)> {
        let first = self.chunks.iter().map(|c| c.row_start).min()?;
        let last = self.chunks.iter().map(|c| c.row_end).max()?;
        Some((first, last))
    }

    /// Soft weight of `row`; 1.0 when soft selection is off.
    #[inline]
    pub fn soft_weight(&self, row: usize) -> f64 {
        self.soft_weights
            .as_ref()
            .and_then(|w| w.get(row).copied())
            .unwrap_or(1.0)
    }

    /// Whether soft weights were supplied.
    pub fn has_soft_weights(&self) -> bool {
        self.soft_weights.is_some()
    }

    /// Rejects chunks, hidden columns, or soft weights that do not fit a
    /// `rows × cols` matrix.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] for bounds, and
    /// [`EditError::InvalidOperationParameter`] for soft weights outside `[0, 1]`.
    pub fn validate(&self, rows: usize, cols: usize) -> Result<(), EditError> {
        for chunk in &self.chunks {
            if chunk.row_end >= rows {
                return Err(EditError::shape("selection row", rows, chunk.row_end));
            }
            if chunk.col_end >= cols {
                return Err(EditError::shape("selection column", cols, chunk.col_end));
            }
        }
        if let Some(&c) = self.hidden_columns.iter().find(|&&c| c >= cols) {
            return Err(EditError::shape("hidden column", cols, c));
        }
        if let Some(weights) = &self.soft_weights {
            if weights.len() != rows {
                return Err(EditError::shape("soft weights", rows, weights.len()));
            }
            if let Some(w) = weights.iter().find(|w| !(0.0..=1.0).contains(*w)) {
                return Err(EditError::parameter(
                    "soft selection",
                    format!("weight {w} outside [0, 1]"),
                ));
            }
        }
        Ok(())
    }

    /// The same rows with every selected column replaced by its mirror.
    ///
    /// Columns mirroring to themselves are kept. Hidden columns and soft
    /// weights carry over unchanged.
    pub fn mirrored(&self, mirror: &MirrorMap) -> Self {
        let mut chunks: Vec<Chunk> = Vec::new();
        for chunk in &self.chunks {
            for col in chunk.col_start..=chunk.col_end {
                let target = mirror.mirror(col);
                let mirrored = Chunk::new(chunk.row_start, chunk.row_end, target, target);
                if !chunks.contains(&mirrored) {
                    chunks.push(mirrored);
                }
            }
        }
        Self {
            chunks,
            hidden_columns: self.hidden_columns.clone(),
            soft_weights: self.soft_weights.clone(),
        }
    }
}

impl SelectionRegion {
    /// This selection plus its mirrored chunks.
    pub fn with_mirrored(&self, mirror: &MirrorMap) -> Self {
        let mut both = self.clone();
        for chunk in self.mirrored(mirror).chunks {
            if !both.chunks.contains(&chunk) {
                both.chunks.push(chunk);
            }
        }
        both
    }
}

/// Row permutation sorting elements by descending soft weight.
///
/// `sorted_indices[i]` is the host row shown at display row `i`;
/// `opposite_sorted_indices` is its inverse and restores host order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftOrder {
    sorted: Vec<usize>,
    opposite: Vec<usize>,
}

impl SoftOrder {
    /// Builds the order from per-row weights. Ties keep host order.
    pub fn from_weights(weights: &[f64]) -> Self {
        let mut sorted: Vec<usize> = (0..weights.len()).collect();
        sorted.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
        let mut opposite = vec![0; sorted.len()];
        for (display, &host) in sorted.iter().enumerate() {
            opposite[host] = display;
        }
        Self { sorted, opposite }
    }

    /// Forward order: display row → host row.
    pub fn sorted_indices(&self) -> &[usize] {
        &self.sorted
    }

    /// Inverse order: host row → display row.
    pub fn opposite_sorted_indices(&self) -> &[usize] {
        &self.opposite
    }

    /// Reorders a host-ordered matrix for display.
    pub fn to_display(&self, matrix: &WeightMatrix) -> WeightMatrix {
        matrix.permute_rows(&self.sorted)
    }

    /// Restores host order from a display-ordered matrix.
    pub fn to_host(&self, matrix: &WeightMatrix) -> WeightMatrix {
        matrix.permute_rows(&self.opposite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_normalizes_bounds() {
        let c = Chunk::new(3, 1, 4, 2);
        assert_eq!((c.row_start, c.row_end, c.col_start, c.col_end), (1, 3, 2, 4));
        assert!(c.contains(2, 3));
        assert!(!c.contains(0, 3));
    }

    #[test]
    fn row_range_spans_all_chunks() {
        let s = SelectionRegion::new()
            .with_chunk(Chunk::new(4, 6, 0, 0))
            .with_chunk(Chunk::new(1, 2, 1, 1));
        assert_eq!(s.row_range(), Some((1, 6)));
        assert_eq!(SelectionRegion::new().row_range(), None);
    }

    #[test]
    fn from_row_mask_groups_runs() {
        let s = SelectionRegion::from_row_mask(&[true, true, false, true], 3);
        assert_eq!(s.chunks(), &[Chunk::new(0, 1, 0, 2), Chunk::new(3, 3, 0, 2)]);
    }

    #[test]
    fn validate_checks_bounds_and_weights() {
        let s = SelectionRegion::from_chunk(Chunk::new(0, 2, 0, 1));
        assert!(s.validate(3, 2).is_ok());
        assert!(s.validate(2, 2).is_err());
        assert!(s.clone().with_hidden_columns(vec![2]).validate(3, 2).is_err());
        assert!(
            s.clone()
                .with_soft_weights(vec![1.0, 0.5])
                .validate(3, 2)
                .is_err()
        );
        assert!(matches!(
            s.with_soft_weights(vec![1.0, 1.5, 0.0]).validate(3, 2),
            Err(EditError::InvalidOperationParameter { .. })
        ));
    }

    #[test]
    fn soft_weight_defaults_to_one() {
        let s = SelectionRegion::new();
        assert_eq!(s.soft_weight(7), 1.0);
        let s = s.with_soft_weights(vec![0.25]);
        assert_eq!(s.soft_weight(0), 0.25);
    }

    #[test]
    fn mirrored_maps_columns() {
        let mirror = MirrorMap::from_targets(vec![1, 0, 2]).unwrap();
        let s = SelectionRegion::from_chunk(Chunk::new(0, 1, 0, 2));
        let m = s.mirrored(&mirror);
        assert_eq!(
            m.chunks(),
            &[Chunk::new(0, 1, 1, 1), Chunk::new(0, 1, 0, 0), Chunk::new(0, 1, 2, 2)]
        );
    }

    #[test]
    fn with_mirrored_keeps_original_chunks() {
        let mirror = MirrorMap::from_targets(vec![1, 0]).unwrap();
        let s = SelectionRegion::from_chunk(Chunk::new(2, 3, 0, 0)).with_mirrored(&mirror);
        assert_eq!(s.chunks(), &[Chunk::new(2, 3, 0, 0), Chunk::new(2, 3, 1, 1)]);
    }

    #[test]
    fn soft_order_round_trips() {
        let order = SoftOrder::from_weights(&[0.2, 1.0, 0.5, 1.0]);
        assert_eq!(order.sorted_indices(), &[1, 3, 2, 0]);
        assert_eq!(order.opposite_sorted_indices(), &[3, 0, 2, 1]);

        let m = WeightMatrix::from_rows(vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let display = order.to_display(&m);
        assert_eq!(display.get(0, 0), 1.0);
        assert_eq!(display.get(3, 0), 0.0);
        assert_eq!(order.to_host(&display), m);
    }
}
