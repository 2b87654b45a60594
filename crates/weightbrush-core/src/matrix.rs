//! Row-major weight matrix with a cached row-sum column.
//!
//! Rows are elements (vertices, CVs, lattice points), columns are drivers
//! (influences, blend-shape channels, attributes). The engine never mutates
//! its input matrix; it clones and returns a new one.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::EditError;

/// Dense `rows × cols` matrix of weights.
///
/// Every write refreshes the row-sum cache of the affected row, so
/// [`row_sum()`](Self::row_sum) is always consistent with the stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    sums: Vec<f64>,
}

impl WeightMatrix {
    /// Creates a zero-filled matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
            sums: vec![0.0; rows],
        }
    }

    /// Creates a matrix from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, EditError> {
        if data.len() != rows * cols {
            return Err(EditError::shape("matrix data", rows * cols, data.len()));
        }
        let mut matrix = Self {
            rows,
            cols,
            data,
            sums: vec![0.0; rows],
        };
        matrix.refresh_sums();
        Ok(matrix)
    }

    /// Creates a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ShapeMismatch`] if rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, EditError> {
        let cols = rows.first().map_or(0, Vec::len);
        let count = rows.len();
        let mut data = Vec::with_capacity(count * cols);
        for row in rows {
            if row.len() != cols {
                return Err(EditError::shape("matrix row", cols, row.len()));
            }
            data.extend(row);
        }
        Self::from_vec(count, cols, data)
    }

    /// Number of rows (elements).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (drivers).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `true` when the matrix has no cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(col < self.cols, "column {col} out of bounds");
        self.data[row * self.cols + col]
    }

    /// Writes `(row, col)` and refreshes that row's cached sum.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(col < self.cols, "column {col} out of bounds");
        self.data[row * self.cols + col] = value;
        self.refresh_row(row);
    }

    /// Borrow one row.
    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Replaces one row and refreshes its cached sum.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != self.cols()`.
    pub fn set_row(&mut self, row: usize, values: &[f64]) {
        assert_eq!(values.len(), self.cols, "set_row: length mismatch");
        let start = row * self.cols;
        self.data[start..start + self.cols].copy_from_slice(values);
        self.refresh_row(row);
    }

    /// Cached sum of one row.
    #[inline]
    pub fn row_sum(&self, row: usize) -> f64 {
        self.sums[row]
    }

    /// All cached row sums.
    pub fn row_sums(&self) -> &[f64] {
        &self.sums
    }

    /// Flat row-major view of the values.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mean of `col` over the inclusive row range `first..=last`.
    ///
    /// Returns 0.0 for an empty range.
    pub fn column_mean(&self, col: usize, first: usize, last: usize) -> f64 {
        if last < first {
            return 0.0;
        }
        let sum: f64 = (first..=last).map(|r| self.get(r, col)).sum();
        sum / (last - first + 1) as f64
    }

    /// Columns whose every value is exactly zero.
    ///
    /// Hosts use this to hide empty drivers from the selection.
    pub fn zero_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .filter(|&c| (0..self.rows).all(|r| self.get(r, c) == 0.0))
            .collect()
    }

    /// Rows holding a non-zero weight in any of `columns`.
    pub fn nonzero_rows(&self, columns: &[usize]) -> Vec<usize> {
        (0..self.rows)
            .filter(|&r| columns.iter().any(|&c| self.get(r, c) != 0.0))
            .collect()
    }

    /// Copies rows `first..first + count` into a new matrix.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the matrix.
    pub fn sub_rows(&self, first: usize, count: usize) -> Self {
        let start = first * self.cols;
        let end = (first + count) * self.cols;
        Self {
            rows: count,
            cols: self.cols,
            data: self.data[start..end].to_vec(),
            sums: self.sums[first..first + count].to_vec(),
        }
    }

    /// Writes `block` into this matrix starting at row `first`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::ShapeMismatch`] if the block does not fit.
    pub fn write_rows(&mut self, first: usize, block: &WeightMatrix) -> Result<(), EditError> {
        if block.cols != self.cols {
            return Err(EditError::shape("block columns", self.cols, block.cols));
        }
        if first + block.rows > self.rows {
            return Err(EditError::shape("block rows", self.rows, first + block.rows));
        }
        let start = first * self.cols;
        self.data[start..start + block.data.len()].copy_from_slice(&block.data);
        self.sums[first..first + block.rows].copy_from_slice(&block.sums);
        Ok(())
    }

    /// Builds a new matrix whose row `i` is row `order[i]` of `self`.
    ///
    /// # Panics
    ///
    /// Panics if an index in `order` is out of bounds.
    pub fn permute_rows(&self, order: &[usize]) -> Self {
        let mut data = Vec::with_capacity(order.len() * self.cols);
        let mut sums = Vec::with_capacity(order.len());
        for &src in order {
            data.extend_from_slice(self.row(src));
            sums.push(self.sums[src]);
        }
        Self {
            rows: order.len(),
            cols: self.cols,
            data,
            sums,
        }
    }

    /// Checks that every cell is finite and inside `[-tolerance, 1 + tolerance]`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidWeight`] for the first offending cell in
    /// row-major order.
    pub fn check_values(&self, tolerance: f64) -> Result<(), EditError> {
        let range = -tolerance..=1.0 + tolerance;
        match self.data.iter().position(|v| !v.is_finite() || !range.contains(v)) {
            Some(i) => Err(EditError::InvalidWeight {
                row: i / self.cols,
                col: i % self.cols,
                value: self.data[i],
            }),
            None => Ok(()),
        }
    }

    /// Largest absolute cell difference against a same-shaped matrix.
    ///
    /// Returns `f64::INFINITY` when shapes differ.
    pub fn max_abs_diff(&self, other: &WeightMatrix) -> f64 {
        if self.rows != other.rows || self.cols != other.cols {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    pub(crate) fn refresh_row(&mut self, row: usize) {
        let sum: f64 = self.row(row).iter().sum();
        self.sums[row] = sum;
    }

    fn refresh_sums(&mut self) {
        for row in 0..self.rows {
            self.refresh_row(row);
        }
    }
}
