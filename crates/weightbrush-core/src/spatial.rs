//! Rest-position tools: local reassignment and nearest-position paste.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::EditError;
use crate::matrix::WeightMatrix;

/// A rest-pose position.
pub type Point = [f64; 3];

/// Rest positions of elements (rows) and drivers (columns).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestPositions {
    /// One point per matrix row.
    pub elements: Vec<Point>,
    /// One point per matrix column.
    pub drivers: Vec<Point>,
}

impl RestPositions {
    /// Bundles element and driver positions.
    pub fn new(elements: Vec<Point>, drivers: Vec<Point>) -> Self {
        Self { elements, drivers }
    }

    /// Checks the position counts against a `rows × cols` matrix.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] on disagreement.
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<(), EditError> {
        if self.elements.len() != rows {
            return Err(EditError::shape("element positions", rows, self.elements.len()));
        }
        if self.drivers.len() != cols {
            return Err(EditError::shape("driver positions", cols, self.drivers.len()));
        }
        Ok(())
    }
}

#[inline]
fn sub(a: Point, b: Point) -> Point {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn dot(a: Point, b: Point) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Squared euclidean distance.
#[inline]
pub fn distance_sq(a: Point, b: Point) -> f64 {
    let d = sub(a, b);
    dot(d, d)
}

/// Euclidean distance.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    libm::sqrt(distance_sq(a, b))
}

/// Split of one element between its two closest drivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalSplit {
    /// Closest driver column.
    pub first: usize,
    /// Second closest driver column, `None` when only one candidate exists.
    pub second: Option<usize>,
    /// Share of `second` in `[0, 1]`; `first` receives `1 − t`.
    pub t: f64,
}

impl LocalSplit {
    /// Share of `col` in this split.
    pub fn share(&self, col: usize) -> f64 {
        if col == self.first {
            1.0 - self.t
        } else if Some(col) == self.second {
            self.t
        } else {
            0.0
        }
    }
}

/// Projects `point` onto the segment between its two closest `candidates`.
///
/// Candidates are driver columns; `drivers[c]` is their position. Ties in
/// distance keep the lower column first. Returns `None` without candidates.
pub fn local_split(point: Point, drivers: &[Point], candidates: &[usize]) -> Option<LocalSplit> {
    let mut ranked: Vec<(f64, usize)> = candidates
        .iter()
        .map(|&c| (distance_sq(point, drivers[c]), c))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let &(_, first) = ranked.first()?;
    let Some(&(_, second)) = ranked.get(1) else {
        return Some(LocalSplit {
            first,
            second: None,
            t: 0.0,
        });
    };

    let axis = sub(drivers[second], drivers[first]);
    let length_sq = dot(axis, axis);
    let t = if length_sq > 0.0 {
        (dot(sub(point, drivers[first]), axis) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(LocalSplit {
        first,
        second: Some(second),
        t,
    })
}

/// Index of the point closest to `target`; ties keep the lowest index.
pub fn nearest(points: &[Point], target: Point) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| (distance_sq(p, target), i))
        .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
        .map(|(_, i)| i)
}

/// Builds one row per target position by copying the row of the closest
/// copied element.
///
/// # Errors
///
/// [`EditError::ShapeMismatch`] if `copied_positions` does not have one point
/// per copied row, [`EditError::EmptySelection`] if nothing was copied.
pub fn paste_nearest(
    copied: &WeightMatrix,
    copied_positions: &[Point],
    target_positions: &[Point],
) -> Result<WeightMatrix, EditError> {
    if copied_positions.len() != copied.rows() {
        return Err(EditError::shape(
            "copied positions",
            copied.rows(),
            copied_positions.len(),
        ));
    }
    if copied.rows() == 0 {
        return Err(EditError::EmptySelection);
    }
    let mut out = WeightMatrix::new(target_positions.len(), copied.cols());
    for (row, &target) in target_positions.iter().enumerate() {
        if let Some(source) = nearest(copied_positions, target) {
            out.set_row(row, copied.row(source));
        }
    }
    Ok(out)
}
