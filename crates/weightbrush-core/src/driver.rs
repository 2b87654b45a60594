//! Driver abstraction over host weight channels.
//!
//! A [`Driver`] is one matrix column: a skin influence, a blend-shape channel,
//! or a generic per-element attribute. The engine never reads host attributes
//! itself; a [`DriverSet`] gathers a [`WeightMatrix`] from its drivers, the
//! engine edits it, and the set commits the result back.
//!
//! # Example
//!
//! ```rust
//! use weightbrush_core::{ChannelDriver, DriverKind, DriverSet, Driver};
//!
//! let mut set = DriverSet::new(vec![
//!     ChannelDriver::new("spine", DriverKind::SkinInfluence, vec![1.0, 0.5]),
//!     ChannelDriver::new("arm_L", DriverKind::SkinInfluence, vec![0.0, 0.5]),
//! ]);
//! let matrix = set.gather(&[0, 1]).unwrap();
//! assert_eq!(matrix.row(1), &[0.5, 0.5]);
//!
//! let mut edited = matrix.clone();
//! edited.set_row(1, &[0.2, 0.8]);
//! set.commit(&[0, 1], &edited, None).unwrap();
//! assert_eq!(set.drivers()[1].get(1), 0.8);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};

use crate::error::EditError;
use crate::lock::LockState;
use crate::matrix::WeightMatrix;
use crate::operation::MassPolicy;

/// What a driver's values represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    /// Skin-cluster influence. Rows are normalized.
    SkinInfluence,
    /// Blend-shape target weight map. Values are independent.
    BlendShapeChannel,
    /// Generic paintable per-element attribute. Values are independent.
    Attribute,
}

impl DriverKind {
    /// Mass policy the engine applies to matrices of this kind.
    pub const fn mass_policy(self) -> MassPolicy {
        match self {
            Self::SkinInfluence => MassPolicy::Normalized,
            Self::BlendShapeChannel | Self::Attribute => MassPolicy::Independent,
        }
    }
}

/// One column of weights, addressed by element index.
pub trait Driver {
    /// Display name, used for mirror matching.
    fn name(&self) -> &str;

    /// What the values represent.
    fn kind(&self) -> DriverKind;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Returns `true` when the driver has no element.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weight of `row`. Out-of-range rows read as zero.
    fn get(&self, row: usize) -> f64;

    /// Writes the weight of `row`. Out-of-range rows are ignored.
    fn set(&mut self, row: usize, value: f64);

    /// Whether the column is locked.
    fn is_locked(&self) -> bool;

    /// Locks or unlocks the column.
    fn set_locked(&mut self, locked: bool);
}

/// In-memory [`Driver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelDriver {
    name: String,
    kind: DriverKind,
    values: Vec<f64>,
    locked: bool,
}

impl ChannelDriver {
    /// Creates an unlocked driver.
    pub fn new(name: impl Into<String>, kind: DriverKind, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
            locked: false,
        }
    }

    /// Builder variant of [`Driver::set_locked`].
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// All values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Driver for ChannelDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DriverKind {
        self.kind
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn get(&self, row: usize) -> f64 {
        self.values.get(row).copied().unwrap_or(0.0)
    }

    fn set(&mut self, row: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(row) {
            *slot = value;
        }
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

/// Ordered drivers sharing one element count.
#[derive(Debug, Clone, Default)]
pub struct DriverSet<D = ChannelDriver> {
    drivers: Vec<D>,
}

impl<D: Driver> DriverSet<D> {
    /// Wraps the drivers in column order.
    pub fn new(drivers: Vec<D>) -> Self {
        Self { drivers }
    }

    /// The drivers in column order.
    pub fn drivers(&self) -> &[D] {
        &self.drivers
    }

    /// Mutable access to the drivers.
    pub fn drivers_mut(&mut self) -> &mut [D] {
        &mut self.drivers
    }

    /// Number of drivers (columns).
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Returns `true` without drivers.
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Driver names in column order.
    pub fn names(&self) -> Vec<&str> {
        self.drivers.iter().map(Driver::name).collect()
    }

    /// Mass policy of the set: normalized if any driver is a skin influence.
    pub fn mass_policy(&self) -> MassPolicy {
        if self
            .drivers
            .iter()
            .any(|d| d.kind().mass_policy() == MassPolicy::Normalized)
        {
            MassPolicy::Normalized
        } else {
            MassPolicy::Independent
        }
    }

    /// Reads `rows` of every driver into a matrix; row `i` of the result is
    /// element `rows[i]`.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] if an element index exceeds a driver.
    pub fn gather(&self, rows: &[usize]) -> Result<WeightMatrix, EditError> {
        let cols = self.drivers.len();
        let mut data = Vec::with_capacity(rows.len() * cols);
        for &row in rows {
            for driver in &self.drivers {
                if row >= driver.len() {
                    return Err(EditError::shape("driver elements", driver.len(), row));
                }
                data.push(driver.get(row));
            }
        }
        WeightMatrix::from_vec(rows.len(), cols, data)
    }

    /// Lock state for a gathered matrix of `rows` rows.
    pub fn lock_state(&self, rows: usize) -> LockState {
        let columns = self.drivers.iter().map(Driver::is_locked).collect();
        LockState::from_flags(vec![false; rows], columns)
    }

    /// Writes `matrix` back; row `i` goes to element `rows[i]`.
    ///
    /// With `columns`, only those columns are written.
    ///
    /// # Errors
    ///
    /// [`EditError::ShapeMismatch`] if the matrix does not match `rows` and
    /// the driver count, or a column index is out of range. Nothing is written
    /// on error.
    pub fn commit(
        &mut self,
        rows: &[usize],
        matrix: &WeightMatrix,
        columns: Option<&[usize]>,
    ) -> Result<(), EditError> {
        if matrix.rows() != rows.len() {
            return Err(EditError::shape("commit rows", rows.len(), matrix.rows()));
        }
        if matrix.cols() != self.drivers.len() {
            return Err(EditError::shape("commit columns", self.drivers.len(), matrix.cols()));
        }
        if let Some(&bad) = columns.and_then(|cols| cols.iter().find(|&&c| c >= matrix.cols())) {
            return Err(EditError::shape("commit column", matrix.cols(), bad));
        }
        for (col, driver) in self.drivers.iter_mut().enumerate() {
            if columns.is_some_and(|cols| !cols.contains(&col)) {
                continue;
            }
            for (i, &row) in rows.iter().enumerate() {
                driver.set(row, matrix.get(i, col));
            }
        }
        Ok(())
    }
}
