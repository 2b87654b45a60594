//! Error types for the edit engine.
//!
//! Only malformed host input raises an error. Numeric degeneracies (zero
//! remaining mass, zero settable columns, isolated elements) are resolved by
//! fallback rules inside the engine and never surface here.

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Errors returned by engine entry points.
///
/// Every check runs before the engine writes anything, so an `Err` always
/// means the input snapshot was left untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// Matrix, mask, lock, or table dimensions disagree.
    ShapeMismatch {
        /// What was being checked (e.g. `"soft weights"`).
        what: &'static str,
        /// Expected length or bound.
        expected: usize,
        /// Length or index actually found.
        found: usize,
    },
    /// An operation parameter is out of range or otherwise unusable.
    InvalidOperationParameter {
        /// Operation name (e.g. `"absolute"`).
        operation: &'static str,
        /// Human-readable reason.
        reason: String,
    },
    /// A matrix cell is not a finite weight inside `[0, 1]`.
    InvalidWeight {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// Value found.
        value: f64,
    },
    /// No chunk intersects any unlocked, visible cell. Hosts treat this as a no-op.
    EmptySelection,
}

impl EditError {
    /// Create a shape mismatch error.
    pub fn shape(what: &'static str, expected: usize, found: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            found,
        }
    }

    /// Create an invalid parameter error.
    pub fn parameter(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOperationParameter {
            operation,
            reason: reason.into(),
        }
    }

    /// Returns `true` for the non-fatal [`EditError::EmptySelection`].
    pub fn is_no_op(&self) -> bool {
        matches!(self, Self::EmptySelection)
    }
}

impl core::fmt::Display for EditError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "shape mismatch for {what}: expected {expected}, found {found}"),
            Self::InvalidOperationParameter { operation, reason } => {
                write!(f, "invalid parameter for {operation}: {reason}")
            }
            Self::InvalidWeight { row, col, value } => {
                write!(f, "invalid weight {value} at row {row}, column {col}")
            }
            Self::EmptySelection => write!(f, "selection has no editable cell"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EditError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_display() {
        let err = EditError::shape("soft weights", 4, 3);
        assert_eq!(
            err.to_string(),
            "shape mismatch for soft weights: expected 4, found 3"
        );
    }

    #[test]
    fn parameter_display() {
        let err = EditError::parameter("absolute", "value 1.5 outside [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid parameter for absolute: value 1.5 outside [0, 1]"
        );
    }

    #[test]
    fn invalid_weight_display() {
        let err = EditError::InvalidWeight {
            row: 2,
            col: 1,
            value: 1.5,
        };
        assert_eq!(err.to_string(), "invalid weight 1.5 at row 2, column 1");
    }

    #[test]
    fn only_empty_selection_is_no_op() {
        assert!(EditError::EmptySelection.is_no_op());
        assert!(!EditError::shape("rows", 1, 2).is_no_op());
    }
}
