//! Edit operations and mass policies.
//!
//! Every operation shares one redistribution procedure; they differ only in
//! how the candidate value of a selected cell is produced:
//!
//! | Operation | Candidate | Remaining columns |
//! |-----------|-----------|-------------------|
//! | [`Absolute`](EditOperation::Absolute) | `v` | absorb the difference |
//! | [`Add`](EditOperation::Add) | `M + delta / settable` | absorb the difference |
//! | [`AddPercent`](EditOperation::AddPercent) | `M · (1 + p)` | absorb the difference |
//! | [`Average`](EditOperation::Average) | `s · mean + (1 − s) · M`, mean over the edited rows | absorb the difference |
//! | [`Smooth`](EditOperation::Smooth) | neighbor mean (or away from it) | absorb the difference |
//! | [`Prune`](EditOperation::Prune) | `0` below threshold, else `M` | untouched, or absorb the freed mass when every selected cell is zeroed |
//! | [`Normalize`](EditOperation::Normalize) | `M` | none, whole row selected |
//! | [`ReassignLocally`](EditOperation::ReassignLocally) | split between two closest drivers | driven to zero |

#[cfg(not(feature = "std"))]
use alloc::format;

use crate::error::EditError;

/// Smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Number of rounds, at least 1.
    pub iterations: u32,
    /// Fraction of the way toward the neighbor mean, in `(0, 1]`.
    pub strength: f64,
    /// Push away from the neighbor mean instead (sharpen).
    pub invert: bool,
}

impl SmoothParams {
    /// Full-strength smoothing for `iterations` rounds.
    pub fn smooth(iterations: u32) -> Self {
        Self {
            iterations,
            strength: 1.0,
            invert: false,
        }
    }

    /// Full-strength sharpening for `iterations` rounds.
    pub fn sharpen(iterations: u32) -> Self {
        Self {
            invert: true,
            ..Self::smooth(iterations)
        }
    }

    /// Signed blend factor toward the neighbor mean.
    #[inline]
    pub fn signed_strength(&self) -> f64 {
        if self.invert {
            -self.strength
        } else {
            self.strength
        }
    }
}

/// One edit applied to the selected cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOperation {
    /// Set selected cells to a value in `[0, 1]`.
    Absolute(f64),
    /// Add `delta` in `[-1, 1]`, split evenly over the row's settable cells.
    Add(f64),
    /// Scale selected cells by `1 + p`, `p >= -1`.
    AddPercent(f64),
    /// Pull toward the per-column mean of the edited row range.
    Average {
        /// Blend between the current value (0) and the column mean (1).
        strength: f64,
    },
    /// Neighbor averaging (or sharpening) over the adjacency graph.
    Smooth(SmoothParams),
    /// Zero selected cells below the threshold in `[0, 1]`.
    Prune(f64),
    /// Rescale unlocked cells to the row budget.
    Normalize,
    /// Split each row between its two closest selected drivers by rest position.
    ReassignLocally {
        /// Blend between the original (0) and reassigned (1) weights.
        strength: f64,
    },
}

impl EditOperation {
    /// Full-strength [`Average`](Self::Average).
    pub const fn average() -> Self {
        Self::Average { strength: 1.0 }
    }

    /// Short lowercase name, used in logs and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Absolute(_) => "absolute",
            Self::Add(_) => "add",
            Self::AddPercent(_) => "add_percent",
            Self::Average { .. } => "average",
            Self::Smooth(p) if p.invert => "sharpen",
            Self::Smooth(_) => "smooth",
            Self::Prune(_) => "prune",
            Self::Normalize => "normalize",
            Self::ReassignLocally { .. } => "reassign_locally",
        }
    }

    /// Whether the unselected unlocked columns are excluded from redistribution.
    ///
    /// Closed operations rescale the selected cells alone to the row budget.
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Prune(_) | Self::Normalize)
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidOperationParameter`] on non-finite or
    /// out-of-range parameters.
    pub fn validate(&self) -> Result<(), EditError> {
        let name = self.name();
        match *self {
            Self::Absolute(v) => check_range(name, "value", v, 0.0, 1.0),
            Self::Add(d) => check_range(name, "delta", d, -1.0, 1.0),
            Self::AddPercent(p) => {
                if !p.is_finite() || p < -1.0 {
                    return Err(EditError::parameter(
                        name,
                        format!("percentage {p} must be finite and >= -1"),
                    ));
                }
                Ok(())
            }
            Self::Prune(t) => check_range(name, "threshold", t, 0.0, 1.0),
            Self::Smooth(params) => {
                if params.iterations == 0 {
                    return Err(EditError::parameter(name, "iterations must be at least 1"));
                }
                if !params.strength.is_finite() || params.strength <= 0.0 || params.strength > 1.0
                {
                    return Err(EditError::parameter(
                        name,
                        format!("strength {} outside (0, 1]", params.strength),
                    ));
                }
                Ok(())
            }
            Self::Average { strength } | Self::ReassignLocally { strength } => {
                check_range(name, "strength", strength, 0.0, 1.0)
            }
            Self::Normalize => Ok(()),
        }
    }
}

fn check_range(
    operation: &'static str,
    what: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), EditError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EditError::parameter(
            operation,
            format!("{what} {value} outside [{min}, {max}]"),
        ))
    }
}

/// How row mass is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MassPolicy {
    /// Rows sum to their budget; freed or consumed mass moves to the
    /// remaining columns (skin weights).
    #[default]
    Normalized,
    /// Cells are independent; candidates are written clipped and nothing is
    /// redistributed (blend-shape and attribute maps).
    Independent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(EditOperation::Absolute(0.5).name(), "absolute");
        assert_eq!(EditOperation::Smooth(SmoothParams::smooth(2)).name(), "smooth");
        assert_eq!(EditOperation::Smooth(SmoothParams::sharpen(2)).name(), "sharpen");
    }

    #[test]
    fn closed_operations() {
        assert!(EditOperation::Normalize.is_closed());
        assert!(EditOperation::Prune(0.1).is_closed());
        assert!(!EditOperation::Absolute(0.1).is_closed());
        assert!(!EditOperation::average().is_closed());
    }

    #[test]
    fn validate_ranges() {
        assert!(EditOperation::Absolute(0.0).validate().is_ok());
        assert!(EditOperation::Absolute(1.0).validate().is_ok());
        assert!(EditOperation::Absolute(1.01).validate().is_err());
        assert!(EditOperation::Absolute(f64::NAN).validate().is_err());
        assert!(EditOperation::Add(-1.0).validate().is_ok());
        assert!(EditOperation::Add(1.5).validate().is_err());
        assert!(EditOperation::AddPercent(-1.0).validate().is_ok());
        assert!(EditOperation::AddPercent(-1.5).validate().is_err());
        assert!(EditOperation::AddPercent(f64::INFINITY).validate().is_err());
        assert!(EditOperation::Prune(-0.1).validate().is_err());
        assert!(EditOperation::ReassignLocally { strength: 2.0 }.validate().is_err());
        assert!(EditOperation::Average { strength: 0.5 }.validate().is_ok());
        assert!(EditOperation::Average { strength: -0.1 }.validate().is_err());
        assert!(EditOperation::Average { strength: f64::NAN }.validate().is_err());
    }

    #[test]
    fn validate_smooth() {
        assert!(EditOperation::Smooth(SmoothParams::smooth(0)).validate().is_err());
        let weak = SmoothParams {
            strength: 0.0,
            ..SmoothParams::smooth(1)
        };
        assert!(EditOperation::Smooth(weak).validate().is_err());
        assert!(EditOperation::Smooth(SmoothParams::sharpen(3)).validate().is_ok());
    }

    #[test]
    fn signed_strength_flips_for_sharpen() {
        assert_eq!(SmoothParams::smooth(1).signed_strength(), 1.0);
        assert_eq!(SmoothParams::sharpen(1).signed_strength(), -1.0);
    }
}
