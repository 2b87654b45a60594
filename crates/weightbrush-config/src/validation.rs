//! Settings validation.
//!
//! Range checks run over every field and are reported together, so a user
//! fixing a settings file sees all problems at once.
//!
//! # Example
//!
//! ```rust
//! use weightbrush_config::{BrushSettings, ValidationError};
//!
//! let mut settings = BrushSettings::default();
//! settings.smooth.strength = 2.0;
//! assert!(matches!(settings.validate(), Err(ValidationError::OutOfRange { .. })));
//! ```

use thiserror::Error;
use weightbrush_mirror::pattern::split_tokens;

use crate::settings::BrushSettings;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Field value out of range.
    #[error("setting '{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted field name.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Invalid field format.
    #[error("invalid format for setting '{field}': {reason}")]
    InvalidFormat {
        /// Dotted field name.
        field: String,
        /// Description of the format error.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_range(field: &str, value: f64, min: f64, max: f64, errors: &mut Vec<ValidationError>) {
    if !value.is_finite() || value < min || value > max {
        errors.push(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
}

/// Validate every field of `settings`.
///
/// A single problem is returned as itself, several as
/// [`ValidationError::Multiple`].
pub fn validate_settings(settings: &BrushSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();

    check_range("prune.threshold", settings.prune.threshold, 0.0, 1.0, &mut errors);
    check_range("smooth.strength", settings.smooth.strength, f64::MIN_POSITIVE, 1.0, &mut errors);
    check_range("smooth.repeat", f64::from(settings.smooth.repeat), 1.0, 100.0, &mut errors);
    check_range("smooth.depth", settings.smooth.depth as f64, 1.0, 16.0, &mut errors);

    let left = split_tokens(&settings.mirror.left).len();
    let right = split_tokens(&settings.mirror.right).len();
    if left != right {
        errors.push(ValidationError::InvalidFormat {
            field: "mirror".to_string(),
            reason: format!("{left} left token(s) but {right} right token(s)"),
        });
    } else if left == 0 {
        errors.push(ValidationError::InvalidFormat {
            field: "mirror".to_string(),
            reason: "no tokens".to_string(),
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
