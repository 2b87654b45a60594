//! Brush settings and operation parsing for weightbrush.
//!
//! # Features
//!
//! - **Settings**: Load and save [`BrushSettings`] as TOML
//! - **Operations**: Parse `absolute:0.4`-style specs into edit operations
//! - **Validation**: Range checks over every setting
//! - **Paths**: Platform-specific settings location
//!
//! # Example
//!
//! ```rust
//! use weightbrush_config::{BrushSettings, parse_operation};
//! use weightbrush_core::EditOperation;
//!
//! let settings = BrushSettings::from_toml("[smooth]\nrepeat = 3\n").unwrap();
//! settings.validate().unwrap();
//! let op = parse_operation("smooth", &settings.smooth).unwrap();
//! assert!(matches!(op, EditOperation::Smooth(p) if p.iterations == 3));
//! ```

mod error;
mod operation_config;
mod settings;

/// Platform-specific settings paths.
#[cfg(feature = "std")]
pub mod paths;

/// Settings validation.
pub mod validation;

pub use error::ConfigError;
pub use operation_config::{format_operation, parse_operation, parse_value};
#[cfg(feature = "std")]
pub use paths::{load_settings, settings_path, user_config_dir};
pub use settings::{BrushSettings, MirrorSettings, PruneSettings, SmoothSettings};
pub use validation::{ValidationError, ValidationResult, validate_settings};
