//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;
use weightbrush_core::EditError;
use weightbrush_mirror::MirrorError;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unknown operation name
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Operation argument missing or unparseable
    #[error("invalid argument '{argument}' for operation '{operation}': {reason}")]
    InvalidArgument {
        /// Operation name as written.
        operation: String,
        /// The argument text.
        argument: String,
        /// Description of why the argument is invalid.
        reason: String,
    },

    /// Operation rejected by the engine's parameter checks
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Mirror tokens failed to compile
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    /// Validation errors
    #[error("validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(
        operation: impl Into<String>,
        argument: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidArgument {
            operation: operation.into(),
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_display_and_source() {
        let err = ConfigError::read_file("/a/settings.toml", mock_io_err());
        let msg = err.to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/settings.toml"), "got: {msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn create_dir_factory_produces_correct_variant() {
        let err = ConfigError::create_dir("/dir/path", mock_io_err());
        assert!(
            matches!(err, ConfigError::CreateDir { ref path, .. } if path == std::path::Path::new("/dir/path"))
        );
    }

    #[test]
    fn invalid_argument_display() {
        let err = ConfigError::invalid_argument("absolute", "abc", "not a number");
        assert_eq!(
            err.to_string(),
            "invalid argument 'abc' for operation 'absolute': not a number"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn unknown_operation_display() {
        let err = ConfigError::UnknownOperation("blur".to_string());
        assert_eq!(err.to_string(), "unknown operation: blur");
    }

    #[test]
    fn edit_errors_pass_through() {
        let err = ConfigError::from(EditError::EmptySelection);
        assert_eq!(err.to_string(), EditError::EmptySelection.to_string());
    }
}
