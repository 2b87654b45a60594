//! Error types for mirror resolution.

use thiserror::Error;

/// Errors raised while building a mirror table from naming tokens.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Left and right token lists have different lengths
    #[error("token count mismatch: {left} left token(s), {right} right token(s)")]
    TokenCountMismatch {
        /// Number of left-side tokens.
        left: usize,
        /// Number of right-side tokens.
        right: usize,
    },

    /// A token did not compile to a valid pattern
    #[error("invalid mirror token '{token}': {source}")]
    InvalidPattern {
        /// The token as written by the user.
        token: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

impl MirrorError {
    /// Create an invalid pattern error.
    pub fn invalid_pattern(token: impl Into<String>, source: regex::Error) -> Self {
        MirrorError::InvalidPattern {
            token: token.into(),
            source,
        }
    }
}
