//! Error types for rollup.
//!
//! Library crates use [`RollupError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::Container;

/// Top-level error type for all rollup operations.
#[derive(Debug, thiserror::Error)]
pub enum RollupError {
    /// Input was neither a compact reference nor an item web address.
    #[error("invalid item reference '{input}': expected owner/name#id or a .../owner/name/items/id address")]
    InvalidReference { input: String },

    /// The remote store has no item (or child list) at this location.
    #[error("item {container}#{id} not found")]
    NotFound { container: Container, id: u64 },

    /// The remote store rejected a request (auth, rate limit, validation, ...).
    #[error("store error: {0}")]
    Store(String),

    /// Transport failure talking to the remote store.
    #[error("network error: {0}")]
    Network(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Response body could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RollupError>;

impl RollupError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a not-found error for the item at `container#id`.
    pub fn not_found(container: &Container, id: u64) -> Self {
        Self::NotFound {
            container: container.clone(),
            id,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the remote item is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = RollupError::config("missing token");
        assert_eq!(err.to_string(), "config error: missing token");

        let err = RollupError::not_found(&Container::new("octo", "widgets"), 42);
        assert_eq!(err.to_string(), "item octo/widgets#42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn store_errors_are_not_not_found() {
        let err = RollupError::Store("PATCH /repos/a/b/issues/1: HTTP 403".into());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("HTTP 403"));
    }
}
