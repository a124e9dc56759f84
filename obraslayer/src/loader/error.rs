//! Loader error types

use std::time::Duration;

use thiserror::Error;

/// Failure reported by a [`ResourceSource`](super::ResourceSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Resource does not exist at the source
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Local read failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Outcome of a failed load, shared by every waiter of that load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Network error: {0}")]
    Network(#[from] SourceError),

    #[error("Fetch timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// Payload is JSON but not a feature collection
    #[error("Invalid schema for '{key}': {reason}")]
    Schema { key: String, reason: String },

    /// Payload is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(String),

    /// Fetch task ended without producing a result
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LoadError {
    /// Whether a later load of the same key can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LoadError::Network(_) | LoadError::Timeout(_) | LoadError::Internal(_))
    }
}
