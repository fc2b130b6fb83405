//! Error types for the dashboard state crate.

use thiserror::Error;

/// Result type alias for state synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can surface from pulling state off the dashboard server.
///
/// Both variants pass the underlying failure through untouched. A non-success
/// HTTP status is not an error on its own; it is logged and the body is still
/// parsed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure or a body that could not be read
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body is not JSON, or not shaped like the server state
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// True when the failure happened while decoding the response body.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}
