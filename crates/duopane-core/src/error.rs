//! Error types for the editor core.

use thiserror::Error;

/// Errors raised by a [`StorageBackend`](crate::store::StorageBackend) or
/// while decoding the store blob.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    /// Persistent storage is missing or disabled.
    #[error("persistent storage is unavailable")]
    Unavailable,

    /// The backend rejected a read or write.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// The stored blob could not be encoded or decoded.
    #[error("store blob serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type for render host operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(pub String);

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for HostError {}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError(s.to_string())
    }
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError(s)
    }
}

/// Errors surfaced by [`Editor`](crate::editor::Editor) operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EditorError {
    /// The document store could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation requires a loaded editor.
    #[error("editor is not loaded")]
    NotLoaded,

    /// The render host failed to perform a DOM operation.
    #[error("render host error: {0}")]
    Host(#[from] HostError),
}

impl EditorError {
    /// Whether this error means the storage backend is missing entirely.
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, EditorError::Storage(StorageError::Unavailable))
    }
}
