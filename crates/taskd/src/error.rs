//! Error types for the task store.

use thiserror::Error;

/// Errors returned by store operations.
///
/// The store only ever reports typed outcomes; mapping to HTTP status codes
/// and logging happen at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Create attempted on a title that is already present
    #[error("task '{title}' already exists")]
    AlreadyExists { title: String },

    /// Read/update/delete on a title that is not present
    #[error("task '{title}' not found")]
    NotFound { title: String },
}
