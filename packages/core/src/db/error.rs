//! Content Store Error Types
//!
//! This module defines error types for content store operations. Store errors
//! propagate unmodified through the POST operations; there is no retry and no
//! rollback at this layer.

use crate::db::Permission;
use thiserror::Error;

/// Content store operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store refused the operation for the current session
    #[error("Access denied: {action} on {path}")]
    AccessDenied { path: String, action: Permission },

    /// The operation needs a node that does not exist
    #[error("Content not found: {path}")]
    NotFound { path: String },

    /// Generic storage I/O or consistency failure
    #[error("Storage fault: {0}")]
    StorageFault(String),
}

impl StoreError {
    /// Create an access denied error
    pub fn access_denied(path: impl Into<String>, action: Permission) -> Self {
        Self::AccessDenied {
            path: path.into(),
            action,
        }
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a storage fault error
    pub fn storage_fault(msg: impl Into<String>) -> Self {
        Self::StorageFault(msg.into())
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
