//! Service Layer Error Types
//!
//! This module defines error types for the POST operations and the file/link
//! writer. Store errors pass through unchanged inside `PostError::Store`.

use crate::db::StoreError;
use crate::models::PropertyType;
use thiserror::Error;

/// POST operation errors
#[derive(Error, Debug)]
pub enum PostError {
    /// Content store operation failed
    #[error("Content store operation failed: {0}")]
    Store(#[from] StoreError),

    /// Generating a node name for a create request failed
    #[error("Failed to generate name for {path}: {reason}")]
    NameGeneration { path: String, reason: String },

    /// A submitted value could not be converted to the requested type
    #[error("Invalid value '{value}' for {path}: expected {expected}")]
    InvalidPropertyValue {
        path: String,
        value: String,
        expected: PropertyType,
    },
}

impl PostError {
    /// Create a name generation error
    pub fn name_generation(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NameGeneration {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid property value error
    pub fn invalid_property_value(
        path: impl Into<String>,
        value: impl Into<String>,
        expected: PropertyType,
    ) -> Self {
        Self::InvalidPropertyValue {
            path: path.into(),
            value: value.into(),
            expected,
        }
    }

    /// The underlying store error, if this error came from the store
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}
