//! ContentStore Trait - Repository Abstraction Layer
//!
//! This module defines the `ContentStore` trait that abstracts the external content
//! repository. Storage, access control enforcement and node identity all live
//! behind this trait; the POST operations only orchestrate calls against it.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: All methods are async so that both embedded and remote
//!    repositories fit behind the same interface
//! 2. **Sequential Use**: Callers await one call at a time; concurrent writers to
//!    the same path are the repository's concern
//! 3. **Missing Is Not An Error**: `get` returns `Ok(None)` for absent nodes
//!
//! # Examples
//!
//! ```rust,no_run
//! use sparsepost_core::db::{ContentStore, InMemoryContentStore};
//! use sparsepost_core::models::{Content, PropertyValue};
//!
//! # async fn example() -> sparsepost_core::db::StoreResult<()> {
//! let store = InMemoryContentStore::new();
//! let content = Content::new("/docs/a")
//!     .with_property("title", PropertyValue::String("A".to_string()));
//! store.update(content).await?;
//!
//! store.move_content("/docs/a", "/docs/b").await?;
//! assert!(store.get("/docs/a").await?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::db::StoreResult;
use crate::models::Content;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions checked through `check_permission`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Read,
    SetProperty,
    Remove,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::SetProperty => "set_property",
            Permission::Remove => "remove",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property that references another node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReference {
    /// Path of the node holding the referencing property
    pub content_path: String,
    /// Name of the referencing property
    pub property: String,
}

/// Abstraction over the external content repository
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow usage in async contexts where
/// futures may be moved between threads.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Get content by path
    ///
    /// - `Ok(Some(content))` if the node exists
    /// - `Ok(None)` if it doesn't (not an error)
    async fn get(&self, path: &str) -> StoreResult<Option<Content>>;

    /// True if a node exists at `path`
    async fn exists(&self, path: &str) -> StoreResult<bool> {
        Ok(self.get(path).await?.is_some())
    }

    /// Create or replace the node at `content.path` with the given properties
    async fn update(&self, content: Content) -> StoreResult<()>;

    /// Move a node and its subtree
    ///
    /// Fails if `from` does not exist or `to` is already taken.
    async fn move_content(&self, from: &str, to: &str) -> StoreResult<()>;

    /// Copy a node, with its subtree when `recursive` is set
    async fn copy(&self, from: &str, to: &str, recursive: bool) -> StoreResult<()>;

    /// Delete a node and its subtree. Deleting a missing node is a no-op.
    async fn delete(&self, path: &str) -> StoreResult<()>;

    /// Store the binary body of the node at `path`
    async fn write_body(&self, path: &str, body: Vec<u8>) -> StoreResult<()>;

    /// Binary body of the node at `path`, if any
    async fn read_body(&self, path: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Whether the current session may perform `action` on `path`
    async fn check_permission(&self, path: &str, action: Permission) -> StoreResult<bool>;

    /// Properties anywhere in the store that reference the node at `path`
    async fn references(&self, path: &str) -> StoreResult<Vec<PropertyReference>>;
}
