//! Content Store Layer
//!
//! This module defines the boundary to the external content repository:
//!
//! - The `ContentStore` trait (get, update, move, copy, delete, bodies,
//!   permission checks, reverse references)
//! - `StoreError`, the error taxonomy every store call reports with
//! - `InMemoryContentStore`, a full implementation kept in memory
//!
//! # Architecture
//!
//! The POST operations never touch storage directly. Storage, access control
//! enforcement and transactions belong to whatever implements `ContentStore`.

mod content_store;
mod error;
mod memory_store;

pub use content_store::{ContentStore, Permission, PropertyReference};
pub use error::{StoreError, StoreResult};
pub use memory_store::{InMemoryContentStore, StoreCall};
