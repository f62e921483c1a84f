//! SparsePost Core - POST content mutation over a sparse content store
//!
//! This crate turns POST requests into create, update, move, copy and delete
//! operations on a hierarchical content store, and renders file and link nodes
//! as JSON for read endpoints.
//!
//! # Architecture
//!
//! - **Store-agnostic**: all repository access goes through the [`db::ContentStore`] trait
//! - **Request-scoped caching**: each touched node is fetched once and updated once
//! - **Modification log**: every completed change is recorded in the response
//!
//! # Modules
//!
//! - [`models`] - Data structures (Content, PostRequest, Modification, etc.)
//! - [`services`] - Request processing (ModifyOperation, FileWriter, etc.)
//! - [`db`] - ContentStore trait, store errors and the in-memory store
//! - [`config`] - Tunables for name generation, dates and uploads
//! - [`logging`] - tracing subscriber setup for binaries
//! - [`utils`] - Path helpers

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::PostConfig;
pub use db::*;
pub use models::*;
pub use services::*;
