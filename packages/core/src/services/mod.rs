//! POST Services
//!
//! This module contains the request processing services:
//!
//! - `ModifyOperation` - runs a POST request against the content store
//! - `path_resolver` - target path resolution for create and update requests
//! - `property_collector` - parsing of request parameters into property descriptors
//! - `PropertyValueHandler` / `FileUploadHandler` - applying values and uploads to nodes
//! - `NameGenerator` - child names for create requests
//! - `FileWriter` - JSON rendering of file and link nodes
//!
//! Services talk to the repository only through the `ContentStore` trait.

pub mod content_cache;
pub mod date_parser;
pub mod error;
pub mod file_upload;
pub mod file_writer;
pub mod modify_operation;
pub mod name_generator;
pub mod path_resolver;
pub mod property_collector;
pub mod property_handler;
pub mod site_service;

pub use content_cache::ContentCache;
pub use date_parser::DateParser;
pub use error::PostError;
pub use file_upload::FileUploadHandler;
pub use file_writer::FileWriter;
pub use modify_operation::ModifyOperation;
pub use name_generator::{DefaultNameGenerator, NameGenerator};
pub use path_resolver::{final_resource_path, item_path, resolve_item_path, ItemPath};
pub use property_collector::{collect_content, RequestProperties};
pub use property_handler::PropertyValueHandler;
pub use site_service::{ResourceTypeSiteService, SiteService};
