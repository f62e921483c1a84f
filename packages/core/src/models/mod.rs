//! Data Models
//!
//! This module contains the data structures used throughout SparsePost:
//!
//! - `Content` - Path-addressed node with typed property values
//! - `Modification` - Log entry for one applied change
//! - `PostRequest` / `PostResponse` - What the HTTP layer hands over and gets back
//! - `RequestProperty` - Parsed intent for one property path

mod content;
pub mod files;
mod modification;
mod request;
mod request_property;

pub use content::{
    Content, PropertyType, PropertyValue, MIXIN_TYPES_PROPERTY, PRIMARY_TYPE_PROPERTY,
    RESOURCE_TYPE_PROPERTY,
};
pub use modification::{Modification, ModificationType};
pub use request::{
    FileUpload, PostRequest, PostResponse, RequestParameter, ResourceContext,
    ITEM_PREFIX_ABSOLUTE, ITEM_PREFIX_RELATIVE_CURRENT, ITEM_PREFIX_RELATIVE_PARENT, RP_CHARSET,
    RP_NODE_NAME, RP_NODE_NAME_HINT, RP_PREFIX,
};
pub use request_property::RequestProperty;
