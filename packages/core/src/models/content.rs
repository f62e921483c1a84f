//! Content Node Data Structures
//!
//! A `Content` is the unit of storage in the sparse content store: a path plus an
//! ordered map of named property values. Binary bodies (file uploads) live beside
//! the properties in the store and are not part of this struct.
//!
//! # Examples
//!
//! ```rust
//! use sparsepost_core::models::{Content, PropertyValue};
//!
//! let mut content = Content::new("/content/doc");
//! content.set_property("title", PropertyValue::String("Hello".to_string()));
//!
//! assert_eq!(content.name(), "doc");
//! assert_eq!(content.string_property("title"), Some("Hello"));
//! ```

use crate::utils::path;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Resource type property used to classify nodes (file, link, site, file store)
pub const RESOURCE_TYPE_PROPERTY: &str = "sling:resourceType";

/// Property name holding the node type; never written through a POST
pub const PRIMARY_TYPE_PROPERTY: &str = "jcr:primaryType";

/// Property name holding mixin types; never written through a POST
pub const MIXIN_TYPES_PROPERTY: &str = "jcr:mixinTypes";

/// A single stored property value
///
/// Serialized with an explicit type tag so that fixtures round-trip without
/// losing the difference between e.g. a date and a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PropertyValue {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    /// Path of another content node
    Reference(String),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Scalar type of this value (element type for arrays, String for empty arrays)
    pub fn property_type(&self) -> PropertyType {
        match self {
            PropertyValue::String(_) => PropertyType::String,
            PropertyValue::Long(_) => PropertyType::Long,
            PropertyValue::Double(_) => PropertyType::Double,
            PropertyValue::Boolean(_) => PropertyType::Boolean,
            PropertyValue::Date(_) => PropertyType::Date,
            PropertyValue::Reference(_) => PropertyType::Reference,
            PropertyValue::Array(values) => values
                .first()
                .map(PropertyValue::property_type)
                .unwrap_or(PropertyType::String),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::Reference(s) => Some(s),
            _ => None,
        }
    }

    /// Render as a plain JSON value (dates as RFC 3339, references as their path)
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::String(s) | PropertyValue::Reference(s) => Value::String(s.clone()),
            PropertyValue::Long(n) => Value::from(*n),
            PropertyValue::Double(n) => Value::from(*n),
            PropertyValue::Boolean(b) => Value::Bool(*b),
            PropertyValue::Date(d) => {
                Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            PropertyValue::Array(values) => {
                Value::Array(values.iter().map(PropertyValue::to_json).collect())
            }
        }
    }

    /// True if this value (or any array element) references `target`
    pub fn references(&self, target: &str) -> bool {
        match self {
            PropertyValue::Reference(path) => path == target,
            PropertyValue::Array(values) => values.iter().any(|v| v.references(target)),
            _ => false,
        }
    }
}

/// Scalar property types accepted in `@TypeHint` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    String,
    Long,
    Double,
    Boolean,
    Date,
    Reference,
}

impl PropertyType {
    /// Parse a type hint such as `Long` or `date[]`.
    ///
    /// Returns the scalar type and whether the hint requests a multi-valued property.
    /// Unknown hints yield `None` and are treated like no hint at all.
    pub fn parse_hint(hint: &str) -> Option<(PropertyType, bool)> {
        let trimmed = hint.trim();
        let (name, multi) = match trimmed.strip_suffix("[]") {
            Some(name) => (name, true),
            None => (trimmed, false),
        };
        let property_type = match name.to_ascii_lowercase().as_str() {
            "string" => PropertyType::String,
            "long" => PropertyType::Long,
            "double" => PropertyType::Double,
            "boolean" => PropertyType::Boolean,
            "date" => PropertyType::Date,
            "reference" => PropertyType::Reference,
            _ => return None,
        };
        Some((property_type, multi))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyType::String => "String",
            PropertyType::Long => "Long",
            PropertyType::Double => "Double",
            PropertyType::Boolean => "Boolean",
            PropertyType::Date => "Date",
            PropertyType::Reference => "Reference",
        };
        f.write_str(name)
    }
}

/// Content node addressed by path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Unique path of the node
    pub path: String,

    /// Named property values, ordered by name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Content {
    /// Create a content node with no properties
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter, mostly for fixtures
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Last path segment
    pub fn name(&self) -> &str {
        path::name(&self.path)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(PropertyValue::as_str)
    }

    /// Set a property, returning the previous value
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: PropertyValue,
    ) -> Option<PropertyValue> {
        self.properties.insert(name.into(), value)
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    /// `sling:resourceType` equals `resource_type`
    pub fn is_resource_type(&self, resource_type: &str) -> bool {
        self.string_property(RESOURCE_TYPE_PROPERTY) == Some(resource_type)
    }

    /// All properties rendered as a JSON object
    pub fn properties_json(&self) -> Map<String, Value> {
        self.properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}
