//! Request Property Collection
//!
//! Parses the request parameters into one `RequestProperty` per property path.
//! Parameter names may carry an `@` suffix that modifies the property named by
//! the rest of the parameter instead of supplying a value:
//!
//! | Suffix                   | Effect                                          |
//! |--------------------------|-------------------------------------------------|
//! | `@TypeHint`              | value type (`Long`, `Date[]`, ...)              |
//! | `@DefaultValue`          | values used when the submission is blank        |
//! | `@ValueFrom`             | take the values of another parameter            |
//! | `@Delete`                | delete the item                                 |
//! | `@MoveFrom`              | move the item from the given path               |
//! | `@CopyFrom`              | copy the item from the given path               |
//! | `@UseDefaultWhenMissing` | apply defaults even without a submission        |
//! | `@IgnoreBlanks`          | drop blank values                               |

use crate::models::{
    PostRequest, RequestProperty, ITEM_PREFIX_ABSOLUTE, ITEM_PREFIX_RELATIVE_CURRENT,
    ITEM_PREFIX_RELATIVE_PARENT, RP_CHARSET, RP_PREFIX,
};
use crate::utils::path;
use std::collections::HashMap;

pub const SUFFIX_TYPE_HINT: &str = "@TypeHint";
pub const SUFFIX_DEFAULT_VALUE: &str = "@DefaultValue";
pub const SUFFIX_VALUE_FROM: &str = "@ValueFrom";
pub const SUFFIX_DELETE: &str = "@Delete";
pub const SUFFIX_MOVE_FROM: &str = "@MoveFrom";
pub const SUFFIX_COPY_FROM: &str = "@CopyFrom";
pub const SUFFIX_USE_DEFAULT_WHEN_MISSING: &str = "@UseDefaultWhenMissing";
pub const SUFFIX_IGNORE_BLANKS: &str = "@IgnoreBlanks";

/// Parsed properties keyed by property path, in first-encounter order
#[derive(Debug, Clone, Default)]
pub struct RequestProperties {
    order: Vec<String>,
    by_path: HashMap<String, RequestProperty>,
}

impl RequestProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Property for `property_path`, created on first use
    pub fn get_or_insert(&mut self, property_path: &str) -> &mut RequestProperty {
        if !self.by_path.contains_key(property_path) {
            self.order.push(property_path.to_string());
        }
        self.by_path
            .entry(property_path.to_string())
            .or_insert_with(|| RequestProperty::new(property_path))
    }

    pub fn get(&self, property_path: &str) -> Option<&RequestProperty> {
        self.by_path.get(property_path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Properties in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = &RequestProperty> {
        self.order.iter().filter_map(|p| self.by_path.get(p))
    }

    /// Property paths in first-encounter order
    pub fn paths(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn get_mut(&mut self, property_path: &str) -> Option<&mut RequestProperty> {
        self.by_path.get_mut(property_path)
    }
}

/// Parse all content parameters of `request` relative to `base_path`
pub fn collect_content(request: &PostRequest, base_path: &str) -> RequestProperties {
    let require_prefix = request.requires_item_prefix();
    let mut properties = RequestProperties::new();
    let mut value_from: Vec<(String, String)> = Vec::new();

    for name in request.parameter_names() {
        if name.starts_with(RP_PREFIX) || name == RP_CHARSET {
            continue;
        }
        if require_prefix && !has_item_prefix(name) {
            tracing::debug!("Ignoring unprefixed parameter {} in prefix mode", name);
            continue;
        }

        let values = request.values(name);
        let first_text = values.first().map(|v| v.as_text()).unwrap_or("");

        if let Some(target) = name.strip_suffix(SUFFIX_TYPE_HINT) {
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_type_hint(first_text);
        } else if let Some(target) = name.strip_suffix(SUFFIX_DEFAULT_VALUE) {
            let defaults = values.iter().map(|v| v.as_text().to_string()).collect();
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_default_values(defaults);
        } else if let Some(target) = name.strip_suffix(SUFFIX_VALUE_FROM) {
            let property_path = to_property_path(base_path, target);
            properties.get_or_insert(&property_path);
            value_from.push((property_path, first_text.to_string()));
        } else if let Some(target) = name.strip_suffix(SUFFIX_DELETE) {
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_delete(true);
        } else if let Some(target) = name.strip_suffix(SUFFIX_MOVE_FROM) {
            let source = to_property_path(base_path, first_text);
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_repository_move(source);
        } else if let Some(target) = name.strip_suffix(SUFFIX_COPY_FROM) {
            let source = to_property_path(base_path, first_text);
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_repository_copy(source);
        } else if let Some(target) = name.strip_suffix(SUFFIX_USE_DEFAULT_WHEN_MISSING) {
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_use_default_when_missing(true);
        } else if let Some(target) = name.strip_suffix(SUFFIX_IGNORE_BLANKS) {
            properties
                .get_or_insert(&to_property_path(base_path, target))
                .set_ignore_blanks(true);
        } else {
            let owned = values.into_iter().cloned().collect();
            properties
                .get_or_insert(&to_property_path(base_path, name))
                .set_values(owned);
        }
    }

    // @ValueFrom wins over a directly submitted value
    for (property_path, source) in value_from {
        let source_values: Vec<_> = request.values(&source).into_iter().cloned().collect();
        if source_values.is_empty() {
            continue;
        }
        if let Some(property) = properties.get_mut(&property_path) {
            property.set_values(source_values);
        }
    }

    properties
}

/// Resolve a parameter name (or move/copy source) against the content path
pub fn to_property_path(base_path: &str, name: &str) -> String {
    let name = name
        .strip_prefix(ITEM_PREFIX_RELATIVE_CURRENT)
        .unwrap_or(name);
    path::normalize(&path::join(base_path, name))
}

fn has_item_prefix(name: &str) -> bool {
    name.starts_with(ITEM_PREFIX_RELATIVE_CURRENT)
        || name.starts_with(ITEM_PREFIX_RELATIVE_PARENT)
        || name.starts_with(ITEM_PREFIX_ABSOLUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequestParameter, ResourceContext};

    fn request() -> PostRequest {
        PostRequest::new(ResourceContext::Synthetic {
            path: "/a".to_string(),
        })
    }

    #[test]
    fn test_delete_marker() {
        let req = request().with_param("a/b@Delete", "");
        let props = collect_content(&req, "");

        assert_eq!(props.len(), 1);
        let prop = props.get("a/b").unwrap();
        assert!(prop.is_delete());
        assert!(!prop.has_values());
    }

    #[test]
    fn test_control_parameters_are_skipped() {
        let req = request()
            .with_param(":operation", "import")
            .with_param(":redirect", "/x")
            .with_param("_charset_", "utf-8")
            .with_param("title", "T");
        let props = collect_content(&req, "/a");

        assert_eq!(props.paths(), vec!["/a/title".to_string()]);
    }

    #[test]
    fn test_prefix_mode_drops_unprefixed() {
        let req = request()
            .with_param("./title", "T")
            .with_param("ignored", "x")
            .with_param("../sibling/p", "s")
            .with_param("/abs/p", "v");
        let props = collect_content(&req, "/a/b");

        assert_eq!(
            props.paths(),
            vec![
                "/a/b/title".to_string(),
                "/a/sibling/p".to_string(),
                "/abs/p".to_string()
            ]
        );
    }

    #[test]
    fn test_suffixes_merge_into_one_property() {
        let req = request()
            .with_param("count@TypeHint", "Long")
            .with_param("count", "5")
            .with_param("count@DefaultValue", "0")
            .with_param("count@IgnoreBlanks", "true");
        let props = collect_content(&req, "/a");

        assert_eq!(props.len(), 1);
        let prop = props.get("/a/count").unwrap();
        assert_eq!(prop.type_hint(), Some("Long"));
        assert_eq!(prop.string_values(), vec!["5".to_string()]);
    }

    #[test]
    fn test_move_and_copy_sources_resolve_relative() {
        let req = request()
            .with_param("moved@MoveFrom", "old")
            .with_param("copied@CopyFrom", "/elsewhere/src");
        let props = collect_content(&req, "/a");

        let moved = props.get("/a/moved").unwrap();
        assert!(moved.has_repository_move_source());
        assert_eq!(moved.repository_source(), Some("/a/old"));

        let copied = props.get("/a/copied").unwrap();
        assert!(copied.has_repository_copy_source());
        assert_eq!(copied.repository_source(), Some("/elsewhere/src"));
    }

    #[test]
    fn test_value_from_wins() {
        let req = request()
            .with_param("text@ValueFrom", "fulltext")
            .with_param("text", "direct")
            .with_param("fulltext", "from other");
        let props = collect_content(&req, "/a");

        assert_eq!(
            props.get("/a/text").unwrap().string_values(),
            vec!["from other".to_string()]
        );
    }

    #[test]
    fn test_file_parameter_marks_upload() {
        let req = request().with_parameter(
            "*",
            RequestParameter::file("doc.txt", Some("text/plain"), b"hello".to_vec()),
        );
        let props = collect_content(&req, "/a");

        let prop = props.get("/a/*").unwrap();
        assert!(prop.is_file_upload());
        assert_eq!(prop.name(), "*");
        assert_eq!(prop.content_path(), "/a");
    }

    #[test]
    fn test_multi_values_keep_order() {
        let req = request().with_param("tags", "x").with_param("tags", "y");
        let props = collect_content(&req, "/a");
        assert_eq!(
            props.get("/a/tags").unwrap().string_values(),
            vec!["x".to_string(), "y".to_string()]
        );
    }
}
