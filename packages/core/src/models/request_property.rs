//! Parsed Request Properties
//!
//! A `RequestProperty` is the parsed intent of every request parameter that
//! targets one property path: its submitted values plus the operation flags
//! collected from `@`-suffixed companion parameters.

use crate::models::{FileUpload, PropertyType, RequestParameter};
use crate::utils::path;

/// Parsed intent for one property path
#[derive(Debug, Clone, PartialEq)]
pub struct RequestProperty {
    /// Full item path (`<content path>/<name>`)
    path: String,
    /// Path of the content node owning the property
    content_path: String,
    /// Property name (last segment of `path`)
    name: String,

    values: Option<Vec<RequestParameter>>,
    default_values: Option<Vec<String>>,
    type_hint: Option<String>,

    delete: bool,
    repository_source: Option<String>,
    is_move: bool,

    use_default_when_missing: bool,
    ignore_blanks: bool,
}

impl RequestProperty {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let content_path = path::parent(&path).unwrap_or("").to_string();
        let name = path::name(&path).to_string();
        Self {
            path,
            content_path,
            name,
            values: None,
            default_values: None,
            type_hint: None,
            delete: false,
            repository_source: None,
            is_move: false,
            use_default_when_missing: false,
            ignore_blanks: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content_path(&self) -> &str {
        &self.content_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_values(&mut self, values: Vec<RequestParameter>) {
        self.values = Some(values);
    }

    pub fn set_default_values(&mut self, values: Vec<String>) {
        self.default_values = Some(values);
    }

    pub fn set_type_hint(&mut self, hint: impl Into<String>) {
        self.type_hint = Some(hint.into());
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    /// Parsed type hint: scalar type and multi-value flag
    pub fn parsed_type_hint(&self) -> Option<(PropertyType, bool)> {
        self.type_hint.as_deref().and_then(PropertyType::parse_hint)
    }

    pub fn set_delete(&mut self, delete: bool) {
        self.delete = delete;
    }

    pub fn is_delete(&self) -> bool {
        self.delete
    }

    pub fn set_repository_move(&mut self, source: impl Into<String>) {
        self.repository_source = Some(source.into());
        self.is_move = true;
    }

    /// Ignored once a move source is set
    pub fn set_repository_copy(&mut self, source: impl Into<String>) {
        if self.has_repository_move_source() {
            return;
        }
        self.repository_source = Some(source.into());
        self.is_move = false;
    }

    pub fn repository_source(&self) -> Option<&str> {
        self.repository_source.as_deref()
    }

    pub fn has_repository_move_source(&self) -> bool {
        self.repository_source.is_some() && self.is_move
    }

    pub fn has_repository_copy_source(&self) -> bool {
        self.repository_source.is_some() && !self.is_move
    }

    pub fn set_use_default_when_missing(&mut self, flag: bool) {
        self.use_default_when_missing = flag;
    }

    pub fn set_ignore_blanks(&mut self, flag: bool) {
        self.ignore_blanks = flag;
    }

    pub fn ignores_blanks(&self) -> bool {
        self.ignore_blanks
    }

    /// True if there is something to apply: submitted values, or defaults that
    /// should stand in for a missing parameter.
    pub fn has_values(&self) -> bool {
        match &self.values {
            Some(_) => true,
            None => self.use_default_when_missing && self.default_values.is_some(),
        }
    }

    /// True if any submitted value is an uploaded file
    pub fn is_file_upload(&self) -> bool {
        self.values
            .as_ref()
            .map(|values| values.iter().any(RequestParameter::is_file))
            .unwrap_or(false)
    }

    /// Uploaded files among the submitted values
    pub fn file_values(&self) -> Vec<&FileUpload> {
        self.values
            .iter()
            .flatten()
            .filter_map(|value| match value {
                RequestParameter::File(upload) => Some(upload),
                RequestParameter::Text(_) => None,
            })
            .collect()
    }

    /// Effective text values.
    ///
    /// Blank values are dropped when `@IgnoreBlanks` is set. A missing or
    /// all-blank submission falls back to the `@DefaultValue` values.
    pub fn string_values(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .values
            .iter()
            .flatten()
            .map(|value| value.as_text().to_string())
            .filter(|value| !(self.ignore_blanks && value.trim().is_empty()))
            .collect();

        let all_blank = values.iter().all(|value| value.is_empty());
        if all_blank {
            if let Some(defaults) = &self.default_values {
                values = defaults.clone();
            }
        }
        values
    }
}
