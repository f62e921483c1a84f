//! POST Request and Response Types
//!
//! The HTTP layer is not part of this crate. These types carry what it hands over
//! (the resolved resource, the path suffix and the raw parameters) and what it gets
//! back (the response with the modification log).

use crate::models::Modification;
use crate::utils::path;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix marking a parameter path relative to the current content
pub const ITEM_PREFIX_RELATIVE_CURRENT: &str = "./";

/// Prefix marking a parameter path relative to the parent content
pub const ITEM_PREFIX_RELATIVE_PARENT: &str = "../";

/// Prefix marking an absolute parameter path
pub const ITEM_PREFIX_ABSOLUTE: &str = "/";

/// Prefix of operation control parameters (`:name`, `:operation`, ...)
pub const RP_PREFIX: &str = ":";

/// Explicit node name for create requests, used verbatim
pub const RP_NODE_NAME: &str = ":name";

/// Node name hint for create requests, filtered before use
pub const RP_NODE_NAME_HINT: &str = ":nameHint";

/// Form encoding parameter sent by browsers
pub const RP_CHARSET: &str = "_charset_";

/// Resource the request was dispatched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResourceContext {
    /// Existing resource; `content_path` is set when it adapts to stored content
    #[serde(rename_all = "camelCase")]
    Existing {
        path: String,
        #[serde(default)]
        content_path: Option<String>,
    },

    /// Placeholder for a path that does not resolve to anything
    Synthetic { path: String },

    /// Placeholder carrying a pre-computed target content path
    #[serde(rename_all = "camelCase")]
    NonExisting { target_content_path: String },
}

impl ResourceContext {
    /// Path of the resource in the resource namespace
    pub fn path(&self) -> &str {
        match self {
            ResourceContext::Existing { path, .. } => path,
            ResourceContext::Synthetic { path } => path,
            ResourceContext::NonExisting {
                target_content_path,
            } => target_content_path,
        }
    }

    /// Content path this resource adapts to, falling back to the resource path
    pub fn content_path(&self) -> &str {
        match self {
            ResourceContext::Existing {
                content_path: Some(content_path),
                ..
            } => content_path,
            other => other.path(),
        }
    }
}

/// Uploaded file part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(deserialize_with = "bytes_or_string")]
    pub data: Vec<u8>,
}

/// One value of a request parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestParameter {
    Text(String),
    File(FileUpload),
}

impl RequestParameter {
    pub fn text(value: impl Into<String>) -> Self {
        RequestParameter::Text(value.into())
    }

    pub fn file(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        RequestParameter::File(FileUpload {
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            data: data.into(),
        })
    }

    /// Text value; for files the file name
    pub fn as_text(&self) -> &str {
        match self {
            RequestParameter::Text(value) => value,
            RequestParameter::File(upload) => &upload.file_name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, RequestParameter::File(_))
    }
}

/// A POST request as handed over by the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRequest {
    pub resource: ResourceContext,

    /// Request path suffix (may include selectors/extension)
    #[serde(default)]
    pub suffix: Option<String>,

    /// Parameters in submission order; repeated names are multi-valued
    #[serde(default)]
    pub parameters: Vec<(String, RequestParameter)>,
}

impl PostRequest {
    pub fn new(resource: ResourceContext) -> Self {
        Self {
            resource,
            suffix: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Append a text parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .push((name.into(), RequestParameter::text(value)));
        self
    }

    /// Append an arbitrary parameter value
    pub fn with_parameter(mut self, name: impl Into<String>, value: RequestParameter) -> Self {
        self.parameters.push((name.into(), value));
        self
    }

    /// Distinct parameter names in first-submission order
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.parameters {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// All values submitted under `name`
    pub fn values(&self, name: &str) -> Vec<&RequestParameter> {
        self.parameters
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .collect()
    }

    /// First value submitted under `name`
    pub fn parameter(&self, name: &str) -> Option<&RequestParameter> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// First value of `name` as text
    pub fn text_parameter(&self, name: &str) -> Option<&str> {
        self.parameter(name).map(RequestParameter::as_text)
    }

    /// True if any parameter name starts with `./`, which switches the request
    /// into prefix mode where only prefixed parameters denote content.
    pub fn requires_item_prefix(&self) -> bool {
        self.parameters
            .iter()
            .any(|(name, _)| name.starts_with(ITEM_PREFIX_RELATIVE_CURRENT))
    }
}

/// Result of a POST operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    /// Final content path the request operated on
    pub path: String,

    /// Final resource path (for redirects)
    pub location: String,

    pub parent_location: Option<String>,

    #[serde(rename = "isCreate")]
    pub create_request: bool,

    pub changes: Vec<Modification>,
}

impl PostResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self, modification: Modification) {
        self.changes.push(modification);
    }

    /// Set path and location together, deriving the parent location
    pub fn set_paths(&mut self, path: impl Into<String>, location: impl Into<String>) {
        self.path = path.into();
        self.location = location.into();
        self.parent_location = path::parent(&self.location).map(str::to_string);
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

fn bytes_or_string<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Data {
        Text(String),
        Bytes(Vec<u8>),
    }

    Ok(match Data::deserialize(deserializer)? {
        Data::Text(text) => text.into_bytes(),
        Data::Bytes(bytes) => bytes,
    })
}
