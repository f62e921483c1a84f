//! Configuration for the POST operations
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound accepted for `max_name_length`; longer names are not useful
/// as path segments.
const MAX_SUPPORTED_NAME_LENGTH: usize = 255;

/// Tunables for path resolution, name generation and property handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostConfig {
    /// chrono format strings tried in order after RFC 3339
    pub date_formats: Vec<String>,

    /// Parameters consulted, in order, for a generated node name
    pub name_hint_parameters: Vec<String>,

    /// Generated names are truncated to this many characters
    pub max_name_length: usize,

    /// Property names with this prefix belong to the store and are never written
    pub reserved_property_prefix: String,

    /// Content type used when an upload has none and none can be guessed
    pub default_mime_type: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%a %b %d %Y %H:%M:%S GMT%z".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f%z".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%d".to_string(),
                "%d.%m.%Y %H:%M:%S".to_string(),
                "%d.%m.%Y".to_string(),
            ],
            name_hint_parameters: [
                "title",
                "jcr:title",
                "name",
                "description",
                "jcr:description",
                "abstract",
                "text",
                "jcr:text",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_name_length: 20,
            reserved_property_prefix: "_".to_string(),
            default_mime_type: "application/octet-stream".to_string(),
        }
    }
}

impl PostConfig {
    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PostConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the operations cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_name_length == 0 || self.max_name_length > MAX_SUPPORTED_NAME_LENGTH {
            anyhow::bail!(
                "max_name_length must be between 1 and {}, got {}",
                MAX_SUPPORTED_NAME_LENGTH,
                self.max_name_length
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = PostConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.name_hint_parameters[0], "title");
    }

    #[test]
    fn test_from_file_keeps_missing_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_name_length": 32 }}"#).unwrap();

        let config = PostConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_name_length, 32);
        assert_eq!(config.reserved_property_prefix, "_");
    }

    #[test]
    fn test_from_file_rejects_zero_length() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_name_length": 0 }}"#).unwrap();

        let err = PostConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_name_length"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = PostConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
