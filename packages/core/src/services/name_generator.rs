//! Node Name Generation
//!
//! Create requests (`POST /parent/` or `POST /parent/*`) need a fresh child name.
//! The name comes from, in order:
//!
//! 1. `:name` - used verbatim
//! 2. `:nameHint` - filtered
//! 3. the first non-empty configured hint parameter (`title`, `jcr:title`, ...) - filtered
//! 4. a time-based fallback
//!
//! If the resulting path is taken, `_0` through `_999` are appended until a free
//! path is found.

use crate::config::PostConfig;
use crate::db::ContentStore;
use crate::models::{PostRequest, ITEM_PREFIX_RELATIVE_CURRENT, RP_NODE_NAME, RP_NODE_NAME_HINT};
use crate::services::error::PostError;
use crate::utils::path;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Number of numbered variants tried before giving up on a name
const MAX_COLLISION_SUFFIX: usize = 1000;

/// Produces a unique child path below a base path
#[async_trait]
pub trait NameGenerator: Send + Sync {
    /// Full path of a new, currently unused child of `base_path`
    async fn generate(
        &self,
        request: &PostRequest,
        base_path: &str,
        store: &dyn ContentStore,
    ) -> Result<String, PostError>;
}

pub struct DefaultNameGenerator {
    parameter_names: Vec<String>,
    max_length: usize,
    counter: AtomicU64,
}

impl DefaultNameGenerator {
    pub fn new(parameter_names: Vec<String>, max_length: usize) -> Self {
        Self {
            parameter_names,
            max_length,
            counter: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &PostConfig) -> Self {
        Self::new(config.name_hint_parameters.clone(), config.max_name_length)
    }

    /// Child name derived from the request parameters (not yet checked for collisions)
    pub fn node_name(&self, request: &PostRequest) -> String {
        if let Some(name) = non_empty(request.text_parameter(RP_NODE_NAME)) {
            return name.to_string();
        }

        if let Some(hint) = non_empty(request.text_parameter(RP_NODE_NAME_HINT)) {
            return self.filter(hint);
        }

        let require_prefix = request.requires_item_prefix();
        for parameter in &self.parameter_names {
            let key = if require_prefix {
                format!("{}{}", ITEM_PREFIX_RELATIVE_CURRENT, parameter)
            } else {
                parameter.clone()
            };
            if let Some(value) = non_empty(request.text_parameter(&key)) {
                return self.filter(value);
            }
        }

        let counter = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}_{}", Utc::now().timestamp_millis(), counter)
    }

    /// Reduce `name` to a safe path segment: lowercase `[a-z0-9_]`, no repeated
    /// underscores, no leading digit, at most `max_length` characters.
    pub fn filter(&self, name: &str) -> String {
        static INVALID: OnceLock<Regex> = OnceLock::new();
        static REPEATED: OnceLock<Regex> = OnceLock::new();
        let invalid = INVALID.get_or_init(|| Regex::new(r"[^a-z0-9_]").expect("valid regex"));
        let repeated = REPEATED.get_or_init(|| Regex::new(r"_+").expect("valid regex"));

        let lower = name.to_lowercase();
        let replaced = invalid.replace_all(&lower, "_");
        let mut filtered = repeated.replace_all(&replaced, "_").into_owned();

        if filtered.starts_with(|c: char| c.is_ascii_digit()) {
            filtered.insert(0, '_');
        }
        filtered.chars().take(self.max_length).collect()
    }
}

impl Default for DefaultNameGenerator {
    fn default() -> Self {
        Self::from_config(&PostConfig::default())
    }
}

#[async_trait]
impl NameGenerator for DefaultNameGenerator {
    async fn generate(
        &self,
        request: &PostRequest,
        base_path: &str,
        store: &dyn ContentStore,
    ) -> Result<String, PostError> {
        let candidate = path::join(base_path, &self.node_name(request));
        if !store.exists(&candidate).await? {
            return Ok(candidate);
        }

        for idx in 0..MAX_COLLISION_SUFFIX {
            let numbered = format!("{}_{}", candidate, idx);
            if !store.exists(&numbered).await? {
                return Ok(numbered);
            }
        }

        Err(PostError::name_generation(
            candidate,
            "collision in generated node names",
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
