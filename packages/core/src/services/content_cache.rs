//! Per-request content cache
//!
//! Every content path touched by a request is fetched (or instantiated) once and
//! written back once, after all properties for it have been applied. Upload
//! bodies are staged here too and written after the node updates.

use crate::db::{ContentStore, StoreResult};
use crate::models::Content;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ContentCache {
    order: Vec<String>,
    contents: HashMap<String, Content>,
    bodies: Vec<(String, Vec<u8>)>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached content for `path`, fetching it or instantiating a new node on
    /// first use. The flag is true only when this call instantiated the node.
    pub async fn get_or_create(
        &mut self,
        store: &dyn ContentStore,
        path: &str,
    ) -> StoreResult<(&mut Content, bool)> {
        let mut created = false;
        if !self.contents.contains_key(path) {
            let fetched = store.get(path).await?;
            created = fetched.is_none();
            if created {
                tracing::debug!("No content at {}, creating it", path);
            }
            self.order.push(path.to_string());
            self.contents
                .insert(path.to_string(), fetched.unwrap_or_else(|| Content::new(path)));
        }

        let content = self
            .contents
            .entry(path.to_string())
            .or_insert_with(|| Content::new(path));
        Ok((content, created))
    }

    pub fn get(&self, path: &str) -> Option<&Content> {
        self.contents.get(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Queue a body to be written after the node updates
    pub fn stage_body(&mut self, path: impl Into<String>, body: Vec<u8>) {
        self.bodies.push((path.into(), body));
    }

    /// Update every cached node once, in first-touch order, then write staged bodies
    pub async fn persist(mut self, store: &dyn ContentStore) -> StoreResult<()> {
        for path in &self.order {
            if let Some(content) = self.contents.remove(path) {
                store.update(content).await?;
            }
        }
        for (path, body) in self.bodies {
            store.write_body(&path, body).await?;
        }
        Ok(())
    }
}
