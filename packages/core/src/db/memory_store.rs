//! In-memory ContentStore
//!
//! A complete `ContentStore` backed by ordered maps behind a tokio `RwLock`.
//! Used by tests and the dev tool. Besides storage it records every call it
//! receives, can deny permissions on subtrees and can inject storage faults,
//! so error propagation is testable without a real repository.

use crate::db::{ContentStore, Permission, PropertyReference, StoreError, StoreResult};
use crate::models::Content;
use crate::utils::path;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A call received by the in-memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Update(String),
    Move { from: String, to: String },
    Copy { from: String, to: String, recursive: bool },
    Delete(String),
    WriteBody(String),
}

#[derive(Default)]
struct StoreState {
    contents: BTreeMap<String, Content>,
    bodies: HashMap<String, Vec<u8>>,
    denied: HashSet<(String, Permission)>,
    faults: HashSet<String>,
    calls: Vec<StoreCall>,
}

impl StoreState {
    fn is_denied(&self, target: &str, action: Permission) -> bool {
        self.denied
            .iter()
            .any(|(denied, a)| *a == action && path::is_same_or_descendant(target, denied))
    }

    fn require(&self, target: &str, action: Permission) -> StoreResult<()> {
        if self.faults.contains(target) {
            return Err(StoreError::storage_fault(format!(
                "injected fault on {}",
                target
            )));
        }
        if self.is_denied(target, action) {
            return Err(StoreError::access_denied(target, action));
        }
        Ok(())
    }

    fn subtree(&self, root: &str) -> Vec<String> {
        self.contents
            .keys()
            .filter(|p| path::is_same_or_descendant(p, root))
            .cloned()
            .collect()
    }
}

/// `ContentStore` kept entirely in memory
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `contents`
    pub fn with_contents(contents: Vec<Content>) -> Self {
        let mut state = StoreState::default();
        for content in contents {
            state.contents.insert(content.path.clone(), content);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Deny `action` on `target` and everything below it
    pub async fn deny(&self, target: &str, action: Permission) {
        self.state
            .write()
            .await
            .denied
            .insert((target.to_string(), action));
    }

    /// Make every mutation of `target` fail with a storage fault
    pub async fn inject_fault(&self, target: &str) {
        self.state.write().await.faults.insert(target.to_string());
    }

    /// Calls received so far, in order
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.read().await.calls.clone()
    }

    /// Paths passed to `update`, in order
    pub async fn updates(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Update(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    /// Snapshot of all stored nodes, ordered by path
    pub async fn all_contents(&self) -> Vec<Content> {
        self.state.read().await.contents.values().cloned().collect()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get(&self, target: &str) -> StoreResult<Option<Content>> {
        let state = self.state.read().await;
        Ok(state.contents.get(target).cloned())
    }

    async fn update(&self, content: Content) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::Update(content.path.clone()));
        state.require(&content.path, Permission::SetProperty)?;

        state.contents.insert(content.path.clone(), content);
        Ok(())
    }

    async fn move_content(&self, from: &str, to: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::Move {
            from: from.to_string(),
            to: to.to_string(),
        });
        state.require(from, Permission::Remove)?;
        state.require(to, Permission::SetProperty)?;

        if !state.contents.contains_key(from) {
            return Err(StoreError::not_found(from));
        }
        if state.contents.contains_key(to) {
            return Err(StoreError::storage_fault(format!(
                "cannot move {} to {}: destination exists",
                from, to
            )));
        }

        for old_path in state.subtree(from) {
            let new_path = path::rebase(&old_path, from, to);
            if let Some(mut content) = state.contents.remove(&old_path) {
                content.path = new_path.clone();
                state.contents.insert(new_path.clone(), content);
            }
            if let Some(body) = state.bodies.remove(&old_path) {
                state.bodies.insert(new_path, body);
            }
        }
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str, recursive: bool) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::Copy {
            from: from.to_string(),
            to: to.to_string(),
            recursive,
        });
        state.require(from, Permission::Read)?;
        state.require(to, Permission::SetProperty)?;

        if !state.contents.contains_key(from) {
            return Err(StoreError::not_found(from));
        }
        if state.contents.contains_key(to) {
            return Err(StoreError::storage_fault(format!(
                "cannot copy {} to {}: destination exists",
                from, to
            )));
        }

        let sources = if recursive {
            state.subtree(from)
        } else {
            vec![from.to_string()]
        };
        for old_path in sources {
            let new_path = path::rebase(&old_path, from, to);
            if let Some(content) = state.contents.get(&old_path).cloned() {
                let mut copy = content;
                copy.path = new_path.clone();
                state.contents.insert(new_path.clone(), copy);
            }
            if let Some(body) = state.bodies.get(&old_path).cloned() {
                state.bodies.insert(new_path, body);
            }
        }
        Ok(())
    }

    async fn delete(&self, target: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::Delete(target.to_string()));
        state.require(target, Permission::Remove)?;

        for doomed in state.subtree(target) {
            state.contents.remove(&doomed);
            state.bodies.remove(&doomed);
        }
        Ok(())
    }

    async fn write_body(&self, target: &str, body: Vec<u8>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(StoreCall::WriteBody(target.to_string()));
        state.require(target, Permission::SetProperty)?;

        state.bodies.insert(target.to_string(), body);
        Ok(())
    }

    async fn read_body(&self, target: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.state.read().await.bodies.get(target).cloned())
    }

    async fn check_permission(&self, target: &str, action: Permission) -> StoreResult<bool> {
        let state = self.state.read().await;
        if state.faults.contains(target) {
            return Err(StoreError::storage_fault(format!(
                "injected fault on {}",
                target
            )));
        }
        Ok(!state.is_denied(target, action))
    }

    async fn references(&self, target: &str) -> StoreResult<Vec<PropertyReference>> {
        let state = self.state.read().await;
        let mut references = Vec::new();
        for content in state.contents.values() {
            for (name, value) in &content.properties {
                if value.references(target) {
                    references.push(PropertyReference {
                        content_path: content.path.clone(),
                        property: name.clone(),
                    });
                }
            }
        }
        Ok(references)
    }
}
