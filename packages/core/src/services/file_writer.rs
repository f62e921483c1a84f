//! File and Link JSON
//!
//! Renders `sakai/file` and `sakai/link` nodes for read endpoints. Besides the node
//! properties the output carries the download path, the caller's permissions on
//! the node and the sites the file is used in.
//!
//! Permission checks never fail: any store error is reported as `false`.

use crate::db::{ContentStore, Permission, StoreResult};
use crate::models::files::{
    JCR_REFERENCE, LINK_SCHEME, RT_FILE_STORE, RT_SAKAI_LINK, SAKAI_ID, SAKAI_LINK,
};
use crate::models::{Content, PropertyValue, RESOURCE_TYPE_PROPERTY};
use crate::services::site_service::SiteService;
use crate::utils::path;
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub struct FileWriter {
    store: Arc<dyn ContentStore>,
    site_service: Arc<dyn SiteService>,
}

impl FileWriter {
    pub fn new(store: Arc<dyn ContentStore>, site_service: Arc<dyn SiteService>) -> Self {
        Self {
            store,
            site_service,
        }
    }

    /// Nearest node at or above `start` that is a file store
    pub async fn find_store(&self, start: &str) -> StoreResult<Option<String>> {
        let mut current = Some(start.to_string());
        while let Some(candidate) = current {
            if candidate == path::ROOT {
                break;
            }
            if let Some(content) = self.store.get(&candidate).await? {
                if content.is_resource_type(RT_FILE_STORE) {
                    return Ok(Some(candidate));
                }
            }
            current = path::parent(&candidate).map(str::to_string);
        }
        Ok(None)
    }

    /// `<store>/<sakai:id>` when the file lives in a store and has an id,
    /// otherwise the node path
    pub async fn download_path(&self, file: &Content) -> StoreResult<String> {
        let Some(id) = file.string_property(SAKAI_ID) else {
            return Ok(file.path.clone());
        };
        match self.find_store(&file.path).await? {
            Some(store) => Ok(format!("{}/{}", store, id)),
            None => Ok(file.path.clone()),
        }
    }

    /// Properties, permissions, download path and usage of a file node
    pub async fn write_file_node(&self, file: &Content) -> StoreResult<Value> {
        let mut json = file.properties_json();
        json.insert("permissions".to_string(), self.permissions(&file.path).await);
        json.insert(
            "path".to_string(),
            Value::String(self.download_path(file).await?),
        );
        json.insert("usedIn".to_string(), self.used_in(&file.path).await?);
        Ok(Value::Object(json))
    }

    /// Properties, name, path and permissions of a link node, plus the linked
    /// file (`false` when the reference is dangling)
    pub async fn write_link_node(&self, link: &Content) -> StoreResult<Value> {
        let mut json = link.properties_json();
        json.insert("name".to_string(), Value::String(link.name().to_string()));
        json.insert("path".to_string(), Value::String(link.path.clone()));
        json.insert("permissions".to_string(), self.permissions(&link.path).await);

        if let Some(target) = link.string_property(JCR_REFERENCE) {
            let file = match self.store.get(target).await? {
                Some(file) => self.write_file_node(&file).await?,
                None => {
                    tracing::debug!("Link {} points at missing {}", link.path, target);
                    Value::Bool(false)
                }
            };
            json.insert("file".to_string(), file);
        }
        Ok(Value::Object(json))
    }

    /// Link node at `link_path` pointing at `file`. The caller persists it.
    pub async fn create_link(&self, file: &Content, link_path: &str) -> StoreResult<Content> {
        let mut link = self
            .store
            .get(link_path)
            .await?
            .unwrap_or_else(|| Content::new(link_path));
        let download_path = self.download_path(file).await?;

        link.set_property(
            RESOURCE_TYPE_PROPERTY,
            PropertyValue::String(RT_SAKAI_LINK.to_string()),
        );
        link.set_property(
            SAKAI_LINK,
            PropertyValue::String(format!("{}{}", LINK_SCHEME, download_path)),
        );
        link.set_property(JCR_REFERENCE, PropertyValue::Reference(file.path.clone()));
        Ok(link)
    }

    async fn permissions(&self, target: &str) -> Value {
        json!({
            "set_property": self.has_permission(target, Permission::SetProperty).await,
            "read": self.has_permission(target, Permission::Read).await,
            "remove": self.has_permission(target, Permission::Remove).await,
        })
    }

    async fn has_permission(&self, target: &str, action: Permission) -> bool {
        match self.store.check_permission(target, action).await {
            Ok(granted) => granted,
            Err(e) => {
                tracing::debug!("Permission check {} on {} failed: {}", action, target, e);
                false
            }
        }
    }

    /// Sites containing a node that references `target`. Each reference counts
    /// for the nearest site above the referencing node, if any.
    async fn used_in(&self, target: &str) -> StoreResult<Value> {
        let mut sites = Vec::new();
        for reference in self.store.references(target).await? {
            let mut current = Some(reference.content_path.clone());
            while let Some(candidate) = current {
                if candidate == path::ROOT {
                    break;
                }
                if let Some(content) = self.store.get(&candidate).await? {
                    if self.site_service.is_site(&content) {
                        sites.push(self.site_info(&content).await?);
                        break;
                    }
                }
                current = path::parent(&candidate).map(str::to_string);
            }
        }

        Ok(json!({
            "total": sites.len(),
            "sites": sites,
        }))
    }

    async fn site_info(&self, site: &Content) -> StoreResult<Value> {
        let member_count = self.site_service.member_count(site).await?;
        let mut info = Map::new();
        info.insert(
            "member-count".to_string(),
            Value::String(member_count.to_string()),
        );
        info.insert("path".to_string(), Value::String(site.path.clone()));
        info.extend(site.properties_json());
        Ok(Value::Object(info))
    }
}
