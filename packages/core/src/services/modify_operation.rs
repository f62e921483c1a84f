//! Modify Operation - POST content mutation
//!
//! Runs one POST request against the content store:
//!
//! 1. Resolve the target content path (generating a child name for `/` and `/*`
//!    create requests)
//! 2. Collect the request parameters into per-path property descriptors
//! 3. Apply structural operations (move, copy, delete) in descriptor order
//! 4. Apply property values and file uploads through a per-request content cache
//! 5. Update every touched node exactly once
//!
//! # Errors
//!
//! Store errors propagate unchanged and abort the remaining work. Nothing is
//! rolled back; `PostResponse::changes` holds the modifications that completed
//! before the failure.

use crate::config::PostConfig;
use crate::db::ContentStore;
use crate::models::{
    Modification, PostRequest, PostResponse, MIXIN_TYPES_PROPERTY, PRIMARY_TYPE_PROPERTY,
};
use crate::services::content_cache::ContentCache;
use crate::services::date_parser::DateParser;
use crate::services::error::PostError;
use crate::services::file_upload::FileUploadHandler;
use crate::services::name_generator::{DefaultNameGenerator, NameGenerator};
use crate::services::path_resolver::{final_resource_path, resolve_item_path};
use crate::services::property_collector::{collect_content, RequestProperties};
use crate::services::property_handler::PropertyValueHandler;
use std::sync::Arc;

pub struct ModifyOperation {
    store: Arc<dyn ContentStore>,
    name_generator: Arc<dyn NameGenerator>,
    property_handler: PropertyValueHandler,
    upload_handler: FileUploadHandler,
    reserved_property_prefix: String,
}

impl ModifyOperation {
    pub fn new(
        store: Arc<dyn ContentStore>,
        name_generator: Arc<dyn NameGenerator>,
        config: &PostConfig,
    ) -> Self {
        let date_parser = Arc::new(DateParser::new(config.date_formats.clone()));
        Self::with_date_parser(store, name_generator, date_parser, config)
    }

    /// Operation sharing an existing date parser instead of building one from
    /// `config.date_formats`
    pub fn with_date_parser(
        store: Arc<dyn ContentStore>,
        name_generator: Arc<dyn NameGenerator>,
        date_parser: Arc<DateParser>,
        config: &PostConfig,
    ) -> Self {
        Self {
            store,
            name_generator,
            property_handler: PropertyValueHandler::new(date_parser),
            upload_handler: FileUploadHandler::new(config.default_mime_type.clone()),
            reserved_property_prefix: config.reserved_property_prefix.clone(),
        }
    }

    /// Operation using the default name generator built from `config`
    pub fn from_config(store: Arc<dyn ContentStore>, config: &PostConfig) -> Self {
        let name_generator = Arc::new(DefaultNameGenerator::from_config(config));
        Self::new(store, name_generator, config)
    }

    /// Run `request`, filling in `response`.
    ///
    /// On error `response` keeps the paths and the modifications completed so far.
    pub async fn run(
        &self,
        request: &PostRequest,
        response: &mut PostResponse,
    ) -> Result<(), PostError> {
        let content_path =
            resolve_item_path(request, self.name_generator.as_ref(), self.store.as_ref()).await?;
        response.set_paths(
            content_path.clone(),
            final_resource_path(&request.resource, &content_path),
        );

        self.do_run(request, response, &content_path).await
    }

    async fn do_run(
        &self,
        request: &PostRequest,
        response: &mut PostResponse,
        content_path: &str,
    ) -> Result<(), PostError> {
        let mut properties = collect_content(request, content_path);
        tracing::debug!(
            "Collected {} property descriptors for {}",
            properties.len(),
            content_path
        );

        self.process_structural(&mut properties, &mut response.changes)
            .await?;
        self.apply_properties(&properties, response).await
    }

    /// Move, copy or delete items. Move and copy clear the delete flag of their
    /// descriptor.
    async fn process_structural(
        &self,
        properties: &mut RequestProperties,
        changes: &mut Vec<Modification>,
    ) -> Result<(), PostError> {
        for property_path in properties.paths() {
            let Some(prop) = properties.get_mut(&property_path) else {
                continue;
            };

            if prop.has_repository_move_source() {
                let from = prop.repository_source().unwrap_or_default().to_string();
                self.store.move_content(&from, prop.path()).await?;
                tracing::info!("Moved {} to {}", from, prop.path());
                changes.push(Modification::on_moved(from, prop.path()));
                prop.set_delete(false);
            } else if prop.has_repository_copy_source() {
                let from = prop.repository_source().unwrap_or_default().to_string();
                self.store.copy(&from, prop.path(), true).await?;
                tracing::info!("Copied {} to {}", from, prop.path());
                changes.push(Modification::on_copied(from, prop.path()));
                prop.set_delete(false);
            } else if prop.is_delete() {
                self.store.delete(prop.path()).await?;
                tracing::info!("Deleted {}", prop.path());
                changes.push(Modification::on_deleted(prop.path()));
            }
        }
        Ok(())
    }

    async fn apply_properties(
        &self,
        properties: &RequestProperties,
        response: &mut PostResponse,
    ) -> Result<(), PostError> {
        let store = self.store.as_ref();
        let mut cache = ContentCache::new();

        for prop in properties.iter().filter(|prop| prop.has_values()) {
            let (content, created) = cache.get_or_create(store, prop.content_path()).await?;
            if created {
                response.create_request = true;
                response.on_change(Modification::on_created(prop.content_path()));
            }

            if prop.name() == PRIMARY_TYPE_PROPERTY || prop.name() == MIXIN_TYPES_PROPERTY {
                continue;
            }
            if self.is_store_internal(prop.name()) {
                tracing::debug!("Skipping store-internal property {}", prop.path());
                continue;
            }

            if prop.is_file_upload() {
                self.upload_handler
                    .set_file(prop, &mut cache, store, &mut response.changes)
                    .await?;
            } else {
                self.property_handler
                    .set_property(content, prop, &mut response.changes)?;
            }
        }

        tracing::debug!("Updating {} touched nodes", cache.len());
        cache.persist(store).await?;
        Ok(())
    }

    fn is_store_internal(&self, name: &str) -> bool {
        !self.reserved_property_prefix.is_empty() && name.starts_with(&self.reserved_property_prefix)
    }
}

#[cfg(test)]
#[path = "modify_operation_test.rs"]
mod modify_operation_test;
