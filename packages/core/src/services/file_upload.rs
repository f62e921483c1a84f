//! File upload application
//!
//! Each uploaded file of a property becomes a child node of the property's
//! content: `<content>/<property name>`, or `<content>/<file name>` when the
//! property is named `*`. The node carries the file metadata; the bytes are
//! staged as the node's body.

use crate::db::ContentStore;
use crate::models::files::{
    JCR_LAST_MODIFIED, LENGTH, RT_SAKAI_FILE, SAKAI_FILENAME, SAKAI_ID, SAKAI_MIMETYPE,
};
use crate::models::{
    FileUpload, Modification, PropertyValue, RequestProperty, RESOURCE_TYPE_PROPERTY,
};
use crate::services::content_cache::ContentCache;
use crate::services::error::PostError;
use crate::utils::path;
use chrono::Utc;
use uuid::Uuid;

/// Property name standing for "name the node after the uploaded file"
const WILDCARD_NAME: &str = "*";

/// Characters that cannot appear in a path segment
const ILLEGAL_NAME_CHARS: &[char] = &['%', '/', ':', '[', ']', '*', '|'];

pub struct FileUploadHandler {
    default_mime_type: String,
}

impl FileUploadHandler {
    pub fn new(default_mime_type: impl Into<String>) -> Self {
        Self {
            default_mime_type: default_mime_type.into(),
        }
    }

    /// Store every non-empty uploaded file of `prop` below `prop.content_path()`
    pub async fn set_file(
        &self,
        prop: &RequestProperty,
        cache: &mut ContentCache,
        store: &dyn ContentStore,
        changes: &mut Vec<Modification>,
    ) -> Result<(), PostError> {
        for upload in prop.file_values() {
            if upload.data.is_empty() {
                tracing::debug!("Skipping empty upload {} for {}", upload.file_name, prop.path());
                continue;
            }

            let name = if prop.name() == WILDCARD_NAME {
                client_file_name(&upload.file_name)
            } else {
                prop.name()
            };
            if name.is_empty() {
                continue;
            }

            let file_path = path::join(prop.content_path(), &escape_illegal_chars(name));
            let mime_type = self.content_type(upload);

            let (node, _) = cache.get_or_create(store, &file_path).await?;
            if !node.has_property(SAKAI_ID) {
                node.set_property(SAKAI_ID, PropertyValue::String(Uuid::new_v4().to_string()));
            }
            node.set_property(
                RESOURCE_TYPE_PROPERTY,
                PropertyValue::String(RT_SAKAI_FILE.to_string()),
            );
            node.set_property(
                SAKAI_FILENAME,
                PropertyValue::String(upload.file_name.clone()),
            );
            node.set_property(SAKAI_MIMETYPE, PropertyValue::String(mime_type.clone()));
            node.set_property(LENGTH, PropertyValue::Long(upload.data.len() as i64));
            node.set_property(JCR_LAST_MODIFIED, PropertyValue::Date(Utc::now()));

            tracing::info!(
                "Storing upload {} ({} bytes, {}) at {}",
                upload.file_name,
                upload.data.len(),
                mime_type,
                file_path
            );
            cache.stage_body(file_path.clone(), upload.data.clone());
            changes.push(Modification::on_modified(file_path));
        }
        Ok(())
    }

    /// Declared content type without parameters, or a guess from the file name
    /// when it is missing or generic
    fn content_type(&self, upload: &FileUpload) -> String {
        let declared = upload
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
            .filter(|ct| !ct.is_empty());

        match declared {
            Some(ct) if ct != self.default_mime_type => ct.to_string(),
            _ => mime_guess::from_path(&upload.file_name)
                .first()
                .map(|mime| mime.to_string())
                .unwrap_or_else(|| self.default_mime_type.clone()),
        }
    }
}

impl Default for FileUploadHandler {
    fn default() -> Self {
        Self::new(crate::config::PostConfig::default().default_mime_type)
    }
}

/// Strip any client-side directory (`C:\docs\a.txt`, `/home/u/a.txt`) from a file name
fn client_file_name(file_name: &str) -> &str {
    let after_slash = file_name.rsplit('/').next().unwrap_or(file_name);
    after_slash.rsplit('\\').next().unwrap_or(after_slash)
}

fn escape_illegal_chars(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if ILLEGAL_NAME_CHARS.contains(&c) {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryContentStore;
    use crate::models::RequestParameter;

    fn upload_prop(path: &str, file_name: &str, content_type: Option<&str>, data: &[u8]) -> RequestProperty {
        let mut prop = RequestProperty::new(path);
        prop.set_values(vec![RequestParameter::file(
            file_name,
            content_type,
            data.to_vec(),
        )]);
        prop
    }

    #[test]
    fn test_client_file_name() {
        assert_eq!(client_file_name("C:\\docs\\a.txt"), "a.txt");
        assert_eq!(client_file_name("/home/u/a.txt"), "a.txt");
        assert_eq!(client_file_name("a.txt"), "a.txt");
    }

    #[test]
    fn test_escape_illegal_chars() {
        assert_eq!(escape_illegal_chars("a:b*c"), "a%3Ab%2Ac");
        assert_eq!(escape_illegal_chars("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_content_type_resolution() {
        let handler = FileUploadHandler::default();
        let declared = FileUpload {
            file_name: "a.bin".to_string(),
            content_type: Some("text/plain; charset=utf-8".to_string()),
            data: vec![1],
        };
        assert_eq!(handler.content_type(&declared), "text/plain");

        let generic = FileUpload {
            file_name: "photo.png".to_string(),
            content_type: Some("application/octet-stream".to_string()),
            data: vec![1],
        };
        assert_eq!(handler.content_type(&generic), "image/png");

        let unknown = FileUpload {
            file_name: "noext".to_string(),
            content_type: None,
            data: vec![1],
        };
        assert_eq!(handler.content_type(&unknown), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_wildcard_upload_creates_named_child() {
        let store = InMemoryContentStore::new();
        let mut cache = ContentCache::new();
        let mut changes = Vec::new();
        let prop = upload_prop("/docs/*", "C:\\tmp\\notes.txt", Some("text/plain"), b"hello");

        FileUploadHandler::default()
            .set_file(&prop, &mut cache, &store, &mut changes)
            .await
            .unwrap();

        let node = cache.get("/docs/notes.txt").unwrap();
        assert_eq!(node.string_property(RESOURCE_TYPE_PROPERTY), Some(RT_SAKAI_FILE));
        assert_eq!(node.string_property(SAKAI_FILENAME), Some("C:\\tmp\\notes.txt"));
        assert_eq!(node.string_property(SAKAI_MIMETYPE), Some("text/plain"));
        assert_eq!(node.property(LENGTH), Some(&PropertyValue::Long(5)));
        assert!(node.has_property(SAKAI_ID));
        assert_eq!(changes, vec![Modification::on_modified("/docs/notes.txt")]);

        cache.persist(&store).await.unwrap();
        assert_eq!(
            store.read_body("/docs/notes.txt").await.unwrap(),
            Some(b"hello".to_vec())
        );
    }

    #[tokio::test]
    async fn test_existing_file_keeps_id() {
        let store = InMemoryContentStore::with_contents(vec![crate::models::Content::new(
            "/docs/report",
        )
        .with_property(SAKAI_ID, PropertyValue::String("fixed-id".to_string()))]);
        let mut cache = ContentCache::new();
        let mut changes = Vec::new();
        let prop = upload_prop("/docs/report", "report.pdf", None, b"%PDF");

        FileUploadHandler::default()
            .set_file(&prop, &mut cache, &store, &mut changes)
            .await
            .unwrap();

        let node = cache.get("/docs/report").unwrap();
        assert_eq!(node.string_property(SAKAI_ID), Some("fixed-id"));
        assert_eq!(node.string_property(SAKAI_MIMETYPE), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_empty_upload_is_skipped() {
        let store = InMemoryContentStore::new();
        let mut cache = ContentCache::new();
        let mut changes = Vec::new();
        let prop = upload_prop("/docs/*", "empty.txt", Some("text/plain"), b"");

        FileUploadHandler::default()
            .set_file(&prop, &mut cache, &store, &mut changes)
            .await
            .unwrap();

        assert!(cache.is_empty());
        assert!(changes.is_empty());
    }
}
