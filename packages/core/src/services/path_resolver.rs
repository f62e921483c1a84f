//! POST Target Path Resolution
//!
//! Derives the content path a POST operates on from the dispatched resource and
//! the request suffix:
//!
//! - non-existing placeholder: its pre-computed target content path
//! - synthetic placeholder: the missing resource path
//! - existing resource: its content path plus the suffix, cut at the first `.`
//!   (selectors/extension)
//!
//! A trailing `/` or `/*` is a create marker: it is stripped and a generated
//! child name is appended.

use crate::db::ContentStore;
use crate::models::{PostRequest, ResourceContext};
use crate::services::error::PostError;
use crate::services::name_generator::NameGenerator;

/// Trailing suffix requesting a child with a generated name
pub const DEFAULT_CREATE_SUFFIX: &str = "/";

/// Alternative create marker
pub const STAR_CREATE_SUFFIX: &str = "/*";

/// Twiddle paths cannot be mapped onto content; they resolve to the content path
const TWIDDLE_PREFIX: &str = "/~";

/// Target path before name generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPath {
    pub path: String,
    pub generate_name: bool,
}

/// Compute the target path and whether a child name must be generated
pub fn item_path(request: &PostRequest) -> ItemPath {
    let mut root = String::new();
    let suffix: Option<&str> = match &request.resource {
        ResourceContext::NonExisting {
            target_content_path,
        } => Some(target_content_path.as_str()),
        ResourceContext::Synthetic { path } => Some(path.as_str()),
        existing @ ResourceContext::Existing { .. } => {
            root.push_str(existing.content_path());
            request.suffix.as_deref().map(strip_selectors)
        }
    };

    let mut generate_name = false;
    if let Some(suffix) = suffix {
        let (remains, marker) = strip_create_marker(suffix);
        generate_name = marker;
        if root.ends_with('/') && remains.starts_with('/') {
            root.push_str(&remains[1..]);
        } else {
            root.push_str(remains);
        }
    }

    ItemPath {
        path: root,
        generate_name,
    }
}

/// Resolve the final target path, generating a child name for create requests.
///
/// Any failure while generating the name is reported as a name generation error.
pub async fn resolve_item_path(
    request: &PostRequest,
    generator: &dyn NameGenerator,
    store: &dyn ContentStore,
) -> Result<String, PostError> {
    let item = item_path(request);
    if !item.generate_name {
        return Ok(item.path);
    }

    match generator.generate(request, &item.path, store).await {
        Ok(path) => {
            tracing::debug!("Generated path {} for create request", path);
            Ok(path)
        }
        Err(err @ PostError::NameGeneration { .. }) => Err(err),
        Err(err) => Err(PostError::name_generation(item.path, err.to_string())),
    }
}

/// Map the final content path back into the resource namespace for redirects.
pub fn final_resource_path(resource: &ResourceContext, final_content_path: &str) -> String {
    let original_content_path = resource.content_path();
    let mut resource_path = resource.path().to_string();

    if let Some(suffix) = final_content_path.strip_prefix(original_content_path) {
        // content and resource paths can already share the suffix
        if !resource_path.ends_with(suffix) {
            resource_path.push_str(suffix);
        }
    }

    if resource_path.starts_with(TWIDDLE_PREFIX) {
        original_content_path.to_string()
    } else {
        resource_path
    }
}

fn strip_selectors(suffix: &str) -> &str {
    match suffix.find('.') {
        Some(dot) if dot > 0 => &suffix[..dot],
        _ => suffix,
    }
}

fn strip_create_marker(suffix: &str) -> (&str, bool) {
    if let Some(remains) = suffix.strip_suffix(DEFAULT_CREATE_SUFFIX) {
        (remains, true)
    } else if let Some(remains) = suffix.strip_suffix(STAR_CREATE_SUFFIX) {
        (remains, true)
    } else {
        (suffix, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryContentStore;
    use crate::models::Content;
    use crate::db::StoreError;
    use crate::services::name_generator::DefaultNameGenerator;
    use async_trait::async_trait;

    struct FailingGenerator;

    #[async_trait]
    impl NameGenerator for FailingGenerator {
        async fn generate(
            &self,
            _request: &PostRequest,
            _base_path: &str,
            _store: &dyn ContentStore,
        ) -> Result<String, PostError> {
            Err(StoreError::storage_fault("exists lookup failed").into())
        }
    }

    fn existing(path: &str, content_path: &str) -> ResourceContext {
        ResourceContext::Existing {
            path: path.to_string(),
            content_path: Some(content_path.to_string()),
        }
    }

    #[test]
    fn test_existing_without_suffix() {
        let request = PostRequest::new(existing("/a", "/a"));
        assert_eq!(
            item_path(&request),
            ItemPath {
                path: "/a".to_string(),
                generate_name: false
            }
        );
    }

    #[test]
    fn test_existing_suffix_selectors_are_cut() {
        let request = PostRequest::new(existing("/a", "/a")).with_suffix("/b.tidy.json");
        assert_eq!(item_path(&request).path, "/a/b");

        let no_dot = PostRequest::new(existing("/a", "/a")).with_suffix("/b");
        assert_eq!(item_path(&no_dot).path, "/a/b");

        let leading_dot = PostRequest::new(existing("/a", "/a")).with_suffix(".json");
        assert_eq!(item_path(&leading_dot).path, "/a.json");
    }

    #[test]
    fn test_empty_suffix() {
        let request = PostRequest::new(existing("/a", "/a")).with_suffix("");
        assert_eq!(item_path(&request).path, "/a");
        assert!(!item_path(&request).generate_name);
    }

    #[test]
    fn test_create_markers() {
        let slash = PostRequest::new(existing("/a", "/a")).with_suffix("/b/");
        assert_eq!(
            item_path(&slash),
            ItemPath {
                path: "/a/b".to_string(),
                generate_name: true
            }
        );

        let star = PostRequest::new(existing("/a", "/a")).with_suffix("/b/*");
        assert_eq!(
            item_path(&star),
            ItemPath {
                path: "/a/b".to_string(),
                generate_name: true
            }
        );

        let bare = PostRequest::new(existing("/a", "/a")).with_suffix("/");
        assert_eq!(
            item_path(&bare),
            ItemPath {
                path: "/a".to_string(),
                generate_name: true
            }
        );
    }

    #[test]
    fn test_root_content_path_does_not_double_slash() {
        let request = PostRequest::new(existing("/", "/")).with_suffix("/b");
        assert_eq!(item_path(&request).path, "/b");
    }

    #[test]
    fn test_placeholders_use_their_paths() {
        let non_existing = PostRequest::new(ResourceContext::NonExisting {
            target_content_path: "/x/y".to_string(),
        })
        .with_suffix("/ignored");
        assert_eq!(item_path(&non_existing).path, "/x/y");

        let synthetic = PostRequest::new(ResourceContext::Synthetic {
            path: "/x/*".to_string(),
        });
        assert_eq!(
            item_path(&synthetic),
            ItemPath {
                path: "/x".to_string(),
                generate_name: true
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_generates_unique_child() {
        let store = InMemoryContentStore::with_contents(vec![Content::new("/a/hello")]);
        let generator = DefaultNameGenerator::default();
        let request = PostRequest::new(existing("/a", "/a"))
            .with_suffix("/")
            .with_param("title", "Hello");

        let path = resolve_item_path(&request, &generator, &store).await.unwrap();
        assert_eq!(path, "/a/hello_0");
    }

    #[tokio::test]
    async fn test_resolve_wraps_store_errors_as_name_generation() {
        let store = InMemoryContentStore::new();
        let request = PostRequest::new(existing("/a", "/a")).with_suffix("/*");

        let err = resolve_item_path(&request, &FailingGenerator, &store)
            .await
            .unwrap_err();
        match err {
            PostError::NameGeneration { path, reason } => {
                assert_eq!(path, "/a");
                assert!(reason.contains("exists lookup failed"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_without_marker_skips_generator() {
        let store = InMemoryContentStore::new();
        let request = PostRequest::new(existing("/a", "/a")).with_suffix("/b");

        let path = resolve_item_path(&request, &FailingGenerator, &store)
            .await
            .unwrap();
        assert_eq!(path, "/a/b");
    }

    #[test]
    fn test_final_resource_path() {
        let resource = existing("/sites/s", "/_content/s");
        assert_eq!(
            final_resource_path(&resource, "/_content/s/page"),
            "/sites/s/page"
        );
        assert_eq!(final_resource_path(&resource, "/elsewhere"), "/sites/s");

        let twiddle = existing("/~user", "/_user/u");
        assert_eq!(final_resource_path(&twiddle, "/_user/u/x"), "/_user/u");
    }
}
