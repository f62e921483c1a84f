//! POST Flow Integration Tests
//!
//! Drives `ModifyOperation` and `FileWriter` together against the in-memory
//! store, the way a read-after-write client sees them.
//!
//! ## Test Coverage
//! - Upload into a file store, link from a site, render link and file JSON
//! - Dangling links
//! - Create requests never colliding with existing siblings
//! - Prefix-mode requests with type hints and defaults
//! - Response JSON shape

#[cfg(test)]
mod post_flow_tests {
    use anyhow::Result;
    use serde_json::json;
    use sparsepost_core::models::files::{RT_FILE_STORE, RT_SITE, SAKAI_ID, SITE_MEMBERS};
    use sparsepost_core::{
        Content, ContentStore, FileWriter, InMemoryContentStore, ModifyOperation, Permission,
        PostConfig, PostRequest, PostResponse, PropertyValue, RequestParameter, ResourceContext,
        ResourceTypeSiteService, RESOURCE_TYPE_PROPERTY,
    };
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn typed(path: &str, resource_type: &str) -> Content {
        Content::new(path).with_property(
            RESOURCE_TYPE_PROPERTY,
            PropertyValue::String(resource_type.to_string()),
        )
    }

    fn existing(path: &str) -> PostRequest {
        PostRequest::new(ResourceContext::Existing {
            path: path.to_string(),
            content_path: Some(path.to_string()),
        })
    }

    fn site(path: &str, members: &[&str]) -> Content {
        typed(path, RT_SITE).with_property(
            SITE_MEMBERS,
            PropertyValue::Array(
                members
                    .iter()
                    .map(|m| PropertyValue::String(m.to_string()))
                    .collect(),
            ),
        )
    }

    struct Fixture {
        store: InMemoryContentStore,
        operation: ModifyOperation,
        writer: FileWriter,
    }

    fn fixture(contents: Vec<Content>) -> Fixture {
        let store = InMemoryContentStore::with_contents(contents);
        let shared: Arc<dyn ContentStore> = Arc::new(store.clone());
        Fixture {
            operation: ModifyOperation::from_config(shared.clone(), &PostConfig::default()),
            writer: FileWriter::new(shared, Arc::new(ResourceTypeSiteService::new())),
            store,
        }
    }

    #[tokio::test]
    async fn test_upload_link_and_render() -> Result<()> {
        let fx = fixture(vec![
            typed("/files", RT_FILE_STORE),
            site("/sites/physics", &["alice", "bob", "carol"]),
            Content::new("/sites/physics/pages"),
        ]);

        let upload = existing("/files").with_parameter(
            "*",
            RequestParameter::file("notes.pdf", None, b"%PDF-1.4".to_vec()),
        );
        let mut response = PostResponse::new();
        fx.operation.run(&upload, &mut response).await?;

        let file = fx
            .store
            .get("/files/notes.pdf")
            .await?
            .expect("uploaded file node");
        let id = file
            .string_property(SAKAI_ID)
            .expect("uploaded file has an id")
            .to_string();
        assert_eq!(file.string_property("sakai:mimeType"), Some("application/pdf"));
        assert_eq!(
            fx.store.read_body("/files/notes.pdf").await?,
            Some(b"%PDF-1.4".to_vec())
        );

        let link = fx
            .writer
            .create_link(&file, "/sites/physics/pages/notes")
            .await?;
        fx.store.update(link.clone()).await?;

        let file_json = fx.writer.write_file_node(&file).await?;
        assert_eq!(file_json["path"], json!(format!("/files/{}", id)));
        assert_eq!(file_json["usedIn"]["total"], json!(1));
        assert_eq!(
            file_json["usedIn"]["sites"][0]["member-count"],
            json!("3")
        );
        assert_eq!(
            file_json["usedIn"]["sites"][0]["path"],
            json!("/sites/physics")
        );
        assert_eq!(
            file_json["permissions"],
            json!({ "set_property": true, "read": true, "remove": true })
        );

        let link_json = fx.writer.write_link_node(&link).await?;
        assert_eq!(link_json["name"], json!("notes"));
        assert_eq!(link_json["path"], json!("/sites/physics/pages/notes"));
        assert_eq!(
            link_json["sakai:link"],
            json!(format!("jcrinternal:/files/{}", id))
        );
        assert_eq!(link_json["file"]["path"], file_json["path"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_dangling_link_renders_false() -> Result<()> {
        let fx = fixture(vec![typed("/files", RT_FILE_STORE)]);
        let file = Content::new("/files/gone")
            .with_property(SAKAI_ID, PropertyValue::String("g1".to_string()));

        let link = fx.writer.create_link(&file, "/links/gone").await?;
        let rendered = fx.writer.write_link_node(&link).await?;

        assert_eq!(rendered["file"], json!(false));
        assert_eq!(rendered["sakai:link"], json!("jcrinternal:/files/g1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_denied_permissions_render_false() -> Result<()> {
        let fx = fixture(vec![Content::new("/private/doc")]);
        fx.store.deny("/private", Permission::Read).await;
        fx.store.deny("/private", Permission::SetProperty).await;

        let doc = fx.store.get("/private/doc").await?.expect("seeded node");
        let rendered = fx.writer.write_file_node(&doc).await?;

        assert_eq!(
            rendered["permissions"],
            json!({ "set_property": false, "read": false, "remove": true })
        );
        assert_eq!(rendered["usedIn"], json!({ "sites": [], "total": 0 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_creates_never_collide() -> Result<()> {
        let fx = fixture(vec![Content::new("/blog")]);
        let mut paths = Vec::new();

        for _ in 0..3 {
            let request = existing("/blog")
                .with_suffix("/*")
                .with_param("title", "Same Title");
            let mut response = PostResponse::new();
            fx.operation.run(&request, &mut response).await?;
            assert!(response.create_request);
            paths.push(response.path);
        }

        assert_eq!(
            paths,
            vec![
                "/blog/same_title".to_string(),
                "/blog/same_title_0".to_string(),
                "/blog/same_title_1".to_string()
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_prefix_mode_with_hints_and_defaults() -> Result<()> {
        let fx = fixture(vec![Content::new("/form")]);
        let request = existing("/form")
            .with_param("./rating", "4")
            .with_param("./rating@TypeHint", "Long")
            .with_param("./tags", "a")
            .with_param("./tags", "b")
            .with_param("./status@DefaultValue", "draft")
            .with_param("./status@UseDefaultWhenMissing", "true")
            .with_param("untracked", "dropped");

        let mut response = PostResponse::new();
        fx.operation.run(&request, &mut response).await?;

        let form = fx.store.get("/form").await?.expect("form node");
        assert_eq!(form.property("rating"), Some(&PropertyValue::Long(4)));
        assert_eq!(
            form.property("tags"),
            Some(&PropertyValue::Array(vec![
                PropertyValue::String("a".to_string()),
                PropertyValue::String("b".to_string()),
            ]))
        );
        assert_eq!(form.string_property("status"), Some("draft"));
        assert!(!form.has_property("untracked"));
        assert_eq!(fx.store.updates().await, vec!["/form".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_response_json_after_move() -> Result<()> {
        let fx = fixture(vec![Content::new("/a/draft")]);
        let request = existing("/a").with_param("final@MoveFrom", "/a/draft");

        let mut response = PostResponse::new();
        assert_ok!(fx.operation.run(&request, &mut response).await);

        assert_eq!(
            response.to_json()?,
            json!({
                "path": "/a",
                "location": "/a",
                "parentLocation": "/",
                "isCreate": false,
                "changes": [{ "type": "moved", "argument": ["/a/draft", "/a/final"] }]
            })
        );

        // the source is gone, so replaying fails
        let mut replay = PostResponse::new();
        assert_err!(fx.operation.run(&request, &mut replay).await);
        assert!(replay.changes.is_empty());
        Ok(())
    }
}
