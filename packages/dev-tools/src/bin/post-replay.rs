//! POST Replay Binary
//!
//! Replays one POST request against an in-memory content store seeded from a
//! JSON fixture, then prints the response and the resulting store contents.
//! Useful for checking how a parameter set is interpreted without a running
//! repository.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin post-replay -- fixture.json
//!
//! # With a config file
//! cargo run --bin post-replay -- fixture.json post-config.json
//! ```
//!
//! # Fixture Format
//!
//! ```json
//! {
//!   "contents": [
//!     { "path": "/a", "properties": { "title": { "type": "string", "value": "A" } } }
//!   ],
//!   "request": {
//!     "resource": { "kind": "existing", "path": "/a" },
//!     "suffix": "/",
//!     "parameters": [["title", "Hello"], ["count@TypeHint", "Long"], ["count", "3"]]
//!   }
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: "info")

use std::env;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Deserialize;
use sparsepost_core::logging::init_tracing;
use sparsepost_core::{Content, InMemoryContentStore, ModifyOperation, PostConfig, PostRequest, PostResponse};

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    contents: Vec<Content>,
    request: PostRequest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(fixture_path) = args.first() else {
        bail!("usage: post-replay <fixture.json> [config.json]");
    };

    let config = match args.get(1) {
        Some(config_path) => PostConfig::from_file(config_path)?,
        None => PostConfig::default(),
    };

    let raw = tokio::fs::read_to_string(fixture_path)
        .await
        .with_context(|| format!("Failed to read fixture {}", fixture_path))?;
    let fixture: Fixture = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse fixture {}", fixture_path))?;

    tracing::info!(
        "Replaying request with {} parameters against {} seeded nodes",
        fixture.request.parameters.len(),
        fixture.contents.len()
    );

    let store = InMemoryContentStore::with_contents(fixture.contents);
    let operation = ModifyOperation::from_config(Arc::new(store.clone()), &config);

    let mut response = PostResponse::new();
    let outcome = operation.run(&fixture.request, &mut response).await;

    println!("{}", serde_json::to_string_pretty(&response.to_json()?)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&store.all_contents().await)?
    );

    if let Err(e) = outcome {
        tracing::error!("Request failed after {} changes: {}", response.changes.len(), e);
        return Err(e.into());
    }
    Ok(())
}
