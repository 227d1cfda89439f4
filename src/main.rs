// ghcms - Request backoff and read-through caching for a Git-hosting CMS backend
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use ghcms::cache::{ContentCache, FileContent, FileStore, KeyValueStore, MemoryStore};
use ghcms::cli::Args;
use ghcms::config::{AppConfig, StoreKind};
use ghcms::dispatch::Api;
use ghcms::github::RepoClient;
use ghcms::metrics::gather_metrics;
use ghcms::utils::logging;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration, CLI flags take precedence
    let mut config = AppConfig::load()?;
    if args.token.is_some() {
        config.api.token = args.token.clone();
    }
    if args.no_persist {
        config.cache.store = StoreKind::Memory;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting ghcms v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the API handle and the content cache
    let api = Api::from_config(&config)?;
    let store: Arc<dyn KeyValueStore> = match config.cache.store {
        StoreKind::File => {
            info!("Using file cache at {}", config.cache.directory.display());
            Arc::new(FileStore::new(config.cache.directory.clone()))
        }
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };
    let client = RepoClient::new(api, ContentCache::new(store), args.repo.clone());

    // Phase 4: Run the requested read
    if let Some(context) = &args.preview_context {
        match client.preview_status(&args.git_ref, context).await? {
            Some(status) => println!(
                "{:?} {}",
                status.state,
                status.target_url.unwrap_or_default()
            ),
            None => println!("no status for {}", context),
        }
    } else if args.meta {
        let metadata = client.read_file_metadata(&args.path, &args.git_ref).await?;
        println!("{} {}", metadata.author, metadata.updated_on.to_rfc3339());
    } else {
        match client.read_file(&args.path, &args.git_ref, !args.binary).await? {
            FileContent::Text(text) => print!("{}", text),
            FileContent::Blob(bytes) => println!("{} bytes", bytes.len()),
        }
    }

    let stats = client.cache().get_stats().await;
    info!(
        "Cache hits: {}, misses: {}, cooldowns: {}",
        stats.hits,
        stats.misses,
        client.api().cooldown().installs()
    );

    if args.metrics {
        eprint!("{}", gather_metrics());
    }

    Ok(())
}
