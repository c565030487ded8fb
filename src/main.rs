//! Host-runtime adapter for the offline cache worker.
//!
//! Drives the lifecycle in order (install, then activate, then fetch),
//! which is the ordering contract the worker relies on. URLs given on the
//! command line are dispatched through the fetch handler; with no
//! arguments the seeded bucket state is printed instead.

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use galaxycache::cache::{BucketStore, DiskStore};
use galaxycache::config::Config;
use galaxycache::net::{HttpFetcher, Request};
use galaxycache::worker::{FetchOutcome, LoggingRuntime, OfflineWorker};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Absolute URLs are used as-is; bare paths resolve against the origin.
fn resolve_url(config: &Config, arg: &str) -> Result<Url> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        Url::parse(arg).with_context(|| format!("Invalid url: {}", arg))
    } else {
        config.asset_url(arg)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("galaxycache starting");

    let config = Config::load()?;
    let store = DiskStore::new(config.cache_dir()?)?;
    let fetcher = HttpFetcher::new()?;
    let worker = OfflineWorker::new(config.clone(), store, fetcher, LoggingRuntime);

    // Install must settle before activate, activate before any fetch
    worker.on_install().await?;
    worker.on_activate().await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        let bucket = &config.cache_version;
        println!("bucket: {}", bucket);
        for path in &config.core_assets {
            let state = if worker.store().contains(bucket, path)? {
                "cached"
            } else {
                "missing"
            };
            println!("  {:7}  {}", state, path);
        }
        return Ok(());
    }

    for arg in &args {
        let url = resolve_url(&config, arg)?;
        match worker.on_fetch(&Request::get(url.clone())).await {
            Ok(FetchOutcome::Response { snapshot, source }) => {
                println!(
                    "{}  {}  {} bytes  [{}]",
                    url,
                    snapshot.status,
                    snapshot.body.len(),
                    source.as_str()
                );
            }
            Ok(FetchOutcome::Passthrough) => {
                // The driver only issues GETs, so the handler never declines
                println!("{}  passthrough", url);
            }
            Err(err) => {
                eprintln!("{}  failed: {}", url, err);
            }
        }
    }

    info!("galaxycache shutting down");
    Ok(())
}
