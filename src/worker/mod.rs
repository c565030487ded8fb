//! Offline cache worker lifecycle.
//!
//! `OfflineWorker` owns the version-named cache bucket and implements the
//! three operations the host runtime dispatches:
//!
//! - install: seed the core asset set into the current bucket
//! - activate: delete every bucket left over from older versions
//! - fetch: network-first, falling back to the cache and then the offline page
//!
//! Each operation is an independent `async fn`; awaiting the returned
//! future is the host's way of keeping the worker alive until the work
//! settles. The host must run install to completion before activate, and
//! activate before dispatching fetches for this version.

mod error;
mod runtime;

pub use error::WorkerError;
pub use runtime::{HostRuntime, LoggingRuntime};

use anyhow::{Context, Result};
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::cache::{BucketStore, ResponseSnapshot};
use crate::config::Config;
use crate::net::{NetworkFetch, Request};

/// Which layer of the fetch chain produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Live network response, returned verbatim whatever its status.
    Network,
    /// Cached entry for the exact request key.
    Cache,
    /// The offline fallback page.
    OfflineFallback,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Network => "network",
            ResponseSource::Cache => "cache",
            ResponseSource::OfflineFallback => "offline-fallback",
        }
    }
}

/// Outcome of dispatching a request to the worker.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Not intercepted; the host forwards the request to the network
    /// untouched, with no caching side effect.
    Passthrough,
    /// Answered, with the layer that produced the response.
    Response {
        snapshot: ResponseSnapshot,
        source: ResponseSource,
    },
}

pub struct OfflineWorker<S, F, R> {
    config: Config,
    store: S,
    fetcher: F,
    runtime: R,
}

impl<S, F, R> OfflineWorker<S, F, R>
where
    S: BucketStore,
    F: NetworkFetch,
    R: HostRuntime,
{
    pub fn new(config: Config, store: S, fetcher: F, runtime: R) -> Self {
        Self {
            config,
            store,
            fetcher,
            runtime,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seed the core asset set into the current bucket.
    ///
    /// All-or-nothing: one failed asset fails the whole install, and retry
    /// is the runtime's contract. Assets already present under the current
    /// bucket name are not re-fetched; bumping the version string is the
    /// supported way to invalidate them.
    pub async fn on_install(&self) -> Result<()> {
        // The signal is sent at event dispatch, not gated on the seed: a
        // failed install is discarded by the runtime anyway.
        self.runtime.skip_waiting();

        let bucket = self.config.cache_version.as_str();
        self.store.open_bucket(bucket)?;

        let mut missing = Vec::new();
        for path in &self.config.core_assets {
            if self.store.contains(bucket, path)? {
                debug!(path = %path, "Core asset already cached, skipping");
            } else {
                missing.push(path.as_str());
            }
        }

        let seeded = try_join_all(missing.iter().copied().map(|path| self.seed_asset(path))).await?;
        for (path, snapshot) in &seeded {
            self.store.put(bucket, path, snapshot).context(WorkerError::SeedFailed {
                path: path.to_string(),
            })?;
        }

        info!(bucket, seeded = seeded.len(), "Install complete");
        Ok(())
    }

    async fn seed_asset<'a>(&self, path: &'a str) -> Result<(&'a str, ResponseSnapshot)> {
        let url = self.config.asset_url(path)?;
        let snapshot = self
            .fetcher
            .fetch(&Request::get(url))
            .await
            .context(WorkerError::SeedFailed {
                path: path.to_string(),
            })?;
        Ok((path, snapshot))
    }

    /// Delete every bucket whose name is not the current version string.
    ///
    /// Idempotent garbage collection: buckets are only ever referenced by
    /// exact name, so sweeping foreign names is always safe.
    pub async fn on_activate(&self) -> Result<()> {
        // Same timing as skip_waiting: not gated on the sweep.
        self.runtime.claim_clients();

        let current = self.config.cache_version.as_str();
        let buckets = self
            .store
            .list_buckets()
            .context("Failed to enumerate cache buckets")?;

        for name in buckets.iter().filter(|name| name.as_str() != current) {
            // Individual deletion failures are logged and skipped; the
            // next activation retries them.
            match self.store.delete_bucket(name) {
                Ok(_) => debug!(bucket = %name, "Deleted stale cache bucket"),
                Err(err) => warn!(bucket = %name, error = %err, "Failed to delete stale cache bucket"),
            }
        }

        info!(bucket = current, "Activate complete");
        Ok(())
    }

    /// Answer one request, network-first.
    ///
    /// Non-GET requests are never intercepted. For GET, any resolved
    /// network response wins, 4xx/5xx included; only network-level failure
    /// falls back to the cached entry and then to the offline page. Nothing
    /// is written to the cache here.
    pub async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome> {
        if !request.is_get() {
            return Ok(FetchOutcome::Passthrough);
        }

        match self.fetcher.fetch(request).await {
            Ok(snapshot) => Ok(FetchOutcome::Response {
                snapshot,
                source: ResponseSource::Network,
            }),
            Err(err) => {
                let key = request.cache_key();
                debug!(key = %key, error = %err, "Network fetch failed, trying cache");

                let bucket = self.config.cache_version.as_str();
                if let Some(snapshot) = self.store.get(bucket, &key)? {
                    return Ok(FetchOutcome::Response {
                        snapshot,
                        source: ResponseSource::Cache,
                    });
                }

                match self.store.get(bucket, &self.config.offline_path)? {
                    Some(snapshot) => Ok(FetchOutcome::Response {
                        snapshot,
                        source: ResponseSource::OfflineFallback,
                    }),
                    None => Err(WorkerError::FallbackExhausted { key }.into()),
                }
            }
        }
    }
}
