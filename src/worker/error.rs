use thiserror::Error;

/// Failures surfaced by the worker lifecycle.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// A core asset could not be fetched or stored during install.
    #[error("install failed while seeding {path}")]
    SeedFailed { path: String },

    /// Network failed and neither the request nor the offline page is
    /// cached. Surfaces to the caller as a failed fetch.
    #[error("offline with no cached entry or fallback page for {key}")]
    FallbackExhausted { key: String },
}
