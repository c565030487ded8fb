//! Versioned response cache storage.
//!
//! A bucket is a named key-value store of response snapshots. The worker
//! keeps exactly one bucket per cache version; `BucketStore` is the seam
//! between the lifecycle logic and whatever holds the bytes:
//!
//! - `MemoryStore` for tests and ephemeral hosts
//! - `DiskStore` persists snapshots as JSON files, one directory per bucket

pub mod snapshot;
pub mod store;

pub use snapshot::ResponseSnapshot;
pub use store::{BucketStore, DiskStore, MemoryStore};
