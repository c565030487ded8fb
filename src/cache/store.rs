//! Bucket storage trait with in-memory and on-disk implementations.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};

use super::snapshot::ResponseSnapshot;

type Buckets = HashMap<String, HashMap<String, ResponseSnapshot>>;

/// Storage seam for versioned cache buckets.
///
/// Bucket names are version strings; entry keys are normalized request
/// keys. The worker is the sole writer to its own bucket and only ever
/// deletes foreign buckets.
pub trait BucketStore: Send + Sync {
    /// Create the bucket if it does not exist yet.
    fn open_bucket(&self, name: &str) -> Result<()>;

    /// Store a snapshot under `key`, replacing any previous entry.
    fn put(&self, bucket: &str, key: &str, snapshot: &ResponseSnapshot) -> Result<()>;

    /// Look up a snapshot by exact key.
    fn get(&self, bucket: &str, key: &str) -> Result<Option<ResponseSnapshot>>;

    /// Whether `key` is present in `bucket`.
    fn contains(&self, bucket: &str, key: &str) -> Result<bool> {
        Ok(self.get(bucket, key)?.is_some())
    }

    /// All bucket names currently in storage, sorted.
    fn list_buckets(&self) -> Result<Vec<String>>;

    /// Delete a bucket and everything in it. Returns whether it existed.
    fn delete_bucket(&self, name: &str) -> Result<bool>;
}

/// In-memory bucket store, used by tests and ephemeral hosts.
#[derive(Default)]
pub struct MemoryStore {
    buckets: Mutex<Buckets>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Buckets>> {
        self.buckets.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))
    }
}

impl BucketStore for MemoryStore {
    fn open_bucket(&self, name: &str) -> Result<()> {
        self.lock()?.entry(name.to_string()).or_default();
        Ok(())
    }

    fn put(&self, bucket: &str, key: &str, snapshot: &ResponseSnapshot) -> Result<()> {
        self.lock()?
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), snapshot.clone());
        Ok(())
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Option<ResponseSnapshot>> {
        Ok(self
            .lock()?
            .get(bucket)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.lock()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn delete_bucket(&self, name: &str) -> Result<bool> {
        Ok(self.lock()?.remove(name).is_some())
    }
}

/// Disk-backed bucket store.
///
/// Each bucket is a directory named by its version string; each entry is a
/// JSON snapshot file named by the SHA-256 digest of its key, so arbitrary
/// request paths never leak into file names.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create cache directory: {}", root.display()))?;
        Ok(Self { root })
    }

    fn bucket_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn entry_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.bucket_path(bucket)
            .join(format!("{}.json", entry_digest(key)))
    }
}

/// Stable file name for a cache key.
fn entry_digest(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

impl BucketStore for DiskStore {
    fn open_bucket(&self, name: &str) -> Result<()> {
        let path = self.bucket_path(name);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create cache bucket: {}", path.display()))
    }

    fn put(&self, bucket: &str, key: &str, snapshot: &ResponseSnapshot) -> Result<()> {
        self.open_bucket(bucket)?;
        let path = self.entry_path(bucket, key);
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache entry: {}", path.display()))
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Option<ResponseSnapshot>> {
        let path = self.entry_path(bucket, key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache entry: {}", path.display()))?;

        let snapshot: ResponseSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache entry: {}", path.display()))?;

        Ok(Some(snapshot))
    }

    fn contains(&self, bucket: &str, key: &str) -> Result<bool> {
        Ok(self.entry_path(bucket, key).exists())
    }

    fn list_buckets(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list cache directory: {}", self.root.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_bucket(&self, name: &str) -> Result<bool> {
        let path = self.bucket_path(name);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&path)
            .with_context(|| format!("Failed to delete cache bucket: {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(body: &str) -> ResponseSnapshot {
        ResponseSnapshot::new(
            "https://teamgalaxy.test/".to_string(),
            200,
            vec![],
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.put("v1", "/", &snapshot("root")).unwrap();

        let cached = store.get("v1", "/").unwrap().expect("entry should exist");
        assert_eq!(cached.body, b"root");
        assert!(store.contains("v1", "/").unwrap());
        assert!(!store.contains("v1", "/missing").unwrap());
        assert!(store.get("v0", "/").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_lists_and_deletes_buckets() {
        let store = MemoryStore::new();
        store.open_bucket("core-v2").unwrap();
        store.put("core-v1", "/", &snapshot("root")).unwrap();

        assert_eq!(store.list_buckets().unwrap(), vec!["core-v1", "core-v2"]);
        assert!(store.delete_bucket("core-v1").unwrap());
        assert!(!store.delete_bucket("core-v1").unwrap());
        assert_eq!(store.list_buckets().unwrap(), vec!["core-v2"]);
    }

    #[test]
    fn test_disk_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().to_path_buf()).unwrap();

        store.put("v1", "/", &snapshot("root")).unwrap();
        store.put("v1", "/offline.html", &snapshot("offline")).unwrap();

        // Distinct keys map to distinct entries
        assert_eq!(store.get("v1", "/").unwrap().unwrap().body, b"root");
        assert_eq!(
            store.get("v1", "/offline.html").unwrap().unwrap().body,
            b"offline"
        );
        assert!(store.get("v1", "/other").unwrap().is_none());
    }

    #[test]
    fn test_disk_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = DiskStore::new(dir.path().to_path_buf()).unwrap();
            store.put("v1", "/", &snapshot("root")).unwrap();
        }

        let reopened = DiskStore::new(dir.path().to_path_buf()).unwrap();
        assert!(reopened.contains("v1", "/").unwrap());
        assert_eq!(reopened.get("v1", "/").unwrap().unwrap().body, b"root");
    }

    #[test]
    fn test_disk_store_lists_and_deletes_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path().to_path_buf()).unwrap();

        store.open_bucket("core-v0").unwrap();
        store.put("core-v1", "/", &snapshot("root")).unwrap();
        assert_eq!(store.list_buckets().unwrap(), vec!["core-v0", "core-v1"]);

        assert!(store.delete_bucket("core-v0").unwrap());
        assert!(!store.delete_bucket("core-v0").unwrap());
        assert_eq!(store.list_buckets().unwrap(), vec!["core-v1"]);
    }
}
