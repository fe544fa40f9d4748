// Durable key-value store for cached documents and settings.
// Items are addressed by (namespace, item) and serialized as JSON.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

use super::paths;

/// A persistent key-value store addressed by a two-part key.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw bytes of an item. Returns `Ok(None)` on a miss.
    fn load_bytes(&self, namespace: &str, item: &str) -> Result<Option<Vec<u8>>>;

    /// Replace an item's contents.
    fn save_bytes(&self, namespace: &str, item: &str, bytes: &[u8]) -> Result<()>;

    /// Delete an item. Deleting a missing item is not an error.
    fn remove(&self, namespace: &str, item: &str) -> Result<()>;
}

/// Read and decode a JSON item.
pub fn load_json<T, S>(store: &S, namespace: &str, item: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.load_bytes(namespace, item)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON item.
pub fn save_json<T, S>(store: &S, namespace: &str, item: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)?;
    store.save_bytes(namespace, item, &json)
}

/// Filesystem-backed store: one JSON file per item under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform cache directory.
    pub fn default_location() -> Option<Self> {
        paths::cache_dir().map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, namespace: &str, item: &str) -> PathBuf {
        paths::item_path(&self.root, namespace, item)
    }
}

impl KeyValueStore for FileStore {
    fn load_bytes(&self, namespace: &str, item: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(namespace, item)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_bytes(&self, namespace: &str, item: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(namespace, item);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically via temp file
        let temp_path = temp_path_for(&path);
        let written = write_then_rename(&temp_path, &path, bytes);
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        written
    }

    fn remove(&self, namespace: &str, item: &str) -> Result<()> {
        match fs::remove_file(self.path_for(namespace, item)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(temp_path, path)?;
    Ok(())
}

/// Unique sibling temp file so concurrent writers never share one.
fn temp_path_for(path: &Path) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("{}.{}.tmp", std::process::id(), seq))
}

/// Process-local store, useful when nothing should outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load_bytes(&self, namespace: &str, item: &str) -> Result<Option<Vec<u8>>> {
        let key = (namespace.to_string(), item.to_string());
        Ok(self.items.lock().get(&key).cloned())
    }

    fn save_bytes(&self, namespace: &str, item: &str, bytes: &[u8]) -> Result<()> {
        let key = (namespace.to_string(), item.to_string());
        self.items.lock().insert(key, bytes.to_vec());
        Ok(())
    }

    fn remove(&self, namespace: &str, item: &str) -> Result<()> {
        let key = (namespace.to_string(), item.to_string());
        self.items.lock().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_write_and_read_json() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        save_json(&store, "ns", "item", &data).unwrap();

        let read: Option<TestData> = load_json(&store, "ns", "item").unwrap();
        assert_eq!(read, Some(data));
        assert!(temp_dir.path().join("ns").join("item.json").exists());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.save_bytes("ns", "item", b"1").unwrap();
        store.save_bytes("ns", "item", b"2").unwrap();

        assert_eq!(store.load_bytes("ns", "item").unwrap(), Some(b"2".to_vec()));
        let entries = fs::read_dir(temp_dir.path().join("ns")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        // A directory in the item's place makes the final rename fail
        let ns_dir = temp_dir.path().join("ns");
        fs::create_dir_all(ns_dir.join("item.json")).unwrap();

        assert!(store.save_bytes("ns", "item", b"{}").is_err());
        assert!(store.save_bytes("ns", "item", b"{}").is_err());

        let leftovers: Vec<_> = fs::read_dir(&ns_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "left behind: {leftovers:?}");
    }

    #[test]
    fn test_read_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        let read: Option<TestData> = load_json(&store, "ns", "missing").unwrap();
        assert!(read.is_none());
    }

    #[test]
    fn test_undecodable_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.save_bytes("ns", "item", b"not json").unwrap();

        let read = load_json::<TestData, _>(&store, "ns", "item");
        assert!(read.is_err());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.save_bytes("ns", "item", b"{}").unwrap();

        store.remove("ns", "item").unwrap();
        assert!(store.load_bytes("ns", "item").unwrap().is_none());

        // Removing again is a no-op
        store.remove("ns", "item").unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        save_json(&store, "ns", "item", &7).unwrap();

        let read: Option<i32> = load_json(&store, "ns", "item").unwrap();
        assert_eq!(read, Some(7));

        store.remove("ns", "item").unwrap();
        assert!(store.load_bytes("ns", "item").unwrap().is_none());
    }
}
