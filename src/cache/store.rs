//! Key-value stores backing the offline catalog copy
//!
//! The fetch hook only ever needs `get` and `set` on string values, so the store
//! is a small async trait. `FileStore` persists one file per key in an
//! XDG-compliant cache directory; `MemoryStore` keeps everything in process and
//! is what tests inject.

use async_trait::async_trait;
use directories::ProjectDirs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// The single, unnamespaced slot the catalog body is cached under
pub const CACHE_KEY: &str = "cachedData";

/// Errors that can occur while reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem operation failed
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Async string store addressed by key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was stored
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores values as files on disk
///
/// Uses `~/.cache/storefront/` on Linux, or the equivalent XDG path on other
/// platforms. Values are written verbatim; nothing expires.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "storefront")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory the store writes into
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// In-process store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_set_writes_value_verbatim() {
        let (store, temp_dir) = create_test_store();
        let body = r#"[{"id":"1","name":"Mango","price":1.5}]"#;

        store.set(CACHE_KEY, body).await.expect("Set should succeed");

        let path = temp_dir.path().join("cachedData.json");
        let content = std::fs::read_to_string(path).expect("Should read file");
        assert_eq!(content, body);
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();

        let result = store.get(CACHE_KEY).await.expect("Get should succeed");

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[tokio::test]
    async fn test_set_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache");
        let store = FileStore::with_dir(nested_path.clone());

        store.set(CACHE_KEY, "[]").await.expect("Set should succeed");

        assert!(nested_path.join("cachedData.json").exists());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let (store, _temp_dir) = create_test_store();

        store.set(CACHE_KEY, "[1]").await.unwrap();
        store.set(CACHE_KEY, "[2]").await.unwrap();

        assert_eq!(store.get(CACHE_KEY).await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn test_get_on_directory_path_is_an_error() {
        let (store, temp_dir) = create_test_store();
        std::fs::create_dir_all(temp_dir.path().join("cachedData.json")).unwrap();

        let result = store.get(CACHE_KEY).await;

        assert!(result.is_err(), "Reading a directory should surface an I/O error");
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            let path_str = store.dir().to_string_lossy();
            assert!(path_str.contains("storefront"));
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();

        clone.set(CACHE_KEY, "[]").await.unwrap();

        assert_eq!(store.get(CACHE_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_memory_store_with_entry() {
        let store = MemoryStore::with_entry(CACHE_KEY, "[3]");
        assert_eq!(store.get(CACHE_KEY).await.unwrap().as_deref(), Some("[3]"));
        assert!(store.get("other").await.unwrap().is_none());
    }
}
