//! Durable slug -> URL configuration store.
//!
//! The store is an external collaborator from the core's point of view: it
//! only needs ordered iteration, point lookup, and insertion. Two
//! implementations are provided: an in-memory store for tests and embedding,
//! and a JSON-file-backed store for real deployments.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

/// One durable repository record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoEntry {
    pub slug: String,
    pub url: String,
}

/// Durable slug -> URL map. Insertion order is preserved by `get_all`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// All records in insertion order.
    async fn get_all(&self) -> Result<Vec<RepoEntry>>;

    /// URL for a slug, or `None` if the slug was never added.
    async fn get(&self, slug: &str) -> Result<Option<String>>;

    /// Durably record slug -> url. The caller guarantees the slug is new.
    async fn set(&self, slug: &str, url: &str) -> Result<()>;
}

/// In-memory store. Entries live as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<RepoEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<RepoEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn get(&self, slug: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.slug == slug)
            .map(|e| e.url.clone()))
    }

    async fn set(&self, slug: &str, url: &str) -> Result<()> {
        self.entries.lock().unwrap().push(RepoEntry {
            slug: slug.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }
}

/// JSON-file-backed store. The file holds an array of entries so insertion
/// order survives reloads.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_entries(&self) -> Result<Vec<RepoEntry>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config store at {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config store at {:?}", self.path))
    }

    fn write_entries(&self, entries: &[RepoEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory at {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config store at {:?}", self.path))
    }
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn get_all(&self) -> Result<Vec<RepoEntry>> {
        self.read_entries()
    }

    async fn get(&self, slug: &str) -> Result<Option<String>> {
        Ok(self
            .read_entries()?
            .into_iter()
            .find(|e| e.slug == slug)
            .map(|e| e.url))
    }

    async fn set(&self, slug: &str, url: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.push(RepoEntry {
            slug: slug.to_string(),
            url: url.to_string(),
        });
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_all().await.unwrap().is_empty());
        assert_eq!(store.get("main").await.unwrap(), None);

        store.set("main", "http://example.com/index").await.unwrap();

        assert_eq!(
            store.get("main").await.unwrap(),
            Some("http://example.com/index".to_string())
        );
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.set("c", "http://c").await.unwrap();
        store.set("a", "http://a").await.unwrap();
        store.set("b", "http://b").await.unwrap();

        let slugs: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.slug)
            .collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_json_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("repositories.json");

        let store = JsonFileStore::new(path.clone());
        assert!(store.get_all().await.unwrap().is_empty());

        store.set("main", "http://example.com/index").await.unwrap();
        store.set("extra", "http://example.com/extra").await.unwrap();

        // A fresh store over the same file sees the same entries, in order.
        let reloaded = JsonFileStore::new(path);
        let entries = reloaded.get_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].slug, "main");
        assert_eq!(entries[1].slug, "extra");
        assert_eq!(
            reloaded.get("extra").await.unwrap(),
            Some("http://example.com/extra".to_string())
        );
    }

    #[tokio::test]
    async fn test_json_store_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/repositories.json");

        let store = JsonFileStore::new(path.clone());
        store.set("main", "http://example.com").await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_json_store_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("repositories.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(path);
        let result = store.get_all().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse config store")
        );
    }
}
