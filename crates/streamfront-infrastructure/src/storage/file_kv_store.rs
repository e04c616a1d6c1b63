//! File-backed key-value store.
//!
//! All entries live in one JSON object file. Each mutation is a locked
//! read-modify-write, so a batch (`set_many` / `remove_many`) lands in a single
//! atomic rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use streamfront_core::error::{Result, StreamfrontError};
use streamfront_core::storage::KeyValueStore;

use super::atomic_json::{AtomicJsonError, AtomicJsonFile};

type Entries = BTreeMap<String, String>;

#[derive(Clone)]
pub struct JsonFileKeyValueStore {
    file: Arc<AtomicJsonFile<Entries>>,
}

impl JsonFileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads all entries; an unparseable file reads as empty.
    async fn read_entries(&self) -> Result<Entries> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| StreamfrontError::internal(format!("Failed to join task: {}", e)))?;

        match loaded {
            Ok(entries) => Ok(entries.unwrap_or_default()),
            Err(AtomicJsonError::JsonError(e)) => {
                tracing::warn!(
                    "[JsonFileKeyValueStore] {} is not valid JSON, reading as empty: {}",
                    self.file.path().display(),
                    e
                );
                Ok(Entries::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.update(Entries::new(), f))
            .await
            .map_err(|e| StreamfrontError::internal(format!("Failed to join task: {}", e)))?
            .map_err(StreamfrontError::from)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.mutate(move |entries| {
            entries.insert(key, value);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.mutate(move |entries| {
            entries.remove(&key);
        })
        .await
    }

    async fn set_many(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.mutate(move |entries| entries.extend(owned)).await
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        let owned: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.mutate(move |entries| {
            for key in &owned {
                entries.remove(key);
            }
        })
        .await
    }
}
