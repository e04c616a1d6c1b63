//! Persisted key-value storage seam.
//!
//! Survives process restarts; the session lives here between runs. Only the
//! session store reads or writes the session keys.

use async_trait::async_trait;

use crate::error::Result;

/// Process-local string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Writes several entries in one step.
    ///
    /// The default implementation writes them one at a time; adapters that can
    /// commit a batch atomically should override it.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Removes several keys in one step.
    async fn remove_many(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
