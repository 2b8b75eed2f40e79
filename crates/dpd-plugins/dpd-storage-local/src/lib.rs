//! # dpd-storage-local
//! deer-park/crates/dpd-plugins/dpd-storage-local/src/lib.rs
//! Local implementations of `KeyValueStore`.
//! Features: one JSON document per key on disk with atomic replace, and an
//! in-memory namespace for tests and throwaway sessions.

use async_trait::async_trait;
use dashmap::DashMap;
use dpd_core::error::{AppError, Result};
use dpd_core::traits::KeyValueStore;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

pub struct LocalKeyValueStore {
    /// Root directory of the namespace (e.g., "./data")
    root_path: PathBuf,
}

impl LocalKeyValueStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    /// Maps a key to "<root>/<key>.json". Keys are flattened so they can
    /// never escape the namespace directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.root_path.join(format!("{name}.json"))
    }
}

fn io_failure(action: &str, path: &std::path::Path, err: std::io::Error) -> AppError {
    AppError::Persistence(format!("{action} {}: {err}", path.display()))
}

#[async_trait]
impl KeyValueStore for LocalKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_failure("read", &path, err)),
        }
    }

    /// Writes to a sibling temp file, then renames it over the target.
    /// Readers see the old document or the new one, nothing in between.
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let target_path = self.path_for(key);

        fs::create_dir_all(&self.root_path)
            .await
            .map_err(|e| io_failure("create", &self.root_path, e))?;

        let tmp_path = self
            .root_path
            .join(format!(".{}.tmp", Uuid::new_v4().simple()));
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| io_failure("write", &tmp_path, e))?;

        if let Err(err) = fs::rename(&tmp_path, &target_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(io_failure("replace", &target_path, err));
        }

        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_failure("remove", &path, err)),
        }
    }
}

/// Process-local namespace. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
