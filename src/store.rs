// ABOUTME: Persistent key/value store capability used for the pending-booking handoff
// ABOUTME: In-memory implementation for tests and a JSON file implementation for the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PendingBookingConfig;
use crate::errors::{BookingError, BookingResult};
use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// String key/value storage that survives a session interruption
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    async fn get(&self, key: &str) -> BookingResult<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    async fn set(&self, key: &str, value: String) -> BookingResult<()>;

    /// Remove a value, returning it if present
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written
    async fn remove(&self, key: &str) -> BookingResult<Option<String>>;
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> BookingResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> BookingResult<()> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> BookingResult<Option<String>> {
        Ok(self.entries.write().await.remove(key))
    }
}

/// Store persisted as a single JSON object on disk
///
/// Every operation reads and rewrites the whole file under a lock.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Create a store at `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Backing file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entries, and whether the file held unparseable content
    ///
    /// An unparseable file reads as empty; the next write replaces it.
    async fn read_all(&self) -> BookingResult<(HashMap<String, String>, bool)> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok((HashMap::new(), false)),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => Ok((entries, false)),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Ignoring unreadable store file"
                    );
                    Ok((HashMap::new(), true))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok((HashMap::new(), false)),
            Err(e) => Err(storage_error(&self.path, &e)),
        }
    }

    async fn write_all(&self, entries: &HashMap<String, String>) -> BookingResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| storage_error(parent, &e))?;
            }
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|e| BookingError::Storage {
            reason: e.to_string(),
        })?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| storage_error(&self.path, &e))
    }
}

fn storage_error(path: &Path, e: &std::io::Error) -> BookingError {
    BookingError::Storage {
        reason: format!("{}: {e}", path.display()),
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> BookingResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let (mut entries, _) = self.read_all().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> BookingResult<()> {
        let _guard = self.lock.lock().await;
        let (mut entries, _) = self.read_all().await?;
        entries.insert(key.to_owned(), value);
        self.write_all(&entries).await?;
        debug!(key, path = %self.path.display(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> BookingResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let (mut entries, corrupt) = self.read_all().await?;
        let removed = entries.remove(key);
        if removed.is_some() || corrupt {
            self.write_all(&entries).await?;
        }
        Ok(removed)
    }
}

/// Store selected by configuration: file-backed when a path is set, in-memory otherwise
#[must_use]
pub fn store_from_config(config: &PendingBookingConfig) -> Arc<dyn KeyValueStore> {
    match &config.store_path {
        Some(path) => {
            info!(path = %path.display(), "Using file-backed pending booking store");
            Arc::new(FileKeyValueStore::new(path.clone()))
        }
        None => {
            info!("Using in-memory pending booking store");
            Arc::new(InMemoryKeyValueStore::new())
        }
    }
}
