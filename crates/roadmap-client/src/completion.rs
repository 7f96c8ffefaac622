//! Completion-state tracking.
//!
//! Progress is a flat string map keyed by completion key with values
//! `"true"` / `"false"`; an absent key means not completed. The store is
//! per client and has no expiry.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::dom::Element;
use crate::error::ClientError;
use roadmap_common::redis::RedisCache;

pub const PROGRESS_NAMESPACE: &str = "rmp:progress:";

const COMPLETED_LABEL: &str = "Completed";

pub enum ProgressStore {
    Memory(Mutex<HashMap<String, String>>),
    /// JSON object on disk, re-read on every access. Concurrent writers
    /// overwrite each other (last writer wins).
    File {
        path: PathBuf,
        write_lock: tokio::sync::Mutex<()>,
    },
    Redis(RedisCache),
}

impl ProgressStore {
    pub fn memory() -> Self {
        Self::Memory(Mutex::new(HashMap::new()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn redis(cache: RedisCache) -> Self {
        Self::Redis(cache)
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File { .. } => "file",
            Self::Redis(_) => "redis",
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        match self {
            Self::Memory(map) => Ok(map
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()),
            Self::File { path, .. } => Ok(read_map(path).await?.remove(key)),
            Self::Redis(cache) => Ok(cache.get(key).await),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        match self {
            Self::Memory(map) => {
                map.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key.to_string(), value.to_string());
                Ok(())
            }
            Self::File { path, write_lock } => {
                let _guard = write_lock.lock().await;
                let mut map = read_map(path).await?;
                map.insert(key.to_string(), value.to_string());
                write_map(path, &map).await
            }
            Self::Redis(cache) => {
                if cache.set(key, value).await {
                    Ok(())
                } else {
                    Err(ClientError::Storage(format!("redis write failed for '{key}'")))
                }
            }
        }
    }
}

async fn read_map(path: &Path) -> Result<HashMap<String, String>, ClientError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(ClientError::Storage(format!("{}: {e}", path.display()))),
    };
    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))
}

async fn write_map(path: &Path, map: &HashMap<String, String>) -> Result<(), ClientError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ClientError::Storage(format!("{}: {e}", parent.display())))?;
    }
    let body = serde_json::to_vec_pretty(map)
        .map_err(|e| ClientError::Storage(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .map_err(|e| ClientError::Storage(format!("{}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))
}

pub struct CompletionTracker {
    store: ProgressStore,
}

impl CompletionTracker {
    pub fn new(store: ProgressStore) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Unreadable storage reads as not completed.
    pub async fn is_completed(&self, key: &str) -> bool {
        match self.store.get(key).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, key, "failed to read progress");
                false
            }
        }
    }

    /// Flips and persists the state for `key`; returns the new state.
    pub async fn toggle_completed(&self, key: &str) -> Result<bool, ClientError> {
        let completed = !self.is_completed(key).await;
        self.store
            .set(key, if completed { "true" } else { "false" })
            .await?;
        debug!(key, completed, "progress updated");
        Ok(completed)
    }

    pub async fn completed_among<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a str>,
    ) -> HashSet<String> {
        let mut done = HashSet::new();
        for key in keys {
            if self.is_completed(key).await {
                done.insert(key.to_string());
            }
        }
        done
    }
}

/// Sets a status badge's label and class for the given state. Un-completing
/// restores the status recorded in `data-original-status`.
pub fn apply_badge(badge: &mut Element, completed: bool) {
    if completed {
        badge.set_text(COMPLETED_LABEL);
        badge.set_class_name("topic-status completed");
        return;
    }
    let original = badge
        .attr_value("data-original-status")
        .unwrap_or("required")
        .to_string();
    badge.set_text(original.as_str());
    badge.set_class_name(&format!("topic-status {original}"));
}
