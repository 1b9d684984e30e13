//! Session storage backends
//!
//! [`FileSessionStorage`] persists the session as a flat JSON object on disk;
//! [`MemorySessionStorage`] keeps it for the lifetime of the process only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::session::SessionError;
use super::traits::{SessionStorage, StorageChange};

type Entries = HashMap<String, String>;

fn apply_changes(entries: &mut Entries, changes: &[StorageChange]) {
    for change in changes {
        match change {
            StorageChange::Set { key, value } => {
                entries.insert(key.clone(), value.clone());
            }
            StorageChange::Remove { key } => {
                entries.remove(key);
            }
        }
    }
}

/// JSON file holding `{ "token": ..., "refreshToken": ..., "user": ... }`.
///
/// Every batch is written to a sibling temp file and renamed over the
/// target, so a crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, SessionError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => {
                return Err(SessionError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&raw).map_err(|err| SessionError::Corrupt {
            key: self.path.display().to_string(),
            reason: err.to_string(),
        })
    }

    async fn persist(&self, entries: &Entries) -> Result<(), SessionError> {
        let encoded = serde_json::to_string_pretty(entries)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                SessionError::Storage(format!("failed to create {}: {err}", parent.display()))
            })?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, encoded)
            .await
            .map_err(|err| SessionError::Storage(format!("failed to write {}: {err}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|err| {
            SessionError::Storage(format!("failed to replace {}: {err}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load().await?.remove(key))
    }

    async fn apply(&self, changes: &[StorageChange]) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        apply_changes(&mut entries, changes);
        self.persist(&entries).await
    }
}

/// Process-local storage; the session ends with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: RwLock<Entries>,
}

impl MemorySessionStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn apply(&self, changes: &[StorageChange]) -> Result<(), SessionError> {
        apply_changes(&mut *self.entries.write().await, changes);
        Ok(())
    }
}
