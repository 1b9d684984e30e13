//! Traits for session persistence and UI collaborators
//!
//! These traits enable dependency injection and testing by abstracting the
//! pieces of the outside world the API client talks to: durable storage,
//! user-visible notifications, and navigation.

use async_trait::async_trait;

use super::session::SessionError;

/// One mutation inside an atomic storage batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageChange {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StorageChange {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set { key: key.into(), value: value.into() }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Self::Remove { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// Durable key/value storage for the session (`token`, `refreshToken`,
/// `user`).
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    ///
    /// # Errors
    /// Returns error if the backing store cannot be read
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Apply every change or none of them.
    ///
    /// Credential swaps go through a single batch so a reader of the store
    /// never sees a new access token next to an old refresh token.
    ///
    /// # Errors
    /// Returns error if the batch cannot be persisted
    async fn apply(&self, changes: &[StorageChange]) -> Result<(), SessionError>;
}

/// User-visible message sink (toast, status line, stderr...).
pub trait Notifier: Send + Sync {
    /// Show an error message to the user.
    fn error(&self, message: &str);
}

/// Navigation seam used to send the UI to the authentication entry point.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}
