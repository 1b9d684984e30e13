//! Session manager
//!
//! Owns the credential pair and user identity for the signed-in principal:
//! - Loads persisted state from [`SessionStorage`] on startup
//! - Swaps access and refresh tokens as one unit
//! - Clears memory and storage on logout or failed refresh

use std::sync::Arc;

use ihome_domain::constants::{REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};
use ihome_domain::{IHomeError, UserIdentity};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::traits::{SessionStorage, StorageChange};
use super::types::{Credentials, SessionSnapshot};

/// Error type for session persistence
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Backing store could not be read or written
    #[error("session storage error: {0}")]
    Storage(String),

    /// A persisted entry could not be decoded
    #[error("corrupt session entry '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// User identity could not be encoded for storage
    #[error("session serialization error: {0}")]
    Serialization(String),
}

impl From<SessionError> for IHomeError {
    fn from(err: SessionError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Session state shared by the API client and the application shell.
///
/// Reads go through an async `RwLock`; every write holds the write guard
/// across the storage call so memory and storage change together.
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionSnapshot>,
}

impl SessionManager {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage, state: RwLock::new(SessionSnapshot::default()) }
    }

    /// Load persisted session state.
    ///
    /// Returns `true` if an access token was found. A `user` entry that is
    /// not valid JSON is logged and ignored.
    ///
    /// # Errors
    /// Returns error if storage cannot be read
    pub async fn initialize(&self) -> Result<bool, SessionError> {
        let access_token = self.storage.get(TOKEN_KEY).await?;
        let refresh_token = self.storage.get(REFRESH_TOKEN_KEY).await?;
        let user = match self.storage.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<UserIdentity>(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "Ignoring unreadable persisted user identity");
                    None
                }
            },
            None => None,
        };

        let credentials = access_token
            .filter(|token| !token.is_empty())
            .map(|token| Credentials::new(token, refresh_token));
        let found = credentials.is_some();

        *self.state.write().await = SessionSnapshot { credentials, user };

        if found {
            info!("Session restored from storage");
        } else {
            debug!("No persisted session found");
        }
        Ok(found)
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.credentials.as_ref().map(|c| c.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.credentials.as_ref().and_then(|c| c.refresh_token.clone())
    }

    pub async fn credentials(&self) -> Option<Credentials> {
        self.state.read().await.credentials.clone()
    }

    pub async fn user(&self) -> Option<UserIdentity> {
        self.state.read().await.user.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Record a fresh login: credentials and identity in one batch.
    ///
    /// # Errors
    /// Returns error if the identity cannot be serialized or storage fails;
    /// in-memory state is unchanged in that case
    pub async fn establish(
        &self,
        credentials: Credentials,
        user: UserIdentity,
    ) -> Result<(), SessionError> {
        let encoded =
            serde_json::to_string(&user).map_err(|e| SessionError::Serialization(e.to_string()))?;

        let mut changes = credential_changes(&credentials);
        changes.push(StorageChange::set(USER_KEY, encoded));

        let mut state = self.state.write().await;
        self.storage.apply(&changes).await?;
        *state = SessionSnapshot { credentials: Some(credentials), user: Some(user) };

        info!(user_id = %state.user.as_ref().map_or("", |u| u.id.as_str()), "Session established");
        Ok(())
    }

    /// Replace the credential pair after a refresh, keeping the identity.
    ///
    /// # Errors
    /// Returns error if storage fails; in-memory state is unchanged
    pub async fn store_credentials(&self, credentials: Credentials) -> Result<(), SessionError> {
        self.store_credentials_unless(credentials, || false).await.map(|_| ())
    }

    /// Replace the credential pair unless `discard` says otherwise.
    ///
    /// `discard` runs under the session write lock, so a concurrent
    /// [`clear`](Self::clear) either completes before the check or runs after
    /// the write. Returns whether the pair was stored.
    ///
    /// # Errors
    /// Returns error if storage fails; in-memory state is unchanged
    pub async fn store_credentials_unless<F>(
        &self,
        credentials: Credentials,
        discard: F,
    ) -> Result<bool, SessionError>
    where
        F: FnOnce() -> bool,
    {
        let changes = credential_changes(&credentials);

        let mut state = self.state.write().await;
        if discard() {
            debug!("Refreshed credentials discarded");
            return Ok(false);
        }
        self.storage.apply(&changes).await?;
        state.credentials = Some(credentials);

        debug!("Session credentials replaced");
        Ok(true)
    }

    /// Drop every trace of the session.
    ///
    /// Memory is cleared even when storage fails, so the process never keeps
    /// acting on credentials the caller asked to discard.
    ///
    /// # Errors
    /// Returns the storage error after memory has been cleared
    pub async fn clear(&self) -> Result<(), SessionError> {
        let changes = [
            StorageChange::remove(TOKEN_KEY),
            StorageChange::remove(REFRESH_TOKEN_KEY),
            StorageChange::remove(USER_KEY),
        ];

        let mut state = self.state.write().await;
        *state = SessionSnapshot::default();
        let result = self.storage.apply(&changes).await;
        drop(state);

        match &result {
            Ok(()) => info!("Session cleared"),
            Err(err) => warn!(error = %err, "Session cleared in memory but storage clear failed"),
        }
        result
    }
}

fn credential_changes(credentials: &Credentials) -> Vec<StorageChange> {
    let refresh = match &credentials.refresh_token {
        Some(token) => StorageChange::set(REFRESH_TOKEN_KEY, token.clone()),
        None => StorageChange::remove(REFRESH_TOKEN_KEY),
    };
    vec![StorageChange::set(TOKEN_KEY, credentials.access_token.clone()), refresh]
}

#[cfg(test)]
mod tests {
    use ihome_domain::UserType;
    use serde_json::json;

    use super::*;
    use crate::testing::MockSessionStorage;

    fn student() -> UserIdentity {
        UserIdentity::from_user_info(&json!({"id": 7, "name": "Lin", "roomId": 3}), UserType::Student)
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_empty_storage() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage);

        assert!(!session.initialize().await.unwrap());
        assert!(!session.is_authenticated().await);
        assert_eq!(session.access_token().await, None);
    }

    #[tokio::test]
    async fn test_initialize_restores_persisted_state() {
        let storage = Arc::new(MockSessionStorage::new());
        storage.insert(TOKEN_KEY, "T1");
        storage.insert(REFRESH_TOKEN_KEY, "R1");
        storage.insert(USER_KEY, &serde_json::to_string(&student()).unwrap());

        let session = SessionManager::new(storage);
        assert!(session.initialize().await.unwrap());
        assert_eq!(session.access_token().await.as_deref(), Some("T1"));
        assert_eq!(session.refresh_token().await.as_deref(), Some("R1"));
        assert_eq!(session.user().await.unwrap().id, "7");
    }

    #[tokio::test]
    async fn test_initialize_ignores_corrupt_user() {
        let storage = Arc::new(MockSessionStorage::new());
        storage.insert(TOKEN_KEY, "T1");
        storage.insert(USER_KEY, "{not json");

        let session = SessionManager::new(storage);
        assert!(session.initialize().await.unwrap());
        assert!(session.user().await.is_none());
        assert_eq!(session.refresh_token().await, None);
    }

    #[tokio::test]
    async fn test_establish_persists_everything_in_one_batch() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());

        session
            .establish(Credentials::new("T1", Some("R1".into())), student())
            .await
            .unwrap();

        assert_eq!(storage.apply_count(), 1);
        assert_eq!(storage.value(TOKEN_KEY).as_deref(), Some("T1"));
        assert_eq!(storage.value(REFRESH_TOKEN_KEY).as_deref(), Some("R1"));
        let persisted: UserIdentity =
            serde_json::from_str(&storage.value(USER_KEY).unwrap()).unwrap();
        assert_eq!(persisted, student());
    }

    #[tokio::test]
    async fn test_store_credentials_swaps_pair_and_keeps_user() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());
        session.establish(Credentials::new("T1", Some("R1".into())), student()).await.unwrap();

        session.store_credentials(Credentials::new("T2", Some("R2".into()))).await.unwrap();

        assert_eq!(session.access_token().await.as_deref(), Some("T2"));
        assert_eq!(session.refresh_token().await.as_deref(), Some("R2"));
        assert!(session.user().await.is_some());
        assert_eq!(storage.value(TOKEN_KEY).as_deref(), Some("T2"));
        assert_eq!(storage.value(REFRESH_TOKEN_KEY).as_deref(), Some("R2"));
    }

    #[tokio::test]
    async fn test_store_credentials_without_refresh_removes_stale_one() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());
        session.store_credentials(Credentials::new("T1", Some("R1".into()))).await.unwrap();

        session.store_credentials(Credentials::new("T2", None)).await.unwrap();

        assert_eq!(storage.value(REFRESH_TOKEN_KEY), None);
        assert_eq!(session.refresh_token().await, None);
    }

    #[tokio::test]
    async fn test_discarded_credentials_are_not_written() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());
        session.clear().await.unwrap();
        let writes = storage.apply_count();

        let stored = session
            .store_credentials_unless(Credentials::new("T2", Some("R2".into())), || true)
            .await
            .unwrap();

        assert!(!stored);
        assert!(!session.is_authenticated().await);
        assert!(storage.is_empty());
        assert_eq!(storage.apply_count(), writes);

        let stored = session
            .store_credentials_unless(Credentials::new("T3", None), || false)
            .await
            .unwrap();
        assert!(stored);
        assert_eq!(session.access_token().await.as_deref(), Some("T3"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_untouched() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());
        session.store_credentials(Credentials::new("T1", Some("R1".into()))).await.unwrap();

        storage.set_should_fail(true);
        let err = session.store_credentials(Credentials::new("T2", Some("R2".into()))).await;

        assert!(matches!(err, Err(SessionError::Storage(_))));
        assert_eq!(session.access_token().await.as_deref(), Some("T1"));
        assert_eq!(session.refresh_token().await.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_clear_removes_all_keys() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());
        session.establish(Credentials::new("T1", Some("R1".into())), student()).await.unwrap();

        session.clear().await.unwrap();

        assert!(!session.is_authenticated().await);
        assert!(session.user().await.is_none());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_clear_drops_memory_even_if_storage_fails() {
        let storage = Arc::new(MockSessionStorage::new());
        let session = SessionManager::new(storage.clone());
        session.store_credentials(Credentials::new("T1", None)).await.unwrap();

        storage.set_should_fail(true);
        assert!(session.clear().await.is_err());
        assert!(!session.is_authenticated().await);
    }

    #[test]
    fn test_session_error_converts_to_domain_error() {
        let err: IHomeError = SessionError::Storage("disk full".into()).into();
        assert!(matches!(err, IHomeError::Storage(msg) if msg.contains("disk full")));
    }
}
