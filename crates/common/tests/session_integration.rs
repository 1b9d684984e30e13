//! Integration tests for session persistence
//!
//! Drives [`SessionManager`] against the on-disk backend to check that a
//! session survives a restart and that refreshes replace both tokens.

use std::sync::Arc;

use ihome_common::{Credentials, FileSessionStorage, SessionManager, SessionStorage};
use ihome_domain::{UserIdentity, UserType};
use serde_json::json;

fn admin() -> UserIdentity {
    UserIdentity::from_user_info(&json!({"id": "a1", "name": "Warden"}), UserType::Admin)
        .expect("valid user info")
}

/// A login written by one process is visible to the next one.
///
/// # Test Steps
/// 1. Establish a session through a file-backed manager
/// 2. Build a second manager on the same path and initialize it
/// 3. Verify tokens and identity were restored
#[tokio::test(flavor = "multi_thread")]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    let first = SessionManager::new(Arc::new(FileSessionStorage::new(&path)));
    first
        .establish(Credentials::new("T1", Some("R1".to_string())), admin())
        .await
        .expect("establish");

    let second = SessionManager::new(Arc::new(FileSessionStorage::new(&path)));
    assert!(second.initialize().await.expect("initialize"));
    assert_eq!(second.access_token().await.as_deref(), Some("T1"));
    assert_eq!(second.refresh_token().await.as_deref(), Some("R1"));
    assert!(second.user().await.expect("user restored").is_admin());
}

/// A refresh rewrites both tokens on disk and logout leaves nothing behind.
#[tokio::test(flavor = "multi_thread")]
async fn test_refresh_then_logout_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = Arc::new(FileSessionStorage::new(dir.path().join("session.json")));
    let session = SessionManager::new(storage.clone());

    session.establish(Credentials::new("T1", Some("R1".to_string())), admin()).await.unwrap();
    session.store_credentials(Credentials::new("T2", Some("R2".to_string()))).await.unwrap();

    assert_eq!(storage.get("token").await.unwrap().as_deref(), Some("T2"));
    assert_eq!(storage.get("refreshToken").await.unwrap().as_deref(), Some("R2"));
    assert!(storage.get("user").await.unwrap().is_some());

    session.clear().await.unwrap();
    for key in ["token", "refreshToken", "user"] {
        assert_eq!(storage.get(key).await.unwrap(), None, "{key} should be removed");
    }
}
