//! Mock implementations of session traits
//!
//! Provides in-memory doubles for [`SessionStorage`], [`Notifier`] and
//! [`Navigator`] that record every interaction.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{Navigator, Notifier, SessionError, SessionStorage, StorageChange};

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// Mock session storage
///
/// Batches are applied under one lock, matching the atomicity contract of
/// [`SessionStorage::apply`]. Failures can be injected with
/// [`set_should_fail`](Self::set_should_fail).
///
/// # Examples
///
/// ```
/// use ihome_common::testing::MockSessionStorage;
///
/// let storage = MockSessionStorage::new();
/// storage.insert("token", "T1");
/// assert_eq!(storage.value("token"), Some("T1".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockSessionStorage {
    data: StorageData,
    should_fail: Arc<AtomicBool>,
    applies: Arc<AtomicUsize>,
}

impl MockSessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write
    pub fn insert(&self, key: &str, value: &str) {
        // SAFETY: Mutex poisoning is acceptable in test mocks
        self.data.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.lock().unwrap().is_empty()
    }

    /// Make every subsequent read and write fail
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `apply` batches
    #[must_use]
    pub fn apply_count(&self) -> usize {
        self.applies.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), SessionError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SessionError::Storage("mock storage failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for MockSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.check()?;
        Ok(self.value(key))
    }

    async fn apply(&self, changes: &[StorageChange]) -> Result<(), SessionError> {
        self.check()?;
        let mut data = self.data.lock().unwrap();
        for change in changes {
            match change {
                StorageChange::Set { key, value } => {
                    data.insert(key.clone(), value.clone());
                }
                StorageChange::Remove { key } => {
                    data.remove(key);
                }
            }
        }
        self.applies.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Notifier that keeps every message it was asked to show
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// How many times `message` was shown
    #[must_use]
    pub fn count(&self, message: &str) -> usize {
        self.messages.lock().unwrap().iter().filter(|m| m.as_str() == message).count()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Navigator that records redirects instead of performing them
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}
