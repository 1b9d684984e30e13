//! Session credentials and their persistence
//!
//! The authenticated API client never touches storage directly: it reads and
//! swaps credentials through a [`SessionManager`], which mirrors the durable
//! [`SessionStorage`] in memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ SessionManager  │  in-memory mirror, single writer at a time
//! └────────┬────────┘
//!          │
//!          └──► SessionStorage  (file-backed or in-memory key/value store)
//!                 keys: token, refreshToken, user
//! ```
//!
//! The [`Notifier`] and [`Navigator`] traits are the seams through which the
//! client reaches the UI: user-visible error messages and the redirect to
//! the authentication entry point.
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ihome_common::auth::{Credentials, FileSessionStorage, SessionManager};
//!
//! # async fn example() -> Result<(), ihome_common::SessionError> {
//! let storage = Arc::new(FileSessionStorage::new("ihome-session.json"));
//! let session = SessionManager::new(storage);
//!
//! // Pick up a session persisted by a previous run
//! if !session.initialize().await? {
//!     session
//!         .store_credentials(Credentials::new("access", Some("refresh".to_string())))
//!         .await?;
//! }
//!
//! assert!(session.access_token().await.is_some());
//! # Ok(())
//! # }
//! ```

pub mod session;
pub mod storage;
pub mod traits;
pub mod types;

pub use session::{SessionError, SessionManager};
pub use storage::{FileSessionStorage, MemorySessionStorage};
pub use traits::{Navigator, Notifier, SessionStorage, StorageChange};
pub use types::{Credentials, SessionSnapshot, TokenPair};
