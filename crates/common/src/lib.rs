//! Session primitives shared across iHome crates.
//!
//! # Modules
//!
//! - [`auth`]: credentials, the session manager, durable session storage and
//!   the collaborator traits (notifier, navigator) the API client reports to
//! - [`testing`]: in-memory mocks, behind the `test-utils` feature

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types
pub use auth::{
    Credentials, FileSessionStorage, MemorySessionStorage, Navigator, Notifier, SessionError,
    SessionManager, SessionSnapshot, SessionStorage, StorageChange, TokenPair,
};
