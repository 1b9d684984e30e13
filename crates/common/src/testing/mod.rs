//! Testing utilities and helpers
//!
//! - **[`mocks`]**: In-memory session storage plus recording notifier and
//!   navigator for asserting on user-visible side effects
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ihome_common::testing::{MockSessionStorage, RecordingNotifier};
//! use ihome_common::Notifier;
//!
//! let storage = Arc::new(MockSessionStorage::new());
//! storage.set_should_fail(true);
//!
//! let notifier = RecordingNotifier::new();
//! notifier.error("Network error");
//! assert_eq!(notifier.messages(), vec!["Network error".to_string()]);
//! ```

pub mod mocks;

pub use mocks::{MockSessionStorage, RecordingNavigator, RecordingNotifier};
