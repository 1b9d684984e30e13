//! # iHome Domain
//!
//! Business domain types for the iHome dormitory portal client.
//!
//! This crate contains:
//! - Domain error type and Result alias
//! - Configuration structures
//! - User identity and response envelope types
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other iHome crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
