//! # iHome Infrastructure
//!
//! Everything that touches the network, the filesystem or the process
//! environment.
//!
//! This crate contains:
//! - HTTP transport over `reqwest`
//! - The authenticated API client with token refresh coordination
//! - The portal endpoint catalog
//! - Configuration loading (environment, JSON, TOML)
//! - `tracing` subscriber setup
//!
//! ## Architecture
//! - Depends on `ihome-domain` for types and `ihome-common` for session state
//! - Session storage and UI collaborators are injected as trait objects

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientConfig, ApiError, ApiErrorCategory, ApiRequest, LoggingNavigator,
    NotificationReceiver, PortalApi, SessionPhase, TracingNotifier,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
