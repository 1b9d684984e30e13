//! Portal API client
//!
//! This module provides the authenticated HTTP client for the iHome backend
//! and the endpoint catalog built on it.
//!
//! # Architecture
//!
//! - [`ApiClient`]: bearer injection, response classification, and the
//!   token refresh protocol (one refresh per expiry, FIFO replay, single
//!   retry)
//! - [`RefreshCoordinator`]: session phase plus the queue of parked requests
//! - [`PortalApi`]: one function per backend operation
//! - [`TracingNotifier`] / [`LoggingNavigator`]: default collaborators

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod errors;
pub mod notify;
pub mod refresh;
pub mod request;

pub use client::{classify, classify_response, ApiClient, ApiClientConfig};
pub use endpoints::{NotificationReceiver, PortalApi};
pub use errors::{ApiError, ApiErrorCategory};
pub use notify::{LoggingNavigator, TracingNotifier};
pub use refresh::{Admission, PendingRequest, RefreshCoordinator, SessionPhase, Settlement};
pub use request::ApiRequest;
