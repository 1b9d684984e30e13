//! HTTP transport
//!
//! Thin wrapper over `reqwest` that owns timeouts and default headers. The
//! authenticated API client builds on top of it.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
