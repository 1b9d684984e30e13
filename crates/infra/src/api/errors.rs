//! API-specific error types
//!
//! Classifies every way a portal call can fail and decides what the user is
//! told about it.

use std::time::Duration;

use ihome_common::SessionError;
use ihome_domain::constants::{MSG_NETWORK_ERROR, MSG_REQUEST_FAILED, MSG_SESSION_EXPIRED};
use ihome_domain::IHomeError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Transport succeeded, backend rejected the operation (`code != 0`)
    Business,
    /// Access token rejected or session lost
    Authentication,
    /// Non-2xx status, connection failure or timeout
    Transport,
    /// Failure on this side of the wire (decoding, storage, configuration)
    Local,
}

/// API operation errors
///
/// `Clone` so a single refresh failure can be delivered to every queued
/// caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Business error {code}: {message}")]
    Business { code: i64, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Map a non-2xx status (other than 401) to an error carrying `message`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized(message),
            429 => Self::RateLimit(message),
            500..=599 => Self::Server { status, message },
            _ => Self::Client { status, message },
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Business { .. } => ApiErrorCategory::Business,
            Self::Unauthorized(_) | Self::SessionExpired | Self::NoRefreshToken => {
                ApiErrorCategory::Authentication
            }
            Self::Client { .. }
            | Self::Server { .. }
            | Self::RateLimit(_)
            | Self::Network(_)
            | Self::Timeout(_) => ApiErrorCategory::Transport,
            Self::Decode(_) | Self::Storage(_) | Self::Config(_) | Self::Cancelled => {
                ApiErrorCategory::Local
            }
        }
    }

    /// Whether this failure ends the session.
    pub fn is_session_terminal(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NoRefreshToken)
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        let or_default = |message: &str, default: &str| {
            if message.trim().is_empty() {
                default.to_string()
            } else {
                message.to_string()
            }
        };

        match self {
            Self::Business { message, .. } => or_default(message, MSG_REQUEST_FAILED),
            Self::SessionExpired | Self::NoRefreshToken => MSG_SESSION_EXPIRED.to_string(),
            Self::Unauthorized(message)
            | Self::RateLimit(message)
            | Self::Network(message)
            | Self::Client { message, .. }
            | Self::Server { message, .. } => or_default(message, MSG_NETWORK_ERROR),
            Self::Timeout(_) => format!("{MSG_NETWORK_ERROR}: request timed out"),
            Self::Decode(_) | Self::Storage(_) | Self::Config(_) | Self::Cancelled => {
                self.to_string()
            }
        }
    }
}

impl From<IHomeError> for ApiError {
    fn from(err: IHomeError) -> Self {
        match err {
            IHomeError::Network(msg) => Self::Network(msg),
            IHomeError::Auth(msg) => Self::Unauthorized(msg),
            IHomeError::Storage(msg) => Self::Storage(msg),
            IHomeError::Config(msg) => Self::Config(msg),
            IHomeError::InvalidInput(msg) | IHomeError::Internal(msg) => Self::Decode(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Storage(err.to_string())
    }
}
