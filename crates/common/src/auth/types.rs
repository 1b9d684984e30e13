//! Credential types
//!
//! Defines the access/refresh token pair kept for the signed-in principal and
//! the payload returned by the backend refresh endpoint.

use std::fmt;

use ihome_domain::UserIdentity;
use serde::{Deserialize, Serialize};

/// Access token plus optional refresh token for the active session.
///
/// Exactly one pair exists per authenticated principal. An empty refresh
/// token is normalized to `None` since the backend treats both the same.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer credential attached to every API call
    pub access_token: String,

    /// Longer-lived credential used only against the refresh endpoint
    pub refresh_token: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.filter(|token| !token.is_empty()),
        }
    }

    /// `Authorization` header value for this access token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Tokens never reach log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `data` payload of a successful `POST /auth/refresh` (and of login).
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Access token lifetime in seconds, when the backend reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl From<TokenPair> for Credentials {
    fn from(pair: TokenPair) -> Self {
        Self::new(pair.access_token, Some(pair.refresh_token))
    }
}

/// Point-in-time view of the session held by a
/// [`SessionManager`](super::SessionManager).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub credentials: Option<Credentials>,
    pub user: Option<UserIdentity>,
}

impl SessionSnapshot {
    /// Absence of an access token is equivalent to being logged out.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}
