//! Application constants
//!
//! Centralized location for domain-level constants shared by the session
//! layer and the API client.

// Persisted session keys
pub const TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

// Backend defaults
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_SESSION_PATH: &str = "ihome-session.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Envelope code signalling business success.
pub const SUCCESS_CODE: i64 = 0;

// User-facing messages
pub const MSG_REQUEST_FAILED: &str = "Request failed";
pub const MSG_NETWORK_ERROR: &str = "Network error";
pub const MSG_SESSION_EXPIRED: &str = "Session expired, please log in again";
