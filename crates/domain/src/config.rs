//! Configuration structures
//!
//! Loaded by `ihome-infra::config` from the environment or a JSON/TOML file.
//! Every section has serde defaults so partial files are accepted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_LOGIN_ROUTE, DEFAULT_LOG_FILTER, DEFAULT_REFRESH_PATH,
    DEFAULT_SESSION_PATH, DEFAULT_TIMEOUT_MS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to (e.g. `http://host/api`)
    pub base_url: String,
    /// Per-request timeout in milliseconds, refresh calls included
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Path of the token refresh endpoint
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Authentication entry point the UI is sent to after session expiry
    #[serde(default = "default_login_route")]
    pub login_route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            user_agent: None,
        }
    }
}

/// Durable session storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub storage_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { storage_path: DEFAULT_SESSION_PATH.to_string() }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string (e.g. `info,ihome_infra=debug`)
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter(), json: false }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}

fn default_login_route() -> String {
    DEFAULT_LOGIN_ROUTE.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout(), Duration::from_millis(15_000));
        assert_eq!(config.api.refresh_path, "/auth/refresh");
        assert_eq!(config.session.storage_path, "ihome-session.json");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_partial_api_section_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "api": { "base_url": "http://dorm.test/api" } }"#).unwrap();
        assert_eq!(config.api.base_url, "http://dorm.test/api");
        assert_eq!(config.api.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.api.login_route, "/login");
        assert_eq!(config.logging.filter, "info");
    }
}
