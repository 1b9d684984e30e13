//! Resolves [`Config`] for the client.
//!
//! The environment wins when `IHOME_API_BASE_URL` is set; otherwise the first
//! `config.{json,toml}` or `ihome.{json,toml}` found near the working
//! directory or the executable is parsed.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `IHOME_API_BASE_URL` (required) | `api.base_url` |
//! | `IHOME_API_TIMEOUT_MS` | `api.timeout_ms` |
//! | `IHOME_REFRESH_PATH` | `api.refresh_path` |
//! | `IHOME_LOGIN_ROUTE` | `api.login_route` |
//! | `IHOME_USER_AGENT` | `api.user_agent` |
//! | `IHOME_SESSION_PATH` | `session.storage_path`, empty for memory only |
//! | `IHOME_LOG_FILTER` | `logging.filter` |
//! | `IHOME_LOG_JSON` | `logging.json` |

use std::path::{Path, PathBuf};

use ihome_domain::constants::{
    DEFAULT_LOGIN_ROUTE, DEFAULT_LOG_FILTER, DEFAULT_REFRESH_PATH, DEFAULT_SESSION_PATH,
    DEFAULT_TIMEOUT_MS,
};
use ihome_domain::{ApiConfig, Config, IHomeError, LoggingConfig, Result, SessionConfig};

use crate::errors::InfraError;

/// Environment first, then the first config file found.
///
/// # Errors
/// `IHomeError::Config` when neither source yields a valid configuration
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration read from IHOME_* environment");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment incomplete, probing config files");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `IHOME_API_BASE_URL` is required; everything else falls back to the
/// defaults in [`ihome_domain::constants`].
///
/// # Errors
/// Returns `IHomeError::Config` if the base URL is missing or a value is
/// invalid.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("IHOME_API_BASE_URL")?;
    if base_url.trim().is_empty() {
        return Err(IHomeError::Config("IHOME_API_BASE_URL must not be empty".to_string()));
    }

    let timeout_ms = match std::env::var("IHOME_API_TIMEOUT_MS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|e| IHomeError::Config(format!("Invalid request timeout: {}", e)))?,
        Err(_) => DEFAULT_TIMEOUT_MS,
    };

    Ok(Config {
        api: ApiConfig {
            base_url,
            timeout_ms,
            refresh_path: env_or("IHOME_REFRESH_PATH", DEFAULT_REFRESH_PATH),
            login_route: env_or("IHOME_LOGIN_ROUTE", DEFAULT_LOGIN_ROUTE),
            user_agent: std::env::var("IHOME_USER_AGENT").ok(),
        },
        session: SessionConfig { storage_path: env_or("IHOME_SESSION_PATH", DEFAULT_SESSION_PATH) },
        logging: LoggingConfig {
            filter: env_or("IHOME_LOG_FILTER", DEFAULT_LOG_FILTER),
            json: env_bool("IHOME_LOG_JSON", false),
        },
    })
}

/// Read `path`, or the first probed candidate when `path` is `None`.
///
/// # Errors
/// `IHomeError::Config` for a missing file, an unreadable file or a body that
/// does not parse as the format its extension names
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(IHomeError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            IHomeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Reading config file");

    let contents = std::fs::read_to_string(&config_path).map_err(|e| {
        let infra: InfraError = e.into();
        IHomeError::Config(format!("Failed to read config file: {}", IHomeError::from(infra)))
    })?;

    parse_config(&contents, &config_path)
}

/// `.toml` parses as TOML; `.json` or no extension as JSON.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| {
            let infra: InfraError = e.into();
            infra.into()
        }),
        "json" => serde_json::from_str(contents)
            .map_err(|e| IHomeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(IHomeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing candidate around the working directory, then around the
/// executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("ihome.json"),
        dir.join("ihome.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| IHomeError::Config(format!("Missing required environment variable: {}", key)))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `1`, `true`, `yes` and `on` (any case) are true.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
