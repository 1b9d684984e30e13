//! Logging setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer (plain or JSON) writing to stderr, leaving stdout to the command
//! output. `RUST_LOG` overrides the configured filter.
//!
//! Log fields never carry tokens: the HTTP layer logs method and path only,
//! and credential types redact themselves in `Debug`.

use ihome_domain::{IHomeError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set and valid, else the configured
/// directive string.
///
/// # Errors
/// Returns `IHomeError::Config` if the configured directives do not parse
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, IHomeError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter)
        .map_err(|e| IHomeError::Config(format!("Invalid log filter '{}': {e}", config.filter)))
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `IHomeError::Config` for an invalid filter and
/// `IHomeError::Internal` if a global subscriber is already set
pub fn init_tracing(config: &LoggingConfig) -> Result<(), IHomeError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| IHomeError::Internal(format!("Failed to install tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_config_error() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig { filter: "info,ihome_infra=loud".into(), json: false };
        assert!(matches!(build_filter(&config), Err(IHomeError::Config(_))));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig { filter: "warn".into(), json: true };
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(IHomeError::Internal(_))));
    }
}
