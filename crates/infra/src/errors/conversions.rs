//! Conversions from external infrastructure errors into domain errors.

use ihome_domain::IHomeError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub IHomeError);

impl From<InfraError> for IHomeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<IHomeError> for InfraError {
    fn from(value: IHomeError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoIHomeError {
    fn into_ihome(self) -> IHomeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → IHomeError */
/* -------------------------------------------------------------------------- */

impl IntoIHomeError for HttpError {
    fn into_ihome(self) -> IHomeError {
        if self.is_timeout() {
            return IHomeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return IHomeError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return IHomeError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return IHomeError::Internal(format!("failed to decode HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => IHomeError::Auth(message),
                400..=499 => IHomeError::InvalidInput(message),
                _ => IHomeError::Network(message),
            };
        }

        IHomeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_ihome())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml / io → IHomeError */
/* -------------------------------------------------------------------------- */

impl IntoIHomeError for serde_json::Error {
    fn into_ihome(self) -> IHomeError {
        if self.is_io() {
            IHomeError::Storage(format!("JSON I/O failure: {self}"))
        } else {
            IHomeError::InvalidInput(format!("invalid JSON: {self}"))
        }
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_ihome())
    }
}

impl IntoIHomeError for toml::de::Error {
    fn into_ihome(self) -> IHomeError {
        IHomeError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_ihome())
    }
}

impl IntoIHomeError for std::io::Error {
    fn into_ihome(self) -> IHomeError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => IHomeError::Storage(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                IHomeError::Storage(format!("permission denied: {self}"))
            }
            ErrorKind::TimedOut => IHomeError::Network(format!("I/O timed out: {self}")),
            _ => IHomeError::Storage(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_ihome())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn io_not_found_maps_to_storage_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "session.json");
        let mapped: IHomeError = InfraError::from(err).into();
        match mapped {
            IHomeError::Storage(msg) => assert!(msg.contains("not found")),
            other => panic!("expected storage error, got {:?}", other),
        }
    }

    #[test]
    fn toml_error_maps_to_config_error() {
        let err = toml::from_str::<toml::Table>("api = [").unwrap_err();
        let mapped: IHomeError = InfraError::from(err).into();
        assert!(matches!(mapped, IHomeError::Config(msg) if msg.contains("TOML")));
    }

    #[test]
    fn json_syntax_error_maps_to_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: IHomeError = InfraError::from(err).into();
        assert!(matches!(mapped, IHomeError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: IHomeError = InfraError::from(error).into();
        match mapped {
            IHomeError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get("http://127.0.0.1:9").send().await.unwrap_err();

        let mapped: IHomeError = InfraError::from(error).into();
        assert!(matches!(mapped, IHomeError::Network(_)));
    }
}
