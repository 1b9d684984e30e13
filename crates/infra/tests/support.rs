#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use ihome_common::testing::{MockSessionStorage, RecordingNavigator, RecordingNotifier};
use ihome_common::{Credentials, SessionManager};
use ihome_infra::{ApiClient, ApiClientConfig, PortalApi};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API client wired to in-memory collaborators that tests can inspect.
pub struct Harness {
    pub client: ApiClient,
    pub session: Arc<SessionManager>,
    pub storage: Arc<MockSessionStorage>,
    pub notifier: RecordingNotifier,
    pub navigator: RecordingNavigator,
}

impl Harness {
    /// Signed-in harness holding `T1` / `R1`.
    pub async fn signed_in(server: &MockServer) -> Self {
        Self::with_credentials(server, Credentials::new("T1", Some("R1".to_string())), 2_000).await
    }

    pub async fn with_credentials(
        server: &MockServer,
        credentials: Credentials,
        timeout_ms: u64,
    ) -> Self {
        let storage = Arc::new(MockSessionStorage::new());
        let session = Arc::new(SessionManager::new(storage.clone()));
        session.store_credentials(credentials).await.expect("seed credentials");

        let notifier = RecordingNotifier::new();
        let navigator = RecordingNavigator::new();
        let config = ApiClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(timeout_ms),
            ..ApiClientConfig::default()
        };
        let client = ApiClient::new(
            config,
            session.clone(),
            Arc::new(notifier.clone()),
            Arc::new(navigator.clone()),
        )
        .expect("api client should build");

        Self { client, session, storage, notifier, navigator }
    }

    pub fn portal(&self) -> PortalApi {
        PortalApi::new(self.client.clone())
    }
}

/// `GET {route}` answers 401 to `T1` and echoes the route to `T2`.
pub async fn mount_expiring_resource(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer T2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": {"route": route}})),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Refresh endpoint that issues `T2` / `R2` after `delay`.
pub async fn mount_refresh_success(server: &MockServer, delay: Duration) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "code": 0,
                    "message": "success",
                    "data": {
                        "accessToken": "T2",
                        "refreshToken": "R2",
                        "tokenType": "Bearer",
                        "expiresIn": 3600
                    }
                }))
                .set_delay(delay),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_refresh_response(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

pub fn route_of(value: &Value) -> &str {
    value["route"].as_str().unwrap_or_default()
}

/// Poll `condition` until it holds; fails the test after five seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
