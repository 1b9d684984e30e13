//! Portal endpoint catalog
//!
//! [`PortalApi`] exposes one function per backend operation. Every call goes
//! through the shared [`ApiClient`], so all of them take part in token
//! refresh and error reporting.

mod admin;
mod dorms;
mod exchanges;
mod notifications;
mod payments;
mod repairs;
mod students;

use ihome_domain::{Page, PageQuery, UserIdentity};
use serde_json::Value;

pub use self::notifications::NotificationReceiver;
use super::client::ApiClient;
use super::errors::ApiError;
use super::request::ApiRequest;

/// Typed facade over the portal REST API.
#[derive(Clone)]
pub struct PortalApi {
    client: ApiClient,
}

impl PortalApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn value(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.client.execute(request).await
    }

    async fn page(&self, path: impl Into<String>, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.client.execute(ApiRequest::get(path).query_pairs(query.to_pairs())).await
    }
}

impl NotificationReceiver {
    /// Receiver matching the signed-in principal.
    pub fn for_user(user: &UserIdentity) -> Self {
        Self::new(user.id.clone(), user.user_type.to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use ihome_common::testing::{MockSessionStorage, RecordingNavigator, RecordingNotifier};
    use ihome_common::{Credentials, SessionManager};
    use wiremock::MockServer;

    use super::PortalApi;
    use crate::api::client::{ApiClient, ApiClientConfig};

    pub(crate) async fn portal(server: &MockServer) -> PortalApi {
        let session = Arc::new(SessionManager::new(Arc::new(MockSessionStorage::new())));
        session.store_credentials(Credentials::new("T1", Some("R1".into()))).await.unwrap();
        let config = ApiClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(2),
            ..ApiClientConfig::default()
        };
        let client = ApiClient::new(
            config,
            session,
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingNavigator::new()),
        )
        .unwrap();
        PortalApi::new(client)
    }

    pub(crate) fn page_body(content: serde_json::Value) -> serde_json::Value {
        let total = content.as_array().map_or(0, Vec::len);
        serde_json::json!({
            "code": 0,
            "message": "success",
            "data": {
                "content": content,
                "totalElements": total,
                "totalPages": 1,
                "size": 10,
                "number": 0,
                "first": true,
                "last": true
            }
        })
    }
}
