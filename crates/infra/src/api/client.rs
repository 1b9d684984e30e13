//! Authenticated API client
//!
//! Every call goes through [`ApiClient::execute`]:
//! 1. Attach `Authorization: Bearer <token>` when a session exists
//! 2. Classify the response (business success/failure, 401, transport)
//! 3. On a first 401, join the refresh protocol run by [`RefreshCoordinator`]
//! 4. Replay with the new token, at most once per request
//!
//! The refresh runs in its own task, so a caller that gives up does not
//! strand the requests parked behind it. Parked requests are replayed one at
//! a time in the order they failed.
//!
//! If the refresh fails the session is cleared, every parked caller gets
//! [`ApiError::SessionExpired`], and the user is told once and sent to the
//! login route.

use std::sync::Arc;
use std::time::Duration;

use ihome_common::{Navigator, Notifier, SessionManager, TokenPair};
use ihome_domain::constants::{MSG_NETWORK_ERROR, MSG_REQUEST_FAILED, MSG_SESSION_EXPIRED};
use ihome_domain::{ApiConfig, ApiEnvelope, IHomeError};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::errors::{ApiError, ApiErrorCategory};
use super::refresh::{Admission, PendingRequest, RefreshCoordinator, SessionPhase};
use super::request::ApiRequest;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Configuration for the authenticated API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Per-request timeout, refresh included
    pub timeout: Duration,
    pub refresh_path: String,
    /// Route handed to the navigator when the session expires
    pub login_route: String,
    pub user_agent: Option<String>,
}

impl From<&ApiConfig> for ApiClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            refresh_path: config.refresh_path.clone(),
            login_route: config.login_route.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

struct ClientInner {
    http: HttpClient,
    config: ApiClientConfig,
    session: Arc<SessionManager>,
    coordinator: RefreshCoordinator,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

/// Authenticated client for the portal backend.
///
/// Cheap to clone; clones share the session, the refresh coordinator and
/// the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the base URL is empty or the HTTP
    /// client cannot be built
    pub fn new(
        config: ApiClientConfig,
        session: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::Config("base_url must not be empty".into()));
        }

        let mut builder = HttpClient::builder()
            .timeout(config.timeout)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder.build().map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                session,
                coordinator: RefreshCoordinator::default(),
                notifier,
                navigator,
            }),
        })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.inner.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.coordinator.phase()
    }

    /// Requests parked behind the refresh in flight.
    pub fn queued(&self) -> usize {
        self.inner.coordinator.queued()
    }

    pub(crate) fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    /* ------------------------------------------------------------------ */
    /* Public request surface */
    /* ------------------------------------------------------------------ */

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let pairs = query.iter().map(|(k, v)| ((*k).to_string(), v.clone()));
        self.execute(ApiRequest::get(path).query_pairs(pairs)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::post(path).json(encode_body(body)?)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::put(path).json(encode_body(body)?)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::delete(path)).await
    }

    /// Send `request` and decode the envelope `data` into `T`.
    ///
    /// # Errors
    /// Any failure described by [`ApiError`]; refresh mechanics are never
    /// visible beyond the final outcome
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let data = self.dispatch(request).await?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /* ------------------------------------------------------------------ */
    /* Refresh protocol */
    /* ------------------------------------------------------------------ */

    pub(crate) async fn dispatch(&self, request: ApiRequest) -> Result<Value, ApiError> {
        match self.send_once(&request, true).await {
            Ok(data) => Ok(data),
            Err(ApiError::Unauthorized(_)) if !request.retried => self.recover(request).await,
            Err(err) => Err(self.report(err)),
        }
    }

    async fn recover(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let receiver = match self.inner.coordinator.admit(request) {
            Admission::Queued(receiver) => {
                debug!("Request parked behind in-flight token refresh");
                receiver
            }
            Admission::Lead(request) => {
                debug!(request = %request.describe(), "Authorization failed, refreshing session");
                let (reply, receiver) = oneshot::channel();
                let client = self.clone();
                // Detached: the cycle settles even if this caller is dropped.
                tokio::spawn(client.run_refresh(PendingRequest { request, reply }));
                receiver
            }
        };
        receiver.await.unwrap_or(Err(ApiError::Cancelled))
    }

    /// One refresh cycle: refresh, settle, then answer the leader and every
    /// parked request.
    async fn run_refresh(self, leader: PendingRequest) {
        let stored = match self.refresh_session().await {
            Ok(stored) => stored,
            Err(err) => {
                let err = self.expire_session(err).await;
                leader.resolve(Err(err));
                return;
            }
        };

        let settled = self.inner.coordinator.settle(stored);
        let queued = settled.pending.len();
        let parked = std::iter::once(leader).chain(settled.pending);

        if settled.phase != SessionPhase::Valid {
            info!("Logged out during token refresh, rejecting parked requests");
            for request in parked {
                request.resolve(Err(ApiError::SessionExpired));
            }
            return;
        }

        info!(queued, "Session refreshed, replaying requests");
        // Sequential, so the backend sees replays in admission order.
        for request in parked {
            if request.is_abandoned() {
                debug!(request = %request.request.describe(), "Caller gone, replay skipped");
                continue;
            }
            let result = self.replay(request.request.clone()).await;
            request.resolve(result);
        }
    }

    /// Send a request that has already been through a refresh.
    async fn replay(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        request.retried = true;
        self.send_once(&request, true).await.map_err(|err| self.report(err))
    }

    /// Exchange the persisted refresh token for a new pair.
    ///
    /// Returns `false` when a logout arrived meanwhile and the pair was
    /// dropped instead of stored.
    async fn refresh_session(&self) -> Result<bool, ApiError> {
        let Some(refresh_token) = self.inner.session.refresh_token().await else {
            return Err(ApiError::NoRefreshToken);
        };

        let request = ApiRequest::post(self.inner.config.refresh_path.clone())
            .json(json!({ "refreshToken": refresh_token }));
        let timeout = self.inner.config.timeout;

        let data = tokio::time::timeout(timeout, self.send_once(&request, false))
            .await
            .map_err(|_| ApiError::Timeout(timeout))??;

        let pair: TokenPair = serde_json::from_value(data)
            .map_err(|e| ApiError::Decode(format!("refresh response: {e}")))?;
        let coordinator = &self.inner.coordinator;
        let stored = self
            .inner
            .session
            .store_credentials_unless(pair.into(), || coordinator.logout_requested())
            .await?;
        Ok(stored)
    }

    /// Tear the session down after a failed refresh.
    ///
    /// Returns the error for the leading caller.
    async fn expire_session(&self, cause: ApiError) -> ApiError {
        warn!(error = %cause, "Token refresh failed, ending session");

        // Cleared before waiters wake so none of them sees stale credentials.
        if let Err(err) = self.inner.session.clear().await {
            warn!(error = %err, "Failed to clear persisted session");
        }

        // An explicit logout already took the user out; nothing to announce.
        let announce = !self.inner.coordinator.logout_requested();
        let settled = self.inner.coordinator.settle(false);
        for parked in settled.pending {
            parked.resolve(Err(ApiError::SessionExpired));
        }

        if announce {
            self.inner.notifier.error(MSG_SESSION_EXPIRED);
            self.inner.navigator.redirect(&self.inner.config.login_route);
        }

        match cause {
            ApiError::NoRefreshToken => ApiError::NoRefreshToken,
            _ => ApiError::SessionExpired,
        }
    }

    /// Notify the user about a terminal failure and hand it back.
    fn report(&self, err: ApiError) -> ApiError {
        let notify = match err.category() {
            ApiErrorCategory::Business | ApiErrorCategory::Transport => true,
            ApiErrorCategory::Authentication => !err.is_session_terminal(),
            ApiErrorCategory::Local => false,
        };
        if notify {
            self.inner.notifier.error(&err.user_message());
        }
        err
    }

    /* ------------------------------------------------------------------ */
    /* Transport */
    /* ------------------------------------------------------------------ */

    pub(crate) async fn send_once(
        &self,
        request: &ApiRequest,
        authenticate: bool,
    ) -> Result<Value, ApiError> {
        let url = join_url(&self.inner.config.base_url, &request.path);
        let mut builder = self.inner.http.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if authenticate {
            if let Some(token) = self.inner.session.access_token().await {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = self.inner.http.send(builder).await.map_err(|err| {
            if err.is_timeout() {
                ApiError::Timeout(self.inner.http.timeout())
            } else {
                let infra: InfraError = err.into();
                ApiError::from(IHomeError::from(infra))
            }
        })?;

        classify_response(response).await
    }
}

/// Classify a backend response into a payload or an [`ApiError`].
///
/// # Errors
/// See [`classify`]; a body that cannot be read is a `Network` error
pub async fn classify_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("failed to read response body: {e}")))?;
    classify(status, &body)
}

/// Pure classification of a status code and raw body.
///
/// - 2xx with envelope `code == 0` (or no `code`): the envelope `data`, the
///   whole body for non-envelope JSON, `null` for an empty body
/// - 2xx with `code != 0`: [`ApiError::Business`]
/// - 401: [`ApiError::Unauthorized`]
/// - other non-2xx: mapped by [`ApiError::from_status`] with the envelope
///   message, else the body text, else the status reason
pub fn classify(status: StatusCode, body: &[u8]) -> Result<Value, ApiError> {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();

    if status.is_success() {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        let Some(value) = parsed else {
            return Ok(Value::String(String::from_utf8_lossy(body).into_owned()));
        };

        let is_envelope = value.as_object().is_some_and(|o| o.contains_key("code"));
        if !is_envelope {
            return Ok(value);
        }

        let envelope: ApiEnvelope = serde_json::from_value(value)
            .map_err(|e| ApiError::Decode(format!("malformed response envelope: {e}")))?;
        if envelope.is_business_failure() {
            return Err(ApiError::Business {
                code: envelope.code.unwrap_or_default(),
                message: envelope.message().unwrap_or(MSG_REQUEST_FAILED).to_string(),
            });
        }
        return Ok(envelope.data.unwrap_or(Value::Null));
    }

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            (!text.is_empty() && parsed.is_none()).then(|| text.to_string())
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| MSG_NETWORK_ERROR.to_string());

    Err(ApiError::from_status(status.as_u16(), message))
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body: {e}")))
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
