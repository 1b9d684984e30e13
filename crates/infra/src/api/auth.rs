//! Login, logout and registration
//!
//! These calls move the refresh coordinator between `LoggedOut` and `Valid`
//! and keep the persisted session in step.

use ihome_common::Credentials;
use ihome_domain::{UserIdentity, UserType};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::ApiRequest;

const STUDENT_REGISTER_PATH: &str = "/students/register";

impl ApiClient {
    /// Authenticate and persist the resulting session.
    ///
    /// The login call never triggers a token refresh: a 401 here means the
    /// credentials were rejected.
    ///
    /// # Errors
    /// - `ApiError::Business` when the backend rejects the credentials
    /// - `ApiError::Decode` when `accessToken` or `userInfo` is missing
    /// - `ApiError::Storage` when the session cannot be persisted
    pub async fn login(
        &self,
        user_type: UserType,
        id: &str,
        password: &str,
    ) -> Result<UserIdentity, ApiError> {
        let mut request =
            ApiRequest::post(user_type.login_path()).json(json!({ "id": id, "password": password }));
        request.retried = true;

        let data = self.dispatch(request).await?;

        let access_token = data
            .get("accessToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Decode("login response is missing accessToken".into()))?;
        let refresh_token = data.get("refreshToken").and_then(Value::as_str).map(str::to_string);
        let user_info = data
            .get("userInfo")
            .ok_or_else(|| ApiError::Decode("login response is missing userInfo".into()))?;
        let user = UserIdentity::from_user_info(user_info, user_type)
            .ok_or_else(|| ApiError::Decode("login response userInfo has no id".into()))?;

        self.session()
            .establish(Credentials::new(access_token, refresh_token), user.clone())
            .await?;
        self.coordinator().mark_valid();

        info!(user_id = %user.id, user_type = %user_type, "Logged in");
        Ok(user)
    }

    /// Drop the session locally.
    ///
    /// # Errors
    /// Returns `ApiError::Storage` if the persisted session could not be
    /// removed; the in-memory session is gone regardless
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.coordinator().mark_logged_out();
        let result = self.session().clear().await;
        match &result {
            Ok(()) => info!("Logged out"),
            Err(err) => {
                warn!(error = %err, "Logout could not clear persisted session");
                self.notifier().error(&format!("Logout incomplete: {err}"));
            }
        }
        result.map_err(ApiError::from)
    }

    /// Create a student account. Does not sign the student in.
    ///
    /// # Errors
    /// Any [`ApiError`] from the registration call
    pub async fn register_student(&self, payload: &Value) -> Result<Value, ApiError> {
        self.post(STUDENT_REGISTER_PATH, payload).await
    }
}
