//! Notification inbox and broadcast operations.

use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

/// Addressee of a notification (`receiverId` / `receiverType`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReceiver {
    pub id: String,
    /// `student`, `admin` or `system`
    pub receiver_type: String,
}

impl NotificationReceiver {
    pub fn new(id: impl Into<String>, receiver_type: impl Into<String>) -> Self {
        Self { id: id.into(), receiver_type: receiver_type.into() }
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request.query("receiverId", &self.id).query("receiverType", &self.receiver_type)
    }
}

impl PortalApi {
    pub async fn notifications(&self, receiver: &NotificationReceiver) -> Result<Value, ApiError> {
        self.value(receiver.apply(ApiRequest::get("/notifications/list"))).await
    }

    pub async fn unread_notifications(
        &self,
        receiver: &NotificationReceiver,
    ) -> Result<Value, ApiError> {
        self.value(receiver.apply(ApiRequest::get("/notifications/unread"))).await
    }

    pub async fn unread_count(&self, receiver: &NotificationReceiver) -> Result<u64, ApiError> {
        self.client.execute(receiver.apply(ApiRequest::get("/notifications/unread-count"))).await
    }

    pub async fn mark_as_read(
        &self,
        notification_id: u64,
        receiver: &NotificationReceiver,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::post(format!("/notifications/{notification_id}/read"));
        self.value(receiver.apply(request)).await
    }

    pub async fn mark_all_as_read(&self, receiver: &NotificationReceiver) -> Result<Value, ApiError> {
        self.value(receiver.apply(ApiRequest::put("/notifications/mark-all-read"))).await
    }

    /// Delete one notification; the backend checks it belongs to `receiver`.
    pub async fn delete_notification(
        &self,
        notification_id: u64,
        receiver: &NotificationReceiver,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::delete(format!("/notifications/{notification_id}"));
        self.value(receiver.apply(request)).await
    }

    pub async fn create_notification(&self, notification: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/notifications/create").json(notification.clone())).await
    }

    pub async fn send_system_notification(&self, request: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/notifications/send-system").json(request.clone())).await
    }

    pub async fn clean_expired_notifications(&self) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/notifications/clean-expired")).await
    }
}
