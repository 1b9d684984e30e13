use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

impl PortalApi {
    pub async fn get_student(&self, id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/students/{id}"))).await
    }

    pub async fn get_student_admin(&self, id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/admin/students/{id}"))).await
    }

    pub async fn update_student(&self, id: &str, payload: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::put(format!("/students/{id}")).json(payload.clone())).await
    }

    pub async fn current_allocation(&self, student_id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/students/{student_id}/current-allocation"))).await
    }

    pub async fn allocation_history(&self, student_id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/students/{student_id}/allocations"))).await
    }

    pub async fn student_notifications(&self, student_id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/students/{student_id}/notifications"))).await
    }

    /// Notifications for whoever the access token belongs to.
    pub async fn my_notifications(&self) -> Result<Value, ApiError> {
        self.value(ApiRequest::get("/notifications/my-notifications")).await
    }

    pub async fn submit_questionnaire(&self, payload: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/questionnaire/submit").json(payload.clone())).await
    }

    pub async fn get_questionnaire(&self, student_id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/questionnaire/student/{student_id}"))).await
    }
}
