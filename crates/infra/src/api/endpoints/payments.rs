use ihome_domain::{Page, PageQuery};
use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

impl PortalApi {
    pub async fn create_payment(&self, payload: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/payments").json(payload.clone())).await
    }

    pub async fn student_payments(
        &self,
        student_id: &str,
        query: &PageQuery,
    ) -> Result<Page<Value>, ApiError> {
        self.page(format!("/payments/student/{student_id}"), query).await
    }

    pub async fn list_payments(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/payments", query).await
    }

    pub async fn update_payment_status(&self, id: &str, status: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::put(format!("/payments/{id}/status")).query("status", status)).await
    }
}
