use ihome_domain::{Page, PageQuery};
use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

impl PortalApi {
    pub async fn create_repair(&self, payload: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/repairs").json(payload.clone())).await
    }

    pub async fn student_repairs(
        &self,
        student_id: &str,
        query: &PageQuery,
    ) -> Result<Page<Value>, ApiError> {
        self.page(format!("/repairs/student/{student_id}"), query).await
    }

    pub async fn list_repairs(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/repairs", query).await
    }

    pub async fn update_repair_status(&self, id: &str, status: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::put(format!("/repairs/{id}/status")).query("status", status)).await
    }
}
