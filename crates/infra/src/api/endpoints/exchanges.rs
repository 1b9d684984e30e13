//! Notices and dormitory exchange ("switch") requests.

use ihome_domain::{Page, PageQuery};
use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

impl PortalApi {
    pub async fn list_notices(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/notices", query).await
    }

    pub async fn get_notice(&self, id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/notices/{id}"))).await
    }

    pub async fn create_switch(&self, payload: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/switches/apply").json(payload.clone())).await
    }

    pub async fn list_my_switches(
        &self,
        student_id: &str,
        query: &PageQuery,
    ) -> Result<Page<Value>, ApiError> {
        let request = ApiRequest::get("/switches/my-requests")
            .query_pairs(query.to_pairs())
            .query("studentId", student_id);
        self.client.execute(request).await
    }
}
