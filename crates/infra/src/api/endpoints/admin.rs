//! Administrator operations under `/admin`.

use ihome_domain::{Page, PageQuery};
use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

impl PortalApi {
    pub async fn dashboard(&self) -> Result<Value, ApiError> {
        self.value(ApiRequest::get("/admin/dashboard")).await
    }

    pub async fn admin_students(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/students", query).await
    }

    pub async fn admin_dormitories(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/dormitories", query).await
    }

    pub async fn admin_allocations(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/allocations", query).await
    }

    pub async fn admin_notifications(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/notifications", query).await
    }

    pub async fn admin_repairs(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/repairs", query).await
    }

    pub async fn admin_payments(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/payments", query).await
    }

    pub async fn admin_exchanges(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/admin/exchanges", query).await
    }

    // Students

    pub async fn create_student(&self, student: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/admin/students").json(student.clone())).await
    }

    pub async fn update_student_admin(&self, id: &str, student: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::put(format!("/admin/students/{id}")).json(student.clone())).await
    }

    pub async fn delete_student(&self, id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::delete(format!("/admin/students/{id}"))).await
    }

    pub async fn search_students(&self, keyword: Option<&str>) -> Result<Value, ApiError> {
        self.value(ApiRequest::get("/admin/students/search").query_opt("keyword", keyword)).await
    }

    // Dormitories

    pub async fn create_dormitory(&self, dormitory: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/admin/dormitories").json(dormitory.clone())).await
    }

    pub async fn update_dormitory(&self, id: &str, dormitory: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::put(format!("/admin/dormitories/{id}")).json(dormitory.clone()))
            .await
    }

    pub async fn delete_dormitory(&self, id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::delete(format!("/admin/dormitories/{id}"))).await
    }

    pub async fn search_beds_admin(&self, keyword: Option<&str>) -> Result<Value, ApiError> {
        self.value(ApiRequest::get("/admin/beds/search").query_opt("keyword", keyword)).await
    }

    // Exchanges

    pub async fn update_exchange_status(
        &self,
        id: u64,
        status: &str,
        review_comment: Option<&str>,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::put(format!("/admin/exchanges/{id}/status"))
            .query("status", status)
            .query_opt("reviewComment", review_comment);
        self.value(request).await
    }

    pub async fn delete_exchange(&self, id: u64) -> Result<Value, ApiError> {
        self.value(ApiRequest::delete(format!("/admin/exchanges/{id}"))).await
    }

    // Repairs

    pub async fn update_repair_status_admin(&self, id: u64, status: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::put(format!("/admin/repairs/{id}/status")).query("status", status))
            .await
    }

    pub async fn delete_repair(&self, id: u64) -> Result<Value, ApiError> {
        self.value(ApiRequest::delete(format!("/admin/repairs/{id}"))).await
    }

    // Allocations

    pub async fn allocate_student(&self, payload: &Value) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/admin/allocations").json(payload.clone())).await
    }

    pub async fn checkout_allocation(
        &self,
        allocation_id: u64,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        let request =
            ApiRequest::put(format!("/admin/allocations/{allocation_id}/checkout")).json(payload.clone());
        self.value(request).await
    }

    pub async fn delete_notification_admin(&self, notification_id: u64) -> Result<Value, ApiError> {
        self.value(ApiRequest::delete(format!("/admin/notifications/{notification_id}"))).await
    }
}
