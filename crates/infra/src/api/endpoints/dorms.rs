use ihome_domain::{Page, PageQuery};
use serde_json::Value;

use super::PortalApi;
use crate::api::errors::ApiError;
use crate::api::request::ApiRequest;

impl PortalApi {
    pub async fn list_dorms(&self, query: &PageQuery) -> Result<Page<Value>, ApiError> {
        self.page("/dorms", query).await
    }

    pub async fn list_beds(
        &self,
        dormitory_id: &str,
        query: &PageQuery,
    ) -> Result<Page<Value>, ApiError> {
        self.page(format!("/dorms/{dormitory_id}/beds"), query).await
    }

    pub async fn dormitory_detail(&self, dormitory_id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::get(format!("/dorms/{dormitory_id}/detail"))).await
    }

    pub async fn search_beds(&self, keyword: Option<&str>) -> Result<Value, ApiError> {
        self.value(ApiRequest::get("/beds/search").query_opt("keyword", keyword)).await
    }

    pub async fn choose_bed(&self, student_id: &str, bed_id: &str) -> Result<Value, ApiError> {
        let request = ApiRequest::post("/dorms/choose-bed")
            .query("studentId", student_id)
            .query("bedId", bed_id);
        self.value(request).await
    }

    pub async fn checkout(&self, student_id: &str) -> Result<Value, ApiError> {
        self.value(ApiRequest::post("/dorms/checkout").query("studentId", student_id)).await
    }
}

#[cfg(test)]
mod tests {
    use ihome_domain::PageQuery;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{page_body, portal};

    #[tokio::test]
    async fn test_list_dorms_decodes_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dorms"))
            .and(query_param("page", "1"))
            .and(query_param("size", "10"))
            .and(query_param("building", "A"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(json!([{"id": "d1"}, {"id": "d2"}]))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = portal(&server).await;
        let page = api.list_dorms(&PageQuery::new(1, 10).filter("building", "A")).await.unwrap();

        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content[1]["id"], "d2");
        assert!(page.last);
    }

    #[tokio::test]
    async fn test_search_beds_omits_absent_keyword() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/beds/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let api = portal(&server).await;
        api.search_beds(None).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_choose_bed_sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dorms/choose-bed"))
            .and(query_param("studentId", "s1"))
            .and(query_param("bedId", "b7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let api = portal(&server).await;
        assert_eq!(api.choose_bed("s1", "b7").await.unwrap(), json!("ok"));
    }
}
