//! HTTP client for the disposal-fee search backend

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{HealthResponse, LocationDirectory, SearchQuery, SearchResponse, SearchResultItem};

/// Client for the FastAPI search backend.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("bulkwaste/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Exactly one trailing slash, so joins append instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check if backend is healthy
    pub async fn health_check(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.endpoint("")?).send().await?;
        decode("health", response).await
    }

    /// Fetch the province/city hierarchy
    pub async fn locations(&self) -> Result<LocationDirectory, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/locations")?)
            .send()
            .await?;
        decode("locations", response).await
    }

    /// Rank fee entries against a free-text query.
    ///
    /// Filters travel as query-string parameters and are omitted when unset.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResultItem>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("api/search")?)
            .query(&query.params())
            .send()
            .await?;
        let body: SearchResponse = decode("search", response).await?;
        Ok(body.results)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &'static str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status { endpoint, status });
    }
    Ok(response.json().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> BackendClient {
        BackendClient::new(base_url, Duration::from_secs(5)).expect("client construction should not fail")
    }

    #[tokio::test]
    async fn test_locations_are_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sido": ["서울"],
                "sigungu": { "서울": ["강남구", "종로구"] }
            })))
            .mount(&server)
            .await;

        let dir = test_client(&server.uri()).locations().await.expect("should parse");
        assert_eq!(dir.sido, vec!["서울"]);
        assert_eq!(dir.cities_of("서울"), ["강남구", "종로구"]);
    }

    #[tokio::test]
    async fn test_locations_non_2xx_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/locations"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).locations().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { endpoint: "locations", .. }));
    }

    #[tokio::test]
    async fn test_search_without_filters_omits_region_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("query", "소파"))
            .and(query_param_is_missing("sido"))
            .and(query_param_is_missing("sigungu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "name": "소파",
                    "category": "가구",
                    "spec": "3인용",
                    "fee": 15000,
                    "similarity": 0.92,
                    "sido": "서울",
                    "sigungu": "강남구"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = test_client(&server.uri())
            .search(&SearchQuery::new("소파", "", ""))
            .await
            .expect("should parse results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].fee, 15000);
        assert_eq!(results[0].spec(), Some("3인용"));
    }

    #[tokio::test]
    async fn test_search_forwards_region_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("query", "냉장고"))
            .and(query_param("sido", "서울"))
            .and(query_param("sigungu", "종로구"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let results = test_client(&server.uri())
            .search(&SearchQuery::new("냉장고", "서울", "종로구"))
            .await
            .expect("should parse results");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .search(&SearchQuery::new("소파", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { endpoint: "search", .. }));
    }

    #[tokio::test]
    async fn test_search_malformed_body_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .search(&SearchQuery::new("소파", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "message": "Waste Disposal API is running"
            })))
            .mount(&server)
            .await;

        let health = test_client(&server.uri()).health_check().await.expect("healthy");
        assert_eq!(health.status, "ok");
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = test_client("http://localhost:8000/waste");
        assert_eq!(
            client.endpoint("api/search").unwrap().as_str(),
            "http://localhost:8000/waste/api/search"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = BackendClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }
}
