//! Binding for the `api/_search/locations/:id` endpoint.

use std::sync::Arc;

use url::Url;

use crate::config::{SearchClientConfig, parse_base_url};
use crate::errors::LocationSearchError;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{LocationRecord, SearchQuery};

/// Path of the search endpoint relative to the application root.
pub const LOCATIONS_SEARCH_PATH: &str = "api/_search/locations";

/// Client for the location search endpoint.
///
/// Stateless apart from the base URL and the injected transport, so one
/// instance can be cloned and shared freely between tasks.
#[derive(Debug, Clone)]
pub struct LocationSearchClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
}

impl LocationSearchClient {
    /// Creates a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::InvalidUrl` - If `base_url` is not a valid
    ///   absolute URL
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
    ) -> Result<Self, LocationSearchError> {
        let base = parse_base_url(base_url)?;
        let endpoint =
            base.join(LOCATIONS_SEARCH_PATH)
                .map_err(|e| LocationSearchError::InvalidUrl {
                    url: base.to_string(),
                    reason: e.to_string(),
                })?;

        Ok(Self {
            transport,
            endpoint,
        })
    }

    /// Creates a client with a `reqwest` transport built from `config`.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::InvalidUrl` - If the configured base URL is invalid
    /// - `LocationSearchError::Transport` - If the HTTP client cannot be built
    pub fn from_config(config: &SearchClientConfig) -> Result<Self, LocationSearchError> {
        let transport = ReqwestTransport::new(config)?;
        Self::new(Arc::new(transport), &config.base_url)
    }

    /// Endpoint URL without id or query string.
    pub fn base_url(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the URL `query` would request.
    ///
    /// The id, when present, becomes exactly one percent-encoded path segment.
    /// An empty id is treated as absent.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::InvalidUrl` - If the id is `.` or `..`, which
    ///   URL normalisation would collapse, or the endpoint cannot take extra
    ///   path segments
    pub fn endpoint_url(&self, query: &SearchQuery) -> Result<Url, LocationSearchError> {
        let mut url = self.endpoint.clone();

        if let Some(id) = query.id().filter(|id| !id.is_empty()) {
            if id == "." || id == ".." {
                return Err(LocationSearchError::InvalidUrl {
                    url: format!("{}/{}", self.endpoint, id),
                    reason: format!("id '{id}' is a dot segment"),
                });
            }

            url.path_segments_mut()
                .map_err(|()| LocationSearchError::InvalidUrl {
                    url: self.endpoint.to_string(),
                    reason: "URL cannot carry path segments".to_string(),
                })?
                .pop_if_empty()
                .push(id);
        }

        if !query.params().is_empty() {
            url.query_pairs_mut().extend_pairs(query.params());
        }

        Ok(url)
    }

    /// Runs a search and returns the records in server order.
    ///
    /// # Errors
    ///
    /// - `LocationSearchError::Transport` - If the server could not be reached
    /// - `LocationSearchError::HttpStatus` - If the server answered with a
    ///   non-2xx status
    /// - `LocationSearchError::Deserialization` - If the body is not a JSON array
    /// - `LocationSearchError::InvalidUrl` - If the request URL cannot be built
    pub async fn query(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<LocationRecord>, LocationSearchError> {
        let url = self.endpoint_url(query)?;
        tracing::debug!("Location search request: GET {}", url);

        let response = match self.transport.get(url.clone()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Location search to {} failed: {}", url, e);
                return Err(e);
            }
        };

        if !response.status.is_success() {
            tracing::warn!("Location search to {} returned {}", url, response.status);
            return Err(LocationSearchError::HttpStatus {
                status: response.status,
                url: url.to_string(),
            });
        }

        let records: Vec<LocationRecord> =
            serde_json::from_slice(&response.body).map_err(|e| {
                tracing::warn!("Location search response from {} is not an array: {}", url, e);
                LocationSearchError::from(e)
            })?;

        tracing::debug!("Location search returned {} records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;
    use proptest::prelude::*;
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::transport::HttpResponse;

    /// Transport returning one canned response and recording requested URLs.
    #[derive(Debug)]
    struct MockTransport {
        response: Result<(StatusCode, String), String>,
        requests: Mutex<Vec<Url>>,
    }

    impl MockTransport {
        fn respond(status: StatusCode, body: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                response: Ok((status, body.into())),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                response: Err("connection refused".to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(Url::to_string)
                .collect()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, url: Url) -> Result<HttpResponse, LocationSearchError> {
            self.requests.lock().unwrap().push(url);
            match &self.response {
                Ok((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: Bytes::from(body.clone()),
                }),
                Err(reason) => Err(LocationSearchError::Transport {
                    reason: reason.clone(),
                }),
            }
        }
    }

    fn client_with(transport: Arc<MockTransport>) -> LocationSearchClient {
        LocationSearchClient::new(transport, "http://bench.example.com/").unwrap()
    }

    #[test]
    fn test_endpoint_url_without_id() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "[]"));
        let url = client.endpoint_url(&SearchQuery::new()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://bench.example.com/api/_search/locations"
        );
    }

    #[test]
    fn test_endpoint_url_with_id_and_params() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "[]"));
        let query = SearchQuery::new()
            .with_id("42")
            .with_param("q", "new york")
            .with_param("lang", "en");

        let url = client.endpoint_url(&query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://bench.example.com/api/_search/locations/42?q=new+york&lang=en"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_id_as_single_segment() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "[]"));
        let url = client
            .endpoint_url(&SearchQuery::new().with_id("a/b c"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://bench.example.com/api/_search/locations/a%2Fb%20c"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_dot_segment_ids() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "[]"));

        for id in [".", ".."] {
            let result = client.endpoint_url(&SearchQuery::new().with_id(id));
            assert!(
                matches!(result, Err(LocationSearchError::InvalidUrl { .. })),
                "id {id:?} should be rejected, got {result:?}"
            );
        }

        // Dots inside a longer id stay literal
        let url = client
            .endpoint_url(&SearchQuery::new().with_id("..."))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://bench.example.com/api/_search/locations/..."
        );
    }

    #[test]
    fn test_endpoint_url_empty_id_is_absent() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "[]"));
        let url = client
            .endpoint_url(&SearchQuery::new().with_id(""))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://bench.example.com/api/_search/locations"
        );
    }

    #[tokio::test]
    async fn test_dot_segment_id_never_reaches_transport() {
        let transport = MockTransport::respond(StatusCode::OK, r#"[{"id":1}]"#);
        let client = client_with(transport.clone());

        let err = client
            .query(&SearchQuery::new().with_id(".."))
            .await
            .unwrap_err();

        assert!(err.is_user_error());
        assert!(transport.requested().is_empty());
    }

    #[test]
    fn test_base_url_under_context_path() {
        let client = LocationSearchClient::new(
            MockTransport::respond(StatusCode::OK, "[]"),
            "https://portal.example.com/bench",
        )
        .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://portal.example.com/bench/api/_search/locations"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result =
            LocationSearchClient::new(MockTransport::respond(StatusCode::OK, "[]"), "bench");
        assert!(matches!(
            result,
            Err(LocationSearchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_returns_records_in_order() {
        let transport = MockTransport::respond(
            StatusCode::OK,
            r#"[{"id":3,"name":"Lyon"},{"id":1,"name":"Paris"},{"id":2,"name":"Nice"}]"#,
        );
        let client = client_with(transport.clone());

        let records = client
            .query(&SearchQuery::new().with_query("country:FR"))
            .await
            .unwrap();

        let ids: Vec<_> = records.iter().filter_map(LocationRecord::id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(
            transport.requested(),
            vec!["http://bench.example.com/api/_search/locations?query=country%3AFR"]
        );
    }

    #[tokio::test]
    async fn test_query_paris_example() {
        let transport = MockTransport::respond(StatusCode::OK, r#"[{"id":1,"name":"Paris"}]"#);
        let client = client_with(transport);

        let records = client
            .query(&SearchQuery::new().with_param("q", "paris"))
            .await
            .unwrap();

        assert_eq!(records, vec![LocationRecord::new(json!({"id": 1, "name": "Paris"}))]);
    }

    #[tokio::test]
    async fn test_empty_array_is_not_an_error() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "[]"));
        let records = client.query(&SearchQuery::new()).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_http_status_error() {
        let client = client_with(MockTransport::respond(StatusCode::NOT_FOUND, ""));
        let err = client
            .query(&SearchQuery::new().with_id("42"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        match err {
            LocationSearchError::HttpStatus { url, .. } => {
                assert_eq!(url, "http://bench.example.com/api/_search/locations/42");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_body_is_not_parsed_for_failed_status() {
        let client = client_with(MockTransport::respond(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"[{"id":1}]"#,
        ));
        let err = client.query(&SearchQuery::new()).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_object_body_is_deserialization_error() {
        let client = client_with(MockTransport::respond(
            StatusCode::OK,
            r#"{"id":1,"name":"Paris"}"#,
        ));
        let err = client.query(&SearchQuery::new()).await.unwrap_err();
        assert!(matches!(err, LocationSearchError::Deserialization { .. }));
    }

    #[tokio::test]
    async fn test_garbage_body_is_deserialization_error() {
        let client = client_with(MockTransport::respond(StatusCode::OK, "<html>oops</html>"));
        let err = client.query(&SearchQuery::new()).await.unwrap_err();
        assert!(matches!(err, LocationSearchError::Deserialization { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = client_with(MockTransport::unreachable());
        let err = client.query(&SearchQuery::new()).await.unwrap_err();
        assert!(matches!(err, LocationSearchError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    proptest! {
        #[test]
        fn prop_query_preserves_count_and_order(ids in proptest::collection::vec(any::<i64>(), 0..64)) {
            let body = serde_json::to_string(
                &ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()
            ).unwrap();
            let client = client_with(MockTransport::respond(StatusCode::OK, body));

            let records = tokio_test::block_on(client.query(&SearchQuery::new())).unwrap();

            prop_assert_eq!(records.len(), ids.len());
            let returned: Vec<i64> = records.iter().filter_map(LocationRecord::id).collect();
            prop_assert_eq!(returned, ids);
        }
    }
}
