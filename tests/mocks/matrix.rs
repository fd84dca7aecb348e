//! Mock matrix API server for testing
//!
//! Provides wiremock-based mocks for the one-to-many matrix endpoint:
//! - GET /one_to_many?json=...&costing=...&api_key=...

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// API key the mocks expect
pub const TEST_MATRIX_API_KEY: &str = "test-matrix-key";

/// Mock matrix API server wrapper
pub struct MockMatrixServer {
    server: MockServer,
}

impl MockMatrixServer {
    /// Start a new mock matrix server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Get all received requests (for assertion in tests)
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Mock a successful one-to-many response for the given costing
    pub async fn mock_one_to_many_success(&self, costing: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/one_to_many"))
            .and(query_param("costing", costing))
            .and(query_param("api_key", TEST_MATRIX_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock an error status from the matrix service
    pub async fn mock_one_to_many_error(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/one_to_many"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({
                    "error_code": 171,
                    "error": "No suitable edges near location",
                    "status_code": status,
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a 200 response whose body is not a matrix
    pub async fn mock_one_to_many_invalid_body(&self) {
        Mock::given(method("GET"))
            .and(path("/one_to_many"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&self.server)
            .await;
    }
}

/// Sample matrix payloads
pub struct MatrixTestData;

impl MatrixTestData {
    /// Origin plus two destinations, the last one unreachable
    pub fn one_to_many_response() -> Value {
        json!({
            "one_to_many": [[
                {"from_index": 0, "to_index": 0, "time": 0, "distance": 0.0},
                {"from_index": 0, "to_index": 1, "time": 1262, "distance": 1.478},
                {"from_index": 0, "to_index": 2, "time": null, "distance": null}
            ]],
            "units": "km",
            "id": "sample_matrix",
            "locations": [[
                {"lat": 40.744014, "lon": -73.990508},
                {"lat": 40.739735, "lon": -73.979713},
                {"lat": 40.752522, "lon": -73.985015}
            ]]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockMatrixServer::start().await;
        assert!(server.uri().starts_with("http://"));
        assert!(server.received_requests().await.is_empty());
    }

    #[test]
    fn test_sample_data_shape() {
        let body = MatrixTestData::one_to_many_response();
        assert_eq!(body["units"], "km");
        assert_eq!(body["one_to_many"][0].as_array().unwrap().len(), 3);
    }
}
