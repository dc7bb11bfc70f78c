//! reqwest-backed HTTP client.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{HttpClientConfig, HttpClientError, HttpTransport, Response, Result};

/// HTTP client performing single-attempt JSON POSTs.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: Arc<HttpClientConfig>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| HttpClientError::RequestBuild(e.to_string()))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(HttpClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn map_send_error(&self, err: reqwest::Error) -> HttpClientError {
        if err.is_timeout() {
            HttpClientError::Timeout(self.config.timeout)
        } else if err.is_connect() {
            HttpClientError::Connection(err.to_string())
        } else if err.is_builder() {
            HttpClientError::RequestBuild(err.to_string())
        } else {
            HttpClientError::Http(err)
        }
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<Response> {
        let mut request = self.inner.post(url);
        for (name, value) in self.config.default_headers.iter().chain(headers) {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!(url = %url, "Sending POST request");

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        debug!(url = %url, status = %response.status(), "Received response");

        Response::from_reqwest(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_json_sends_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(header("Authorization", "key=abc"))
            .and(header("X-Default", "yes"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"to": "token"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"success\":1}"))
            .expect(1)
            .mount(&server)
            .await;

        let config = HttpClientConfig::builder()
            .default_header("X-Default", "yes")
            .build();
        let client = HttpClient::new(config).unwrap();

        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), "key=abc".to_string()),
        ];
        let response = client
            .post_json(
                &format!("{}/send", server.uri()),
                &headers,
                &json!({"to": "token"}),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text(), "{\"success\":1}");
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = HttpClient::default_client().unwrap();
        let response = client
            .post_json(&server.uri(), &[], &json!({}))
            .await
            .unwrap();

        assert!(response.is_server_error());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = HttpClient::default_client().unwrap();
        let err = client
            .post_json("http://127.0.0.1:1/send", &[], &json!({}))
            .await
            .unwrap_err();

        assert!(err.is_connection());
        assert_eq!(err.code(), "connect");
    }
}
