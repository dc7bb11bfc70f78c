//! Message sender.

use firecast_http_client::{HttpClient, HttpClientConfig, HttpTransport};
use tracing::{debug, warn};

use crate::{Message, MessageResponse, MessagingError, Result, SenderConfig};

/// Sends messages to the messaging service.
///
/// Each [`send`](Self::send) makes exactly one HTTP request. Retrying is up
/// to the caller; see [`MessagingError::is_retryable`].
pub struct Sender<T = HttpClient> {
    config: SenderConfig,
    transport: T,
}

impl Sender<HttpClient> {
    /// Create a sender backed by the default HTTP client.
    pub fn new(config: SenderConfig) -> Result<Self> {
        let client_config = HttpClientConfig::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build();
        let transport = HttpClient::new(client_config)?;

        Ok(Self { config, transport })
    }
}

impl<T: HttpTransport> Sender<T> {
    /// Create a sender using a custom transport.
    pub fn with_transport(config: SenderConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Get the sender configuration.
    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Send a message and parse the reply.
    pub async fn send(&self, message: &Message) -> Result<MessageResponse> {
        let body = message.to_wire()?;
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), self.config.authorization()),
        ];

        debug!(
            endpoint = %self.config.endpoint,
            recipients = message.recipient_count(),
            dry_run = message.dry_run().unwrap_or(false),
            "Sending message"
        );

        let response = self
            .transport
            .post_json(&self.config.endpoint, &headers, &body)
            .await
            .map_err(|e| {
                warn!(endpoint = %self.config.endpoint, error = %e, "Message transport failed");
                MessagingError::from(e)
            })?;

        let status = response.status().as_u16();

        if status == 401 {
            warn!(status, "Server key rejected");
            return Err(MessagingError::Unauthorized);
        }
        if response.is_server_error() {
            warn!(status, "Messaging service error");
            return Err(MessagingError::ServerError { status });
        }
        if !response.is_success() {
            warn!(status, "Message rejected");
            return Err(MessagingError::Transport {
                code: status.to_string(),
                message: response.text(),
            });
        }

        let parsed = MessageResponse::parse_with_status(response.bytes(), status)?;

        debug!(
            status,
            success = ?parsed.success,
            failure = ?parsed.failure,
            "Message sent"
        );

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use firecast_http_client::{HttpClientError, Response, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::time::Duration;

    struct Recorded {
        url: String,
        headers: Vec<(String, String)>,
        body: Value,
    }

    struct MockTransport {
        reply: Box<dyn Fn() -> firecast_http_client::Result<Response> + Send + Sync>,
        requests: Mutex<Vec<Recorded>>,
    }

    impl MockTransport {
        fn replying(status: u16, body: &'static str) -> Self {
            Self {
                reply: Box::new(move || {
                    Ok(Response::new(StatusCode::from_u16(status).unwrap(), body))
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Box::new(|| Err(HttpClientError::Timeout(Duration::from_secs(30)))),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn post_json(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: &Value,
        ) -> firecast_http_client::Result<Response> {
            self.requests.lock().unwrap().push(Recorded {
                url: url.to_string(),
                headers: headers.to_vec(),
                body: body.clone(),
            });
            (self.reply)()
        }
    }

    fn sender(transport: MockTransport) -> Sender<MockTransport> {
        Sender::with_transport(SenderConfig::new("server-key").unwrap(), transport)
    }

    fn message() -> Message {
        Message::builder().to("device-token").build().unwrap()
    }

    #[tokio::test]
    async fn test_send_success() {
        let sender = sender(MockTransport::replying(
            200,
            r#"{"multicast_id": 1, "success": 1, "failure": 0, "canonical_ids": 0, "results": [{"message_id": "0:1"}]}"#,
        ));

        let response = sender.send(&message()).await.unwrap();
        assert_eq!(response.success, Some(1));
        assert!(response.results[0].is_success());

        let requests = sender.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, crate::config::DEFAULT_ENDPOINT);
        assert_eq!(requests[0].body, json!({"to": "device-token"}));
        assert!(requests[0]
            .headers
            .contains(&("Authorization".to_string(), "key=server-key".to_string())));
        assert!(requests[0]
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let sender = sender(MockTransport::replying(401, "Unauthorized"));
        let err = sender.send(&message()).await.unwrap_err();
        assert!(matches!(err, MessagingError::Unauthorized));
    }

    #[tokio::test]
    async fn test_server_error() {
        let sender = sender(MockTransport::replying(500, "Internal Server Error"));
        let err = sender.send(&message()).await.unwrap_err();
        assert!(matches!(err, MessagingError::ServerError { status: 500 }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let sender = sender(MockTransport::replying(200, "not json"));
        let err = sender.send(&message()).await.unwrap_err();
        assert!(matches!(err, MessagingError::MalformedResponse { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_other_client_error() {
        let sender = sender(MockTransport::replying(400, "Field \"to\" must be a JSON string"));
        let err = sender.send(&message()).await.unwrap_err();
        match err {
            MessagingError::Transport { code, message } => {
                assert_eq!(code, "400");
                assert!(message.contains("JSON string"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let sender = sender(MockTransport::failing());
        let err = sender.send(&message()).await.unwrap_err();
        assert!(matches!(err, MessagingError::Transport { ref code, .. } if code == "timeout"));
    }

    #[tokio::test]
    async fn test_invalid_message_not_sent() {
        let sender = sender(MockTransport::replying(200, "{}"));
        let err = sender.send(&Message::default()).await.unwrap_err();

        assert!(matches!(err, MessagingError::MissingTarget));
        assert!(sender.transport.requests.lock().unwrap().is_empty());
    }
}
