//! Sender configuration.

use std::fmt;
use std::time::Duration;

use crate::{MessagingError, Result};

/// Default messaging endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// Sender configuration.
#[derive(Clone)]
pub struct SenderConfig {
    server_key: String,
    /// Endpoint messages are POSTed to.
    pub endpoint: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl SenderConfig {
    /// Create a configuration for the given server key.
    pub fn new(server_key: impl Into<String>) -> Result<Self> {
        let server_key = server_key.into();
        if server_key.trim().is_empty() {
            return Err(MessagingError::InvalidServerKey);
        }

        Ok(Self {
            server_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("firecast/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Set the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Get the server key.
    pub fn server_key(&self) -> &str {
        &self.server_key
    }

    /// Value of the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        format!("key={}", self.server_key)
    }
}

impl fmt::Debug for SenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderConfig")
            .field("server_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
