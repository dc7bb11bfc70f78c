//! # Firecast HTTP Client
//!
//! The transport half of Firecast: a thin reqwest wrapper that POSTs a JSON
//! body with custom headers and hands back the status code and raw body.
//!
//! Every call is a single attempt. Retry, backoff and circuit breaking are
//! left to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use firecast_http_client::{HttpClient, HttpClientConfig, HttpTransport};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HttpClientConfig::builder()
//!         .timeout(Duration::from_secs(10))
//!         .build();
//!     let client = HttpClient::new(config)?;
//!
//!     let headers = vec![("Authorization".to_string(), "key=secret".to_string())];
//!     let response = client
//!         .post_json("https://api.example.com/send", &headers, &serde_json::json!({"to": "abc"}))
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod response;
mod transport;

pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use error::{HttpClientError, Result};
pub use response::Response;
pub use transport::HttpTransport;

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, StatusCode};

/// Prelude for common imports.
///
/// ```
/// use firecast_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::error::{HttpClientError, Result};
    pub use crate::response::Response;
    pub use crate::transport::HttpTransport;
    pub use http::StatusCode;
}
