//! Transport abstraction.

use async_trait::async_trait;

use crate::{Response, Result};

/// Something that can POST a JSON body and return the raw reply.
///
/// Implementations perform exactly one exchange per call. Any HTTP status is
/// returned as `Ok`; only failures below the HTTP layer are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with the given extra headers.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<Response>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &serde_json::Value,
    ) -> Result<Response> {
        (**self).post_json(url, headers, body).await
    }
}
