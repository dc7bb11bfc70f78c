// Firecast - push messages for the Firebase Cloud Messaging HTTP API
//
// This library assembles and validates messages with fluent builders, then
// sends them with a single HTTP request per call.

// Re-export the messaging client
pub use firecast_messaging::*;

// Re-export optional crates
#[cfg(feature = "http-client")]
pub use firecast_http_client;

// Prelude for common imports
pub mod prelude {
    pub use firecast_messaging::prelude::*;

    #[cfg(feature = "http-client")]
    pub use firecast_http_client::{HttpTransport, Response};
}
