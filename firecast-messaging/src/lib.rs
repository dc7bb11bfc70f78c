//! # Firecast Messaging
//!
//! Build, validate and send push messages through the Firebase Cloud
//! Messaging HTTP API.
//!
//! ## Features
//!
//! - **Topic conditions**: build `'a' in topics && ('b' in topics || ...)`
//!   expressions with balanced groups and a bounded number of terms
//! - **Validated builders**: invalid colors, reserved data keys, out-of-range
//!   TTLs and missing titles are rejected before anything is sent
//! - **Typed replies**: per-recipient results, canonical ids and error codes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use firecast_messaging::{Condition, Message, NotificationPayload, Platform, Sender, SenderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sender = Sender::new(SenderConfig::new("your-server-key")?)?;
//!
//!     let condition = Condition::new("news")?
//!         .open_and("sports")?
//!         .or("weather")?
//!         .close_and()?;
//!
//!     let notification = NotificationPayload::builder()
//!         .title("Match day")
//!         .body("Kick-off in 10 minutes")
//!         .color("#FFAA00")?
//!         .build();
//!
//!     let message = Message::builder()
//!         .condition(condition)?
//!         .target_platform(Platform::Android)
//!         .notification(notification)?
//!         .time_to_live(3600)?
//!         .build()?;
//!
//!     let response = sender.send(&message).await?;
//!     println!("message id: {:?}", response.message_id);
//!     Ok(())
//! }
//! ```

mod condition;
mod config;
mod error;
mod message;
mod notification;
mod response;
mod sender;

pub use condition::{Condition, MAX_TERMS};
pub use config::{DEFAULT_ENDPOINT, SenderConfig};
pub use error::{MessagingError, Result};
pub use message::{
    MAX_REGISTRATION_IDS, MAX_TIME_TO_LIVE, Message, MessageBuilder, Platform, Priority, Target,
};
pub use notification::{NotificationBuilder, NotificationPayload};
pub use response::{MessageResponse, SendErrorCode, SendResult};
pub use sender::Sender;

/// Prelude for common imports.
///
/// ```
/// use firecast_messaging::prelude::*;
/// ```
pub mod prelude {
    pub use crate::condition::Condition;
    pub use crate::config::SenderConfig;
    pub use crate::error::{MessagingError, Result};
    pub use crate::message::{Message, MessageBuilder, Platform, Priority, Target};
    pub use crate::notification::{NotificationBuilder, NotificationPayload};
    pub use crate::response::{MessageResponse, SendErrorCode, SendResult};
    pub use crate::sender::Sender;
}
