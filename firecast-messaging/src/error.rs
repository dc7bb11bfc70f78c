//! Messaging error types.

use firecast_http_client::HttpClientError;
use thiserror::Error;

/// Result type for messaging operations.
pub type Result<T> = std::result::Result<T, MessagingError>;

/// Messaging errors.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// Topic name is empty or blank.
    #[error("Invalid topic: the topic name must not be empty")]
    InvalidTopic,

    /// Condition already holds the maximum number of topic terms.
    #[error("Invalid condition: only {max} topic terms are supported")]
    TooManyOperators {
        /// Maximum number of terms.
        max: usize,
    },

    /// A group was closed while none was open.
    #[error("Invalid condition: no open group to close")]
    UnbalancedGroup,

    /// Condition has unclosed groups.
    #[error("Invalid condition: {open} group(s) left open")]
    InvalidConditionSyntax {
        /// Number of unclosed groups.
        open: usize,
    },

    /// Notification color is not `#RRGGBB`.
    #[error("Invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    /// Priority is not `normal` or `high`.
    #[error("Invalid priority {0:?}: expected normal or high")]
    InvalidPriority(String),

    /// Platform is not Android, iOS or both.
    #[error("Invalid platform {0:?}: expected android, ios or both")]
    InvalidPlatform(String),

    /// Value has the wrong type.
    #[error("Invalid argument type: {0}")]
    InvalidArgumentType(String),

    /// Collection length is outside the accepted range.
    #[error("Invalid argument: expected between {min} and {max} items, got {actual}")]
    InvalidArgumentRange {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
        /// Actual length.
        actual: usize,
    },

    /// Numeric value is outside its bounds.
    #[error("Value {value} is out of range (0 to {max})")]
    OutOfRange {
        /// Provided value.
        value: String,
        /// Maximum accepted value.
        max: u64,
    },

    /// Custom data key is reserved by the service.
    #[error("Reserved data key {0:?}: keys must not start with google or gcm, or contain \" of \"")]
    ReservedKey(String),

    /// Notification lacks a title required by the target platform.
    #[error("Notification title is required when targeting Android")]
    NotificationTitleRequired,

    /// Message has no recipient.
    #[error("Message has no target: set a token, registration ids or a condition")]
    MissingTarget,

    /// Server key is empty or blank.
    #[error("Invalid server key: must not be empty")]
    InvalidServerKey,

    /// Service rejected the server key (HTTP 401).
    #[error("Unauthorized: the server key was rejected")]
    Unauthorized,

    /// Service returned a 5xx status.
    #[error("Server error: HTTP {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Request did not complete at the transport level.
    #[error("Transport error ({code}): {message}")]
    Transport {
        /// Short failure code.
        code: String,
        /// Underlying error message.
        message: String,
    },

    /// Response body is not valid JSON.
    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse {
        /// HTTP status code.
        status: u16,
        /// Parser error message.
        message: String,
    },

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MessagingError {
    /// Check if this error came from local validation, before any I/O.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::Unauthorized
                | Self::ServerError { .. }
                | Self::Transport { .. }
                | Self::MalformedResponse { .. }
                | Self::Serialization(_)
        )
    }

    /// Check if resending the same message may succeed.
    ///
    /// This is a hint for callers; the sender never retries by itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServerError { .. } | Self::Transport { .. })
    }
}

impl From<HttpClientError> for MessagingError {
    fn from(err: HttpClientError) -> Self {
        Self::Transport {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MessagingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
