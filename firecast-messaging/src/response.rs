//! Service responses.

use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::{MessagingError, Result};

/// Parsed reply from the messaging service.
///
/// Fields missing from the reply stay `None`; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    /// Message id, returned for topic messages.
    #[serde(default, deserialize_with = "string_or_number")]
    pub message_id: Option<String>,
    /// Multicast id, returned for token messages.
    #[serde(default)]
    pub multicast_id: Option<i64>,
    /// Number of messages processed without error.
    #[serde(default)]
    pub success: Option<u64>,
    /// Number of messages that could not be processed.
    #[serde(default)]
    pub failure: Option<u64>,
    /// Number of results carrying a canonical registration id.
    #[serde(default)]
    pub canonical_ids: Option<u64>,
    /// Error for topic messages.
    #[serde(default)]
    pub error: Option<String>,
    /// Per-recipient results, in the order the recipients were sent.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SendResult>,
}

impl MessageResponse {
    /// Parse a raw response body.
    pub fn parse(body: &[u8]) -> Result<Self> {
        Self::parse_with_status(body, 200)
    }

    pub(crate) fn parse_with_status(body: &[u8], status: u16) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| MessagingError::MalformedResponse {
            status,
            message: e.to_string(),
        })
    }

    /// Whether any recipient failed.
    pub fn has_failures(&self) -> bool {
        self.failure.is_some_and(|n| n > 0)
            || self.error.is_some()
            || self.results.iter().any(|r| r.error.is_some())
    }

    /// Pair each sent token with the canonical id the service returned.
    ///
    /// `tokens` must be the recipients in the order they were sent.
    pub fn canonical_replacements<'a>(&'a self, tokens: &'a [String]) -> Vec<(&'a str, &'a str)> {
        tokens
            .iter()
            .zip(&self.results)
            .filter_map(|(token, result)| {
                result
                    .registration_id
                    .as_deref()
                    .map(|canonical| (token.as_str(), canonical))
            })
            .collect()
    }

    /// Tokens whose result carries an error, with the error code.
    pub fn failed_tokens<'a>(&'a self, tokens: &'a [String]) -> Vec<(&'a str, SendErrorCode)> {
        tokens
            .iter()
            .zip(&self.results)
            .filter_map(|(token, result)| result.error_code().map(|code| (token.as_str(), code)))
            .collect()
    }
}

/// Result for a single recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendResult {
    /// Message id when the message was accepted.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Canonical registration id to use from now on.
    #[serde(default)]
    pub registration_id: Option<String>,
    /// Error code when the message was rejected.
    #[serde(default)]
    pub error: Option<String>,
}

impl SendResult {
    /// Whether the message was accepted for this recipient.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.message_id.is_some()
    }

    /// Typed error code, if any.
    pub fn error_code(&self) -> Option<SendErrorCode> {
        self.error.as_deref().map(SendErrorCode::from)
    }
}

/// Error codes reported per recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendErrorCode {
    /// No registration token was provided.
    MissingRegistration,
    /// Registration token is malformed.
    InvalidRegistration,
    /// Token is no longer registered.
    NotRegistered,
    /// Package name does not match the token.
    InvalidPackageName,
    /// Token belongs to another sender.
    MismatchSenderId,
    /// Invalid request parameters.
    InvalidParameters,
    /// Payload exceeds the size limit.
    MessageTooBig,
    /// Data payload uses a reserved key.
    InvalidDataKey,
    /// Time to live is out of range.
    InvalidTtl,
    /// Service timed out, try later.
    Unavailable,
    /// Internal service error.
    InternalServerError,
    /// Too many messages to one device.
    DeviceMessageRateExceeded,
    /// Too many messages to one topic.
    TopicsMessageRateExceeded,
    /// APNs credential is missing or invalid.
    InvalidApnsCredential,
    /// Any other code.
    Other(String),
}

impl SendErrorCode {
    /// Whether the token should be dropped from storage.
    pub fn should_remove_device(&self) -> bool {
        matches!(
            self,
            Self::NotRegistered | Self::InvalidRegistration | Self::MismatchSenderId
        )
    }

    /// Whether resending to this recipient may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable
                | Self::InternalServerError
                | Self::DeviceMessageRateExceeded
                | Self::TopicsMessageRateExceeded
        )
    }

    /// Code as sent by the service.
    pub fn as_str(&self) -> &str {
        match self {
            Self::MissingRegistration => "MissingRegistration",
            Self::InvalidRegistration => "InvalidRegistration",
            Self::NotRegistered => "NotRegistered",
            Self::InvalidPackageName => "InvalidPackageName",
            Self::MismatchSenderId => "MismatchSenderId",
            Self::InvalidParameters => "InvalidParameters",
            Self::MessageTooBig => "MessageTooBig",
            Self::InvalidDataKey => "InvalidDataKey",
            Self::InvalidTtl => "InvalidTtl",
            Self::Unavailable => "Unavailable",
            Self::InternalServerError => "InternalServerError",
            Self::DeviceMessageRateExceeded => "DeviceMessageRateExceeded",
            Self::TopicsMessageRateExceeded => "TopicsMessageRateExceeded",
            Self::InvalidApnsCredential => "InvalidApnsCredential",
            Self::Other(code) => code,
        }
    }
}

impl From<&str> for SendErrorCode {
    fn from(code: &str) -> Self {
        match code {
            "MissingRegistration" => Self::MissingRegistration,
            "InvalidRegistration" => Self::InvalidRegistration,
            "NotRegistered" => Self::NotRegistered,
            "InvalidPackageName" => Self::InvalidPackageName,
            "MismatchSenderId" => Self::MismatchSenderId,
            "InvalidParameters" => Self::InvalidParameters,
            "MessageTooBig" => Self::MessageTooBig,
            "InvalidDataKey" => Self::InvalidDataKey,
            "InvalidTtl" => Self::InvalidTtl,
            "Unavailable" => Self::Unavailable,
            "InternalServerError" => Self::InternalServerError,
            "DeviceMessageRateExceeded" => Self::DeviceMessageRateExceeded,
            "TopicsMessageRateExceeded" => Self::TopicsMessageRateExceeded,
            "InvalidApnsCredential" => Self::InvalidApnsCredential,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// An explicit `null` is treated like a missing array.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// Topic replies carry a numeric message id, token replies a string.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    }))
}
