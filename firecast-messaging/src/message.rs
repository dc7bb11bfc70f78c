//! Message requests.
//!
//! A [`Message`] is assembled through [`MessageBuilder`]. Each setter checks
//! its own field; [`MessageBuilder::build`] then checks the rules that span
//! fields, so the outcome does not depend on the order of the calls.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::condition::validate_topic;
use crate::{Condition, MessagingError, NotificationPayload, Result};

/// Longest time to live the service accepts, in seconds (four weeks).
pub const MAX_TIME_TO_LIVE: u64 = 2_419_200;

/// Largest number of registration ids in one message.
pub const MAX_REGISTRATION_IDS: usize = 1000;

/// Delivery priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Normal priority.
    #[default]
    Normal,
    /// High priority (may wake the device).
    High,
}

impl Priority {
    /// Wire name of the priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(MessagingError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform the message is meant for.
///
/// Used only for local validation; it is never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Android devices.
    Android,
    /// iOS devices.
    Ios,
    /// Android and iOS devices.
    Both,
}

impl Platform {
    /// Whether a notification for this platform must carry a title.
    pub fn requires_title(&self) -> bool {
        matches!(self, Self::Android | Self::Both)
    }
}

impl FromStr for Platform {
    type Err = MessagingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "both" => Ok(Self::Both),
            _ => Err(MessagingError::InvalidPlatform(s.to_string())),
        }
    }
}

/// Recipients of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single registration token, or a `/topics/<name>` address.
    Token(String),
    /// Between 1 and 1000 registration tokens.
    RegistrationIds(Vec<String>),
    /// A balanced topic condition.
    Condition(Condition),
}

/// A validated message request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    target: Option<Target>,
    collapse_key: Option<String>,
    priority: Option<Priority>,
    content_available: Option<bool>,
    delay_while_idle: Option<bool>,
    time_to_live: Option<u64>,
    restricted_package_name: Option<String>,
    dry_run: Option<bool>,
    data: Option<BTreeMap<String, String>>,
    notification: Option<NotificationPayload>,
    target_platform: Option<Platform>,
}

impl Message {
    /// Create a builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Get the recipients.
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Get the collapse key.
    pub fn collapse_key(&self) -> Option<&str> {
        self.collapse_key.as_deref()
    }

    /// Get the priority.
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Get the content-available flag.
    pub fn content_available(&self) -> Option<bool> {
        self.content_available
    }

    /// Get the delay-while-idle flag.
    pub fn delay_while_idle(&self) -> Option<bool> {
        self.delay_while_idle
    }

    /// Get the time to live in seconds.
    pub fn time_to_live(&self) -> Option<u64> {
        self.time_to_live
    }

    /// Get the restricted package name.
    pub fn restricted_package_name(&self) -> Option<&str> {
        self.restricted_package_name.as_deref()
    }

    /// Get the dry-run flag.
    pub fn dry_run(&self) -> Option<bool> {
        self.dry_run
    }

    /// Get the custom data.
    pub fn data(&self) -> Option<&BTreeMap<String, String>> {
        self.data.as_ref()
    }

    /// Get the notification payload.
    pub fn notification(&self) -> Option<&NotificationPayload> {
        self.notification.as_ref()
    }

    /// Get the target platform hint.
    pub fn target_platform(&self) -> Option<Platform> {
        self.target_platform
    }

    /// Number of registration tokens addressed directly.
    ///
    /// Zero for topic conditions, which fan out on the service side.
    pub fn recipient_count(&self) -> usize {
        match &self.target {
            Some(Target::Token(_)) => 1,
            Some(Target::RegistrationIds(ids)) => ids.len(),
            Some(Target::Condition(_)) | None => 0,
        }
    }

    /// Check the rules that span several fields.
    pub fn validate(&self) -> Result<()> {
        if self.target.is_none() {
            return Err(MessagingError::MissingTarget);
        }
        if let Some(notification) = &self.notification {
            check_title(self.target_platform, notification)?;
        }
        Ok(())
    }

    /// JSON body sent to the service.
    ///
    /// Only set fields are included. The platform hint is never sent.
    pub fn to_wire(&self) -> Result<Value> {
        self.validate()?;

        let (to, registration_ids, condition) = match &self.target {
            Some(Target::Token(token)) => (Some(token.as_str()), None, None),
            Some(Target::RegistrationIds(ids)) => (None, Some(ids.as_slice()), None),
            Some(Target::Condition(condition)) => (None, None, Some(condition.render())),
            None => (None, None, None),
        };

        let wire = WireMessage {
            to,
            registration_ids,
            condition,
            collapse_key: self.collapse_key.as_deref(),
            priority: self.priority,
            content_available: self.content_available,
            delay_while_idle: self.delay_while_idle,
            time_to_live: self.time_to_live,
            restricted_package_name: self.restricted_package_name.as_deref(),
            dry_run: self.dry_run,
            data: self.data.as_ref(),
            notification: self.notification.as_ref(),
        };

        Ok(serde_json::to_value(&wire)?)
    }

    /// Pretty-printed JSON body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire()?)?)
    }
}

/// Builder for messages.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Send to a single registration token.
    pub fn to(mut self, token: impl Into<String>) -> Self {
        self.message.target = Some(Target::Token(token.into()));
        self
    }

    /// Send to everyone subscribed to `topic`.
    pub fn to_topic(mut self, topic: impl AsRef<str>) -> Result<Self> {
        let topic = topic.as_ref();
        validate_topic(topic)?;
        self.message.target = Some(Target::Token(format!("/topics/{}", topic)));
        Ok(self)
    }

    /// Send to a list of 1 to 1000 registration tokens.
    pub fn registration_ids<I, S>(mut self, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if tokens.is_empty() || tokens.len() > MAX_REGISTRATION_IDS {
            return Err(MessagingError::InvalidArgumentRange {
                min: 1,
                max: MAX_REGISTRATION_IDS,
                actual: tokens.len(),
            });
        }
        self.message.target = Some(Target::RegistrationIds(tokens));
        Ok(self)
    }

    /// Send to devices matching a topic condition.
    pub fn condition(mut self, condition: Condition) -> Result<Self> {
        condition.ensure_valid()?;
        self.message.target = Some(Target::Condition(condition));
        Ok(self)
    }

    /// Set the collapse key.
    pub fn collapse_key(mut self, key: impl Into<String>) -> Self {
        self.message.collapse_key = Some(key.into());
        self
    }

    /// Set the priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.message.priority = Some(priority);
        self
    }

    /// Set the content-available flag (iOS).
    pub fn content_available(mut self, enabled: bool) -> Self {
        self.message.content_available = Some(enabled);
        self
    }

    /// Set the delay-while-idle flag.
    pub fn delay_while_idle(mut self, enabled: bool) -> Self {
        self.message.delay_while_idle = Some(enabled);
        self
    }

    /// Set the time to live, at most four weeks.
    pub fn time_to_live(mut self, seconds: u64) -> Result<Self> {
        if seconds > MAX_TIME_TO_LIVE {
            return Err(MessagingError::OutOfRange {
                value: seconds.to_string(),
                max: MAX_TIME_TO_LIVE,
            });
        }
        self.message.time_to_live = Some(seconds);
        Ok(self)
    }

    /// Set the time to live from a dynamically typed value.
    ///
    /// Anything but a JSON integer is rejected.
    pub fn time_to_live_value(self, value: &Value) -> Result<Self> {
        let Value::Number(number) = value else {
            return Err(MessagingError::InvalidArgumentType(format!(
                "time to live must be an integer, got {}",
                value
            )));
        };

        if let Some(seconds) = number.as_u64() {
            self.time_to_live(seconds)
        } else if number.is_i64() {
            Err(MessagingError::OutOfRange {
                value: number.to_string(),
                max: MAX_TIME_TO_LIVE,
            })
        } else {
            Err(MessagingError::InvalidArgumentType(format!(
                "time to live must be an integer, got {}",
                number
            )))
        }
    }

    /// Restrict delivery to one application package.
    pub fn restricted_package_name(mut self, name: impl Into<String>) -> Self {
        self.message.restricted_package_name = Some(name.into());
        self
    }

    /// Validate the request on the service without delivering it.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.message.dry_run = Some(enabled);
        self
    }

    /// Replace the custom data.
    pub fn data<I, K, V>(mut self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = BTreeMap::new();
        for (key, value) in entries {
            let key = key.into();
            check_data_key(&key)?;
            data.insert(key, value.into());
        }
        self.message.data = Some(data);
        Ok(self)
    }

    /// Add one custom data entry.
    pub fn data_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        check_data_key(&key)?;
        self.message
            .data
            .get_or_insert_with(BTreeMap::new)
            .insert(key, value.into());
        Ok(self)
    }

    /// Set the platform hint used for validation.
    pub fn target_platform(mut self, platform: Platform) -> Self {
        self.message.target_platform = Some(platform);
        self
    }

    /// Attach a notification payload.
    ///
    /// Fails early if the platform set so far requires a title; the rule is
    /// checked again by [`build`](Self::build).
    pub fn notification(mut self, notification: NotificationPayload) -> Result<Self> {
        check_title(self.message.target_platform, &notification)?;
        self.message.notification = Some(notification);
        Ok(self)
    }

    /// Build the message.
    pub fn build(self) -> Result<Message> {
        self.message.validate()?;
        Ok(self.message)
    }
}

fn check_title(platform: Option<Platform>, notification: &NotificationPayload) -> Result<()> {
    if platform.is_some_and(|p| p.requires_title()) && !notification.has_title() {
        return Err(MessagingError::NotificationTitleRequired);
    }
    Ok(())
}

fn check_data_key(key: &str) -> Result<()> {
    if key.starts_with("google") || key.starts_with("gcm") || key.contains(" of ") {
        return Err(MessagingError::ReservedKey(key.to_string()));
    }
    Ok(())
}

#[derive(Serialize)]
struct WireMessage<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_ids: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collapse_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delay_while_idle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_to_live: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restricted_package_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<&'a NotificationPayload>,
}
