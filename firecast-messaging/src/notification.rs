//! Notification payload.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{MessagingError, Result};

static COLOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// User-visible notification content.
///
/// Every field is optional and only set fields reach the wire. Wire keys are
/// fixed per field and emitted in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    #[serde(rename = "title", skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "body", skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    #[serde(rename = "icon", skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(rename = "sound", skip_serializing_if = "Option::is_none")]
    sound: Option<String>,
    #[serde(rename = "badge", skip_serializing_if = "Option::is_none")]
    badge: Option<String>,
    #[serde(rename = "tag", skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(rename = "color", skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(rename = "click_action", skip_serializing_if = "Option::is_none")]
    click_action: Option<String>,
    #[serde(rename = "body_loc_key", skip_serializing_if = "Option::is_none")]
    body_loc_key: Option<String>,
    #[serde(rename = "body_loc_args", skip_serializing_if = "Option::is_none")]
    body_loc_args: Option<Vec<String>>,
    #[serde(rename = "title_loc_key", skip_serializing_if = "Option::is_none")]
    title_loc_key: Option<String>,
    #[serde(rename = "title_loc_args", skip_serializing_if = "Option::is_none")]
    title_loc_args: Option<Vec<String>>,
}

impl NotificationPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    pub fn builder() -> NotificationBuilder {
        NotificationBuilder::new()
    }

    /// Get the title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Get the body.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Get the icon.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Get the sound.
    pub fn sound(&self) -> Option<&str> {
        self.sound.as_deref()
    }

    /// Get the badge.
    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    /// Get the tag.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Get the color.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Get the click action.
    pub fn click_action(&self) -> Option<&str> {
        self.click_action.as_deref()
    }

    /// Get the body localization key.
    pub fn body_loc_key(&self) -> Option<&str> {
        self.body_loc_key.as_deref()
    }

    /// Get the body localization arguments.
    pub fn body_loc_args(&self) -> Option<&[String]> {
        self.body_loc_args.as_deref()
    }

    /// Get the title localization key.
    pub fn title_loc_key(&self) -> Option<&str> {
        self.title_loc_key.as_deref()
    }

    /// Get the title localization arguments.
    pub fn title_loc_args(&self) -> Option<&[String]> {
        self.title_loc_args.as_deref()
    }

    /// Whether a title is present.
    pub fn has_title(&self) -> bool {
        self.title.is_some()
    }

    /// Wire representation, omitting unset fields.
    pub fn to_wire(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(MessagingError::Serialization(format!(
                "notification serialized to a non-object: {}",
                other
            ))),
        }
    }
}

/// Builder for notification payloads.
#[derive(Debug, Default)]
pub struct NotificationBuilder {
    payload: NotificationPayload,
}

impl NotificationBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.payload.title = Some(title.into());
        self
    }

    /// Set the body text.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.payload.body = Some(body.into());
        self
    }

    /// Set the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.payload.icon = Some(icon.into());
        self
    }

    /// Set the sound to play.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.payload.sound = Some(sound.into());
        self
    }

    /// Set the badge (iOS).
    pub fn badge(mut self, badge: impl Into<String>) -> Self {
        self.payload.badge = Some(badge.into());
        self
    }

    /// Set the tag used to replace earlier notifications (Android).
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.payload.tag = Some(tag.into());
        self
    }

    /// Set the icon color, formatted as `#rrggbb` (Android).
    pub fn color(mut self, color: impl Into<String>) -> Result<Self> {
        let color = color.into();
        if !COLOR_REGEX.is_match(&color) {
            return Err(MessagingError::InvalidColor(color));
        }
        self.payload.color = Some(color);
        Ok(self)
    }

    /// Set the action triggered on click.
    pub fn click_action(mut self, action: impl Into<String>) -> Self {
        self.payload.click_action = Some(action.into());
        self
    }

    /// Set the localization key of the body.
    pub fn body_loc_key(mut self, key: impl Into<String>) -> Self {
        self.payload.body_loc_key = Some(key.into());
        self
    }

    /// Set the format arguments of the localized body.
    pub fn body_loc_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payload.body_loc_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Set the localization key of the title.
    pub fn title_loc_key(mut self, key: impl Into<String>) -> Self {
        self.payload.title_loc_key = Some(key.into());
        self
    }

    /// Set the format arguments of the localized title.
    pub fn title_loc_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payload.title_loc_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Build the payload.
    pub fn build(self) -> NotificationPayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_payload_serializes_to_empty_object() {
        assert!(NotificationPayload::new().to_wire().unwrap().is_empty());
    }

    #[test]
    fn test_short_color_rejected() {
        let err = NotificationPayload::builder().color("#FFF").unwrap_err();
        assert!(matches!(err, MessagingError::InvalidColor(ref c) if c == "#FFF"));
    }

    #[test]
    fn test_color_format() {
        assert!(NotificationPayload::builder().color("FFAA00").is_err());
        assert!(NotificationPayload::builder().color("#GGAA00").is_err());
        assert!(NotificationPayload::builder().color("#FFAA00 ").is_err());
        assert!(NotificationPayload::builder().color("#ffaa00").is_ok());
    }

    #[test]
    fn test_color_round_trips() {
        let payload = NotificationPayload::builder()
            .color("#FFAA00")
            .unwrap()
            .build();
        assert_eq!(payload.color(), Some("#FFAA00"));
        assert_eq!(Value::Object(payload.to_wire().unwrap()), json!({"color": "#FFAA00"}));
    }

    #[test]
    fn test_snake_case_keys_in_declaration_order() {
        let payload = NotificationPayload::builder()
            .title_loc_args(["Ana"])
            .click_action("OPEN_CHAT")
            .body("You have a new message")
            .title("Hello")
            .body_loc_key("NEW_MESSAGE")
            .build();

        let map = payload.to_wire().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["title", "body", "click_action", "body_loc_key", "title_loc_args"]
        );
        assert_eq!(map["title_loc_args"], json!(["Ana"]));
    }

    #[test]
    fn test_to_wire_returns_object_result() {
        let payload = NotificationPayload::builder().title("Hello").build();
        let result: Result<Map<String, Value>> = payload.to_wire();
        assert!(matches!(result, Ok(ref map) if map.len() == 1));
        assert_eq!(result.unwrap()["title"], json!("Hello"));
    }

    #[test]
    fn test_getters() {
        let payload = NotificationPayload::builder()
            .title("t")
            .icon("ic_launcher")
            .sound("default")
            .badge("3")
            .tag("chat")
            .title_loc_key("TITLE")
            .body_loc_args(vec!["a".to_string(), "b".to_string()])
            .build();

        assert!(payload.has_title());
        assert_eq!(payload.icon(), Some("ic_launcher"));
        assert_eq!(payload.sound(), Some("default"));
        assert_eq!(payload.badge(), Some("3"));
        assert_eq!(payload.tag(), Some("chat"));
        assert_eq!(payload.title_loc_key(), Some("TITLE"));
        assert_eq!(
            payload.body_loc_args(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert_eq!(payload.body(), None);
    }
}
