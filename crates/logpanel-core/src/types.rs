//! Core types for logpanel-core.
//!
//! This module defines the data exchanged between the producer, the sink and
//! the view: the incoming [`Message`] and the view-owned [`LogEntry`].

use std::collections::HashMap;
use std::fmt::{self, Write as _};

use chrono::{DateTime, Local};
use serde_json::Value;

/// Discriminator value marking a plain-text stream message.
pub const STREAM_KIND: &str = "stream";

/// Content type whose representation is shown for display messages.
pub const HTML_MIME: &str = "text/html";

/// Time-of-day format used when none (or an invalid one) is configured.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// A message published by an external producer.
///
/// The wire shape is `{"msg_type": <kind>, "content": {...}}`. Stream messages
/// carry `content.text`; every other kind carries a `content.data` mapping of
/// content type to representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// `msg_type == "stream"`: the text is displayed as-is.
    Stream {
        /// Stream name (`stdout`, `stderr`) when the producer sent one.
        name: Option<String>,
        text: String,
    },
    /// Any other kind (`display_data`, `execute_result`, `error`, ...).
    Display {
        kind: String,
        data: HashMap<String, Value>,
    },
}

/// Failure to turn a line of producer output into a [`Message`].
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("invalid message JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl Message {
    /// A stream message with no stream name.
    pub fn stream(text: impl Into<String>) -> Self {
        Message::Stream { name: None, text: text.into() }
    }

    /// A display message whose only representation is `text/html`.
    pub fn html(kind: impl Into<String>, html: impl Into<String>) -> Self {
        let mut data = HashMap::new();
        data.insert(HTML_MIME.to_string(), Value::String(html.into()));
        Message::Display { kind: kind.into(), data }
    }

    /// The discriminator this message was received with.
    pub fn kind(&self) -> &str {
        match self {
            Message::Stream { .. } => STREAM_KIND,
            Message::Display { kind, .. } => kind,
        }
    }

    /// The displayable payload.
    ///
    /// Stream messages yield their text. Display messages yield the
    /// `text/html` representation, or the empty string when it is missing or
    /// not a string.
    pub fn content(&self) -> &str {
        match self {
            Message::Stream { text, .. } => text,
            Message::Display { data, .. } => {
                data.get(HTML_MIME).and_then(Value::as_str).unwrap_or_default()
            }
        }
    }

    /// Interpret an already-parsed JSON value. Never fails: absent keys give
    /// empty text or an empty data mapping.
    ///
    /// The discriminator is read from `msg_type`, falling back to
    /// `header.msg_type` for messages forwarded with their full envelope.
    pub fn from_value(value: &Value) -> Self {
        let kind = value
            .get("msg_type")
            .or_else(|| value.pointer("/header/msg_type"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let content = value.get("content");

        if kind == STREAM_KIND {
            let text = content
                .and_then(|c| c.get("text"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let name = content
                .and_then(|c| c.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string);
            Message::Stream { name, text }
        } else {
            let data = content
                .and_then(|c| c.get("data"))
                .and_then(Value::as_object)
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();
            Message::Display { kind: kind.to_string(), data }
        }
    }

    /// Parse one JSON document (typically one line of a feed).
    pub fn from_json_str(src: &str) -> Result<Self, MessageError> {
        let value: Value = serde_json::from_str(src)?;
        if !value.is_object() {
            return Err(MessageError::NotAnObject(json_type_name(&value)));
        }
        Ok(Self::from_value(&value))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Stream { text, .. } => write!(f, "{}", text.trim_end()),
            Message::Display { kind, .. } => write!(f, "[{kind}] {}", self.content()),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One displayed record, derived from a [`Message`] by the view.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Position in the current run, starting at 1. Restarts after a clear.
    pub seq: u64,
    /// Wall-clock arrival time.
    pub ts: DateTime<Local>,
    /// Extracted display payload.
    pub content: String,
}

impl LogEntry {
    /// Arrival time rendered as local time-of-day with a chrono format string.
    ///
    /// An invalid format falls back to [`DEFAULT_TIME_FORMAT`] instead of
    /// panicking.
    pub fn time_of_day(&self, fmt: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.ts.format(fmt)).is_err() {
            return self.ts.format(DEFAULT_TIME_FORMAT).to_string();
        }
        out
    }
}
