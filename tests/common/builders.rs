//! Test builders: ergonomic constructors for messages and wired-up views.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone};
use logpanel::{LogSink, LogView, Message};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// MessageBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Message`] fixtures, mirroring the wire shape.
///
/// # Example
///
/// ```rust
/// let msg = MessageBuilder::display("execute_result")
///     .data("text/html", "<b>42</b>")
///     .data("text/plain", "42")
///     .build();
/// ```
pub struct MessageBuilder {
    kind: String,
    text: Option<String>,
    name: Option<String>,
    data: HashMap<String, Value>,
}

impl MessageBuilder {
    pub fn stream(text: impl Into<String>) -> Self {
        Self { kind: "stream".into(), text: Some(text.into()), name: None, data: HashMap::new() }
    }

    pub fn display(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), text: None, name: None, data: HashMap::new() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn data(mut self, mime: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(mime.into(), value.into());
        self
    }

    /// The message as the producer would put it on the wire.
    pub fn to_json(&self) -> Value {
        if self.kind == "stream" {
            let mut content = json!({ "text": self.text.clone().unwrap_or_default() });
            if let Some(name) = &self.name {
                content["name"] = json!(name);
            }
            json!({ "msg_type": "stream", "content": content })
        } else {
            json!({ "msg_type": self.kind, "content": { "data": self.data } })
        }
    }

    pub fn to_line(&self) -> String {
        format!("{}\n", self.to_json())
    }

    pub fn build(&self) -> Message {
        Message::from_value(&self.to_json())
    }
}

// ---------------------------------------------------------------------------
// Wired view
// ---------------------------------------------------------------------------

/// A sink with a view attached whose clock ticks one second per entry,
/// starting at 2024-01-15 10:00:00 local time.
pub fn wired_view() -> (LogSink, LogView) {
    let sink = LogSink::new();
    let view = LogView::attach_with_clock(&sink, ticking_clock(base_time()));
    (sink, view)
}

pub fn base_time() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 1, 15, 10, 0, 0)
        .single()
        .expect("unambiguous local time")
}

/// A clock that returns `start`, `start + 1s`, `start + 2s`, ...
pub fn ticking_clock(start: DateTime<Local>) -> impl Fn() -> DateTime<Local> + Send + Sync + 'static {
    let tick = AtomicI64::new(0);
    move || start + chrono::TimeDelta::seconds(tick.fetch_add(1, Ordering::Relaxed))
}
