//! logpanel: a terminal console log output panel.
//!
//! A producer writes JSON-lines messages (to a file or to stdin); logpanel
//! keeps a numbered, timestamped, newest-first list of them in a panel with a
//! Clear button. The layers are exposed here so that integration tests and
//! other hosts can import them directly.
//!
//! # Architecture
//!
//! ```text
//! Feed ──channel──► UI loop ──► LogSink ──► LogView ──► panel
//!                                  │
//!                                  └──► fallback (tracing)
//! ```
//!
//! Feeds run on background threads; the UI drives the main thread and is the
//! only caller of [`LogSink::publish`].

pub use logpanel_core::{
    config, Deferred, Disposable, Extension, Handler, LogEntry, LogSink, LogView, Message,
    MessageError, ServiceError, Services, Subscription,
};

/// Message producers.
pub mod feeds {
    pub use logpanel_feeds::*;
}

/// The ratatui application shell.
pub mod tui {
    pub use logpanel_tui::*;
}
