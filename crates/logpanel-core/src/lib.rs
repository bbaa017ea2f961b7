//! logpanel-core: console log panel core library.
//!
//! This crate holds the two collaborating components of the panel plus the
//! shared types they exchange:
//!
//! ```text
//! Feed ──► LogSink ──► LogView ──► panel
//!  (producer)  │ single slot   │ newest-first entries
//!              └──► fallback   └──► clear()
//! ```
//!
//! The sink is registered in [`Services`] at activation and handed to
//! consumers by reference; nothing here is a module-level global.

pub mod config;
pub mod deferred;
pub mod dispose;
pub mod extension;
pub mod services;
pub mod sink;
pub mod types;
pub mod view;

pub use deferred::Deferred;
pub use dispose::Disposable;
pub use extension::Extension;
pub use services::{ServiceError, Services};
pub use sink::{Handler, LogSink, Subscription};
pub use types::{LogEntry, Message, MessageError};
pub use view::LogView;
