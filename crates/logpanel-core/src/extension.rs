//! Activation and teardown of the log panel extension.
//!
//! The host calls [`Extension::activate`] once it is ready and
//! [`Extension::deactivate`] when it tears the extension down.

use std::sync::Arc;

use crate::dispose::Disposable;
use crate::services::Services;
use crate::sink::LogSink;

/// Identifier the extension registers under.
pub const EXTENSION_ID: &str = "logpanel";

/// Human-readable panel title.
pub const PANEL_LABEL: &str = "Console Log Output";

pub struct Extension;

impl Extension {
    /// Create the process-wide [`LogSink`] and provide it to `services`.
    ///
    /// Activating again while a live sink is registered returns that sink.
    pub fn activate(services: &mut Services) -> Arc<LogSink> {
        if let Some(existing) = services.get::<LogSink>().filter(|s| !s.is_disposed()) {
            tracing::debug!(extension = EXTENSION_ID, "already active");
            return existing;
        }

        let sink = Arc::new(LogSink::new());
        services.provide(Arc::clone(&sink));
        tracing::info!(extension = EXTENSION_ID, "extension activated");
        sink
    }

    /// Dispose the registered sink. Safe to call more than once.
    pub fn deactivate(services: &Services) {
        let Some(sink) = services.get::<LogSink>().filter(|s| !s.is_disposed()) else {
            return;
        };
        sink.dispose();
        tracing::info!(extension = EXTENSION_ID, "extension deactivated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_provides_sink() {
        let mut services = Services::new();
        let sink = Extension::activate(&mut services);
        let provided = services.require::<LogSink>().unwrap();
        assert!(Arc::ptr_eq(&sink, &provided));
    }

    #[test]
    fn activate_is_stable_while_live() {
        let mut services = Services::new();
        let first = Extension::activate(&mut services);
        let second = Extension::activate(&mut services);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn deactivate_disposes_once_and_allows_reactivation() {
        let mut services = Services::new();
        let first = Extension::activate(&mut services);

        Extension::deactivate(&services);
        Extension::deactivate(&services);
        assert!(first.is_disposed());

        let second = Extension::activate(&mut services);
        assert!(!second.is_disposed());
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn deactivate_logs_only_when_it_disposes() {
        let (subscriber, lines) = capture_info();
        let mut services = Services::new();
        Extension::activate(&mut services);

        tracing::subscriber::with_default(subscriber, || {
            Extension::deactivate(&services);
            Extension::deactivate(&services);
        });

        let text = String::from_utf8(lines.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("extension deactivated").count(), 1, "{text}");
    }

    fn capture_info() -> (impl tracing::Subscriber + Send + Sync, Arc<std::sync::Mutex<Vec<u8>>>) {
        let lines = Arc::new(std::sync::Mutex::new(Vec::new()));
        let writer = Arc::clone(&lines);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || SharedBuf(Arc::clone(&writer)))
            .finish();
        (subscriber, lines)
    }

    struct SharedBuf(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
