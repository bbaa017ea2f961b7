//! logpanel-feeds: message producers for logpanel.
//!
//! Each feed reads JSON-lines output from a source, turns every line into a
//! [`logpanel_core::Message`] and pushes it onto an unbounded channel. Feeds
//! never touch the sink: the UI loop drains the channel and publishes on its
//! own thread.

pub mod file;
pub mod stdin;

pub use file::FileFeed;
pub use stdin::StdinFeed;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use logpanel_core::Message;

/// Sending half of the feed → UI channel.
pub type MessageSender = tokio::sync::mpsc::UnboundedSender<Message>;

/// Receiving half of the feed → UI channel.
pub type MessageReceiver = tokio::sync::mpsc::UnboundedReceiver<Message>;

/// Create a feed → UI channel.
pub fn channel() -> (MessageSender, MessageReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("failed to spawn feed thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Trait implemented by each message source.
pub trait Feed {
    /// Short label used in logs.
    fn name(&self) -> String;

    /// Start reading on a background thread, sending every decoded message
    /// to `tx`. Errors that can be detected up front (missing file, watcher
    /// setup) are returned here; later read errors are logged.
    fn spawn(self, tx: MessageSender) -> Result<FeedHandle, FeedError>;
}

/// A running feed.
///
/// Dropping the handle asks the feed to stop but does not wait for it: a
/// reader blocked on stdin only notices at its next line.
#[derive(Debug)]
pub struct FeedHandle {
    name: String,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FeedHandle {
    fn spawn_thread<F>(name: String, body: F) -> Result<Self, FeedError>
    where
        F: FnOnce(Arc<AtomicBool>) + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let thread = std::thread::Builder::new()
            .name(format!("logpanel-feed-{name}"))
            .spawn(move || body(thread_stop))
            .map_err(FeedError::Spawn)?;
        tracing::debug!(feed = %name, "feed started");
        Ok(Self { name, stop, thread: Some(thread) })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the feed thread to exit.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!(feed = %self.name, "feed thread panicked");
            }
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if !self.is_finished() {
            tracing::debug!(feed = %self.name(), "stopping feed");
        }
        self.stop();
    }
}

/// Decode one line of producer output. Blank lines are skipped silently;
/// lines that are not a JSON object are logged and skipped.
pub fn decode_line(line: &str) -> Option<Message> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match Message::from_json_str(line) {
        Ok(message) => Some(message),
        Err(err) => {
            tracing::warn!(error = %err, "feed: skipping undecodable line");
            None
        }
    }
}

/// Read `reader` to EOF, forwarding each decoded line to `tx`.
///
/// Stops early when `stop` is set or the receiver is gone. Invalid UTF-8 is
/// replaced rather than aborting the feed. Returns the number of messages
/// sent.
pub fn pump_lines<R: BufRead>(mut reader: R, tx: &MessageSender, stop: &AtomicBool) -> usize {
    let mut sent = 0;
    let mut buf = Vec::new();
    loop {
        if stop.load(Ordering::Acquire) {
            break;
        }
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let Some(message) = decode_line(&String::from_utf8_lossy(&buf)) else {
                    continue;
                };
                if tx.send(message).is_err() {
                    tracing::debug!("feed: receiver closed");
                    break;
                }
                sent += 1;
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => {
                tracing::warn!(error = %err, "feed: read failed");
                break;
            }
        }
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    const LINES: &str = concat!(
        r#"{"msg_type":"stream","content":{"text":"hello"}}"#, "\n",
        "\n",
        "not json\n",
        r#"{"msg_type":"display_data","content":{"data":{"text/html":"<b>bold</b>"}}}"#, "\n",
    );

    #[test]
    fn pump_skips_bad_lines() {
        let (tx, mut rx) = channel();
        let stop = AtomicBool::new(false);

        let sent = pump_lines(Cursor::new(LINES), &tx, &stop);
        drop(tx);

        assert_eq!(sent, 2);
        assert_eq!(rx.blocking_recv(), Some(Message::stream("hello")));
        assert_eq!(rx.blocking_recv().map(|m| m.content().to_string()), Some("<b>bold</b>".into()));
        assert_eq!(rx.blocking_recv(), None);
    }

    #[test]
    fn pump_honours_stop_flag() {
        let (tx, _rx) = channel();
        let stop = AtomicBool::new(true);
        assert_eq!(pump_lines(Cursor::new(LINES), &tx, &stop), 0);
    }

    #[test]
    fn pump_stops_when_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        let stop = AtomicBool::new(false);
        assert_eq!(pump_lines(Cursor::new(LINES), &tx, &stop), 0);
    }

    #[test]
    fn pump_survives_invalid_utf8() {
        let (tx, mut rx) = channel();
        let stop = AtomicBool::new(false);
        let mut bytes = b"\xff\xfe garbage\n".to_vec();
        bytes.extend_from_slice(br#"{"msg_type":"stream","content":{"text":"ok"}}"#);

        assert_eq!(pump_lines(Cursor::new(bytes), &tx, &stop), 1);
        assert_eq!(rx.blocking_recv(), Some(Message::stream("ok")));
    }

    #[test]
    fn handle_reports_thread_state() {
        let handle = FeedHandle::spawn_thread("waiting".into(), |stop| {
            while !stop.load(Ordering::Acquire) {
                std::thread::sleep(std::time::Duration::from_millis(5));
            }
        })
        .unwrap();
        assert_eq!(handle.name(), "waiting");
        assert!(!handle.is_finished());

        handle.stop();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while !handle.is_finished() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(handle.is_finished());
        handle.join();
    }

    #[test]
    fn decode_line_ignores_blank() {
        assert_eq!(decode_line("   "), None);
        assert_eq!(decode_line("42"), None);
    }
}
