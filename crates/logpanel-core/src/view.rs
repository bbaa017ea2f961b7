//! LogView: turns published messages into numbered, timestamped entries.
//!
//! A view binds to exactly one [`LogSink`] when it is constructed and keeps
//! that binding for its whole life. Entries are kept newest-first: every new
//! entry is prepended. [`LogView::clear`] wipes the list and restarts
//! numbering at 1.
//!
//! Hosts that paint the entries poll [`LogView::revision`], which changes on
//! every append and every clear that removed something.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local};

use crate::dispose::Disposable;
use crate::sink::{LogSink, Subscription};
use crate::types::{LogEntry, Message};

#[derive(Debug, Default)]
struct ViewState {
    /// Front is newest.
    entries: VecDeque<LogEntry>,
    counter: u64,
    revision: u64,
}

impl ViewState {
    fn append(&mut self, message: &Message, ts: DateTime<Local>) {
        self.counter += 1;
        self.revision += 1;
        self.entries.push_front(LogEntry {
            seq: self.counter,
            ts,
            content: message.content().to_string(),
        });
    }

    fn clear(&mut self) {
        if self.entries.is_empty() && self.counter == 0 {
            return;
        }
        self.entries.clear();
        self.counter = 0;
        self.revision += 1;
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The ordered list of entries shown by the log panel.
pub struct LogView {
    state: Arc<Mutex<ViewState>>,
    subscription: Subscription,
}

impl LogView {
    /// Subscribe a new, empty view to `sink`, stamping entries with the local
    /// wall clock.
    pub fn attach(sink: &LogSink) -> Self {
        Self::attach_with_clock(sink, Local::now)
    }

    /// Like [`attach`](Self::attach) with an explicit time source.
    pub fn attach_with_clock<C>(sink: &LogSink, clock: C) -> Self
    where
        C: Fn() -> DateTime<Local> + Send + Sync + 'static,
    {
        let state = Arc::new(Mutex::new(ViewState::default()));
        let handler_state = Arc::clone(&state);

        let subscription = sink.subscribe(move |message: &Message| {
            let mut state = lock(&handler_state);
            state.append(message, clock());
            tracing::trace!(seq = state.counter, kind = message.kind(), "view: entry appended");
        });

        Self { state, subscription }
    }

    /// Remove every entry and reset the sequence counter to 0.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        let removed = state.entries.len();
        state.clear();
        tracing::debug!(removed, "view: cleared");
    }

    /// Snapshot of the entries, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.state).entries.iter().cloned().collect()
    }

    /// Borrow the entries (newest first) without cloning them.
    ///
    /// The view is locked while `f` runs; `f` must not publish to the sink
    /// this view is attached to.
    pub fn with_entries<R>(&self, f: impl FnOnce(&VecDeque<LogEntry>) -> R) -> R {
        f(&lock(&self.state).entries)
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).entries.is_empty()
    }

    /// Sequence number of the newest entry, or 0 right after a clear.
    pub fn counter(&self) -> u64 {
        lock(&self.state).counter
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        lock(&self.state).revision
    }
}

impl Disposable for LogView {
    /// Detach from the sink. Entries already received stay readable.
    fn dispose(&self) {
        self.subscription.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.subscription.is_disposed()
    }
}

impl std::fmt::Debug for LogView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("LogView")
            .field("entries", &state.entries.len())
            .field("counter", &state.counter)
            .field("revision", &state.revision)
            .field("attached", &self.subscription.is_active())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
