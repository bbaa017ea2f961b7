//! LogSink: process-wide, single-subscriber message broker.
//!
//! The sink owns one handler slot. [`LogSink::subscribe`] overwrites whatever
//! handler was there before; [`LogSink::publish`] calls the current handler
//! synchronously, or the fallback when the slot is empty. Nothing is queued:
//! a message published while nobody listens goes to the fallback and is gone.
//!
//! # Lifecycle
//!
//! Disposal is terminal. After [`Disposable::dispose`] the slot is emptied,
//! `publish` is a no-op and `subscribe` hands back an already-detached
//! [`Subscription`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::dispose::Disposable;
use crate::types::Message;

/// A message handler installed in the sink's slot.
pub type Handler = Arc<dyn Fn(&Message) + Send + Sync>;

// ---------------------------------------------------------------------------
// Shared slot state
// ---------------------------------------------------------------------------

struct Slot {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct SlotState {
    slot: Option<Slot>,
    next_id: u64,
    disposed: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<SlotState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // Handlers never run under this lock, so a poisoned guard still holds
        // consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// LogSink
// ---------------------------------------------------------------------------

/// Single-slot broker between a message producer and one consumer.
pub struct LogSink {
    shared: Arc<Shared>,
    fallback: Handler,
}

impl LogSink {
    /// A sink whose fallback writes unclaimed messages to the `tracing`
    /// diagnostic channel (target `logpanel::sink`).
    pub fn new() -> Self {
        Self::with_fallback(|message: &Message| {
            tracing::info!(target: "logpanel::sink", kind = message.kind(), "{message}");
        })
    }

    /// A sink with a custom fallback for messages published while no handler
    /// is subscribed.
    pub fn with_fallback<F>(fallback: F) -> Self
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        Self { shared: Arc::default(), fallback: Arc::new(fallback) }
    }

    /// Deliver `message` to the subscribed handler, or to the fallback when
    /// there is none. A no-op once the sink is disposed.
    pub fn publish(&self, message: Message) {
        let handler = {
            let state = self.shared.lock();
            if state.disposed {
                tracing::trace!(kind = message.kind(), "sink: publish after dispose ignored");
                return;
            }
            state.slot.as_ref().map(|slot| Arc::clone(&slot.handler))
        };

        // The lock is released here so the handler may call back into the sink.
        match handler {
            Some(handler) => handler(&message),
            None => (self.fallback)(&message),
        }
    }

    /// Install `handler`, replacing the current one if any.
    ///
    /// The returned [`Subscription`] detaches the handler when disposed or
    /// dropped, unless a later `subscribe` has already replaced it. Bind it
    /// to a variable; dropping it immediately detaches the handler again.
    #[must_use = "dropping the Subscription detaches the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        let mut state = self.shared.lock();
        if state.disposed {
            tracing::debug!("sink: subscribe after dispose ignored");
            return Subscription::detached();
        }

        state.next_id += 1;
        let id = state.next_id;
        let previous = state.slot.replace(Slot { id, handler: Arc::new(handler) });
        drop(state);
        tracing::debug!(id, replaced = previous.is_some(), "sink: handler subscribed");
        // Dropping a handler can drop a Subscription to this sink.
        drop(previous);

        Subscription { shared: Arc::downgrade(&self.shared), id, disposed: AtomicBool::new(false) }
    }

    /// Whether a handler currently occupies the slot.
    pub fn has_subscriber(&self) -> bool {
        self.shared.lock().slot.is_some()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposable for LogSink {
    fn dispose(&self) {
        let mut state = self.shared.lock();
        if state.disposed {
            return;
        }
        state.disposed = true;
        let released = state.slot.take();
        drop(state);
        tracing::debug!("sink: disposed");
        drop(released);
    }

    fn is_disposed(&self) -> bool {
        self.shared.lock().disposed
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("LogSink")
            .field("subscribed", &state.slot.as_ref().map(|s| s.id))
            .field("disposed", &state.disposed)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Handle to a handler installed by [`LogSink::subscribe`].
///
/// Holds only a weak reference to the sink, so an outstanding subscription
/// never keeps a torn-down sink alive.
#[derive(Debug)]
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
    disposed: AtomicBool,
}

impl Subscription {
    fn detached() -> Self {
        Self { shared: Weak::new(), id: 0, disposed: AtomicBool::new(true) }
    }

    /// True while this subscription's handler is the one in the sink's slot.
    pub fn is_active(&self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.lock().slot.as_ref().is_some_and(|s| s.id == self.id))
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let Some(shared) = self.shared.upgrade() else {
            return;
        };
        let mut state = shared.lock();
        if state.slot.as_ref().is_some_and(|s| s.id == self.id) {
            let released = state.slot.take();
            drop(state);
            tracing::debug!(id = self.id, "sink: handler detached");
            drop(released);
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
