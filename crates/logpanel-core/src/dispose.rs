//! Explicit teardown for objects that hold on to a sink.

/// An object whose resources are released by an explicit, idempotent call.
///
/// Calling [`dispose`](Disposable::dispose) more than once has the same effect
/// as calling it once; afterwards [`is_disposed`](Disposable::is_disposed)
/// reports `true` forever.
pub trait Disposable {
    fn dispose(&self);
    fn is_disposed(&self) -> bool;
}
