//! Typed service container.
//!
//! Components register shared capabilities here at activation time and
//! consumers look them up by type. The log sink is provided this way so that
//! anything that wants to publish holds an injected `Arc<LogSink>` rather than
//! reaching for a global.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Lookup failure for [`Services::require`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("no service of type `{0}` has been provided")]
    Missing(&'static str),
}

/// Map from service type to its single shared instance.
#[derive(Default)]
pub struct Services {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service`, returning the instance it replaces, if any.
    pub fn provide<T: Any + Send + Sync>(&mut self, service: Arc<T>) -> Option<Arc<T>> {
        tracing::debug!(service = type_name::<T>(), "services: provided");
        self.entries
            .insert(TypeId::of::<T>(), service)
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|service| service.downcast::<T>().ok())
    }

    /// Like [`get`](Self::get), but a missing service is an error.
    pub fn require<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ServiceError> {
        self.get::<T>().ok_or(ServiceError::Missing(type_name::<T>()))
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Remove and return the service of type `T`.
    pub fn withdraw<T: Any + Send + Sync>(&mut self) -> Option<Arc<T>> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|service| service.downcast::<T>().ok())
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").field("len", &self.entries.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Greeting(&'static str);

    #[test]
    fn provide_then_get() {
        let mut services = Services::new();
        assert!(services.provide(Arc::new(Greeting("hi"))).is_none());

        assert!(services.contains::<Greeting>());
        assert_eq!(*services.get::<Greeting>().unwrap(), Greeting("hi"));
    }

    #[test]
    fn provide_twice_returns_previous() {
        let mut services = Services::new();
        services.provide(Arc::new(Greeting("old")));
        let previous = services.provide(Arc::new(Greeting("new")));

        assert_eq!(previous.as_deref(), Some(&Greeting("old")));
        assert_eq!(*services.require::<Greeting>().unwrap(), Greeting("new"));
    }

    #[test]
    fn require_missing_names_the_type() {
        let services = Services::new();
        let err = services.require::<Greeting>().unwrap_err();
        assert!(err.to_string().contains("Greeting"), "{err}");
    }

    #[test]
    fn withdraw_removes() {
        let mut services = Services::new();
        services.provide(Arc::new(Greeting("bye")));
        assert!(services.withdraw::<Greeting>().is_some());
        assert!(!services.contains::<Greeting>());
    }
}
