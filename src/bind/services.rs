//! Service lookup for parameters that are not bound from tokens.

use crate::command::ServiceKey;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// A shared, type-erased service instance.
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Supplies instances for service-shaped parameters.
///
/// The binder uses whatever the lookup returns verbatim; how the instance was
/// constructed is up to the host.
pub trait ServiceLookup {
    /// Instance registered under `key`, if any.
    fn lookup(&self, key: &ServiceKey) -> Option<ServiceInstance>;
}

/// Lookup that never has anything. Handy for tables without services.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoServices;

impl ServiceLookup for NoServices {
    fn lookup(&self, _key: &ServiceKey) -> Option<ServiceInstance> {
        None
    }
}

/// Map of service instances keyed by [`ServiceKey`].
///
/// Cloning is cheap; clones share the instances registered so far.
///
/// # Example
///
/// ```
/// use cmdkit::bind::{ServiceLookup, ServiceRegistry};
/// use cmdkit::command::ServiceKey;
///
/// struct Clock(u32);
///
/// let mut services = ServiceRegistry::new();
/// services.insert(Clock(7));
///
/// assert_eq!(services.get::<Clock>().unwrap().0, 7);
/// assert!(services.lookup(&ServiceKey::of::<Clock>()).is_some());
/// ```
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: Arc<HashMap<ServiceKey, ServiceInstance>>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under its own type's key.
    pub fn insert<T: Any + Send + Sync>(&mut self, service: T) {
        self.insert_named(ServiceKey::of::<T>(), service);
    }

    /// Register `service` under an explicit key.
    pub fn insert_named<T: Any + Send + Sync>(&mut self, key: ServiceKey, service: T) {
        let mut services = (*self.services).clone();
        services.insert(key, Arc::new(service));
        self.services = Arc::new(services);
    }

    /// Instance registered under `T`'s own key.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get_named(&ServiceKey::of::<T>())
    }

    /// Instance registered under `key`, if it is a `T`.
    pub fn get_named<T: Any + Send + Sync>(&self, key: &ServiceKey) -> Option<Arc<T>> {
        self.services
            .get(key)
            .and_then(|service| service.clone().downcast::<T>().ok())
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceLookup for ServiceRegistry {
    fn lookup(&self, key: &ServiceKey) -> Option<ServiceInstance> {
        self.services.get(key).cloned()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.services.keys().map(ServiceKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ServiceRegistry").field("services", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Greeter(String);

    #[test]
    fn test_insert_and_get() {
        let mut services = ServiceRegistry::new();
        assert!(services.is_empty());

        services.insert(Greeter("hi".into()));
        assert_eq!(services.len(), 1);
        assert_eq!(*services.get::<Greeter>().unwrap(), Greeter("hi".into()));
        assert!(services.get::<String>().is_none());
    }

    #[test]
    fn test_named_wrong_type() {
        let mut services = ServiceRegistry::new();
        services.insert_named(ServiceKey::named("greeter"), 5u32);
        assert!(services.get_named::<Greeter>(&ServiceKey::named("greeter")).is_none());
        assert_eq!(*services.get_named::<u32>(&ServiceKey::named("greeter")).unwrap(), 5);
    }

    #[test]
    fn test_clones_share_existing_entries() {
        let mut services = ServiceRegistry::new();
        services.insert(Greeter("a".into()));
        let snapshot = services.clone();
        services.insert(1u8);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn test_no_services() {
        assert!(NoServices.lookup(&ServiceKey::named("anything")).is_none());
    }
}
