//! Component registry: the single source of truth mapping component id to
//! component implementation.
//!
//! The registry is an explicit object constructed once at the composition
//! root and shared by `Arc` with the execution engine and facade. There is
//! no global registry and no import-time side effects; built-ins are
//! collected via `with_builtins` from link-time `inventory` submissions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::component::{Component, ComponentCtor};
use crate::error::{EngineError, Result};
use crate::types::{ComponentDefinition, ComponentId};

/// A change notification from the registry
///
/// Notifications drive the UI's dynamic node palette; no other part of the
/// system depends on notification ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A component was registered (or replaced) under this id
    Registered(ComponentId),
    /// A component was removed
    Unregistered(ComponentId),
}

type Subscriber = Box<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Registry of component types
///
/// Writes are expected while no execution is in flight for the affected
/// component; the engine resolves components per node at dispatch time and
/// holds each `Arc<dyn Component>` only for the duration of that node.
pub struct ComponentRegistry {
    components: RwLock<HashMap<ComponentId, Arc<dyn Component>>>,
    subscribers: Mutex<Vec<(usize, Subscriber)>>,
    next_subscriber_id: Mutex<usize>,
    /// Reject duplicate registrations instead of overwriting
    strict: bool,
}

impl ComponentRegistry {
    /// Create a new empty registry (overwrite allowed, the marketplace
    /// install/update default)
    pub fn new() -> Self {
        Self {
            components: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber_id: Mutex::new(0),
            strict: false,
        }
    }

    /// Create a registry that fails registration on duplicate ids
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::new()
        }
    }

    /// Create a registry pre-populated with all link-time built-ins
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register every link-time built-in into this registry
    pub fn register_builtins(&self) {
        for ctor in inventory::iter::<ComponentCtor> {
            let component = (ctor.0)();
            // Built-ins are registered exactly once; errors are impossible
            // in non-strict mode.
            let _ = self.register(component);
        }
    }

    /// Register a component, inserting or replacing by id.
    ///
    /// In strict mode, replacing an existing id fails with
    /// `DuplicateComponent`. Emits `Registered` to subscribers on success.
    pub fn register(&self, component: Arc<dyn Component>) -> Result<()> {
        let id = component.definition().id;
        {
            let mut components = self.components.write();
            if self.strict && components.contains_key(&id) {
                return Err(EngineError::DuplicateComponent(id));
            }
            components.insert(id.clone(), component);
        }
        log::debug!("Registered component '{}'", id);
        self.notify(&RegistryEvent::Registered(id));
        Ok(())
    }

    /// Remove a component by id, returning whether it was present.
    ///
    /// Emits `Unregistered` to subscribers when a component was removed.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.components.write().remove(id).is_some();
        if removed {
            log::debug!("Unregistered component '{}'", id);
            self.notify(&RegistryEvent::Unregistered(id.to_string()));
        }
        removed
    }

    /// Look up a component by id.
    ///
    /// Returns `None` rather than erroring so callers decide how to handle
    /// missing components.
    pub fn get(&self, id: &str) -> Option<Arc<dyn Component>> {
        self.components.read().get(id).cloned()
    }

    /// Look up a component's definition by id
    pub fn definition(&self, id: &str) -> Option<ComponentDefinition> {
        self.components.read().get(id).map(|c| c.definition())
    }

    /// All registered definitions; order is not significant
    pub fn list(&self) -> Vec<ComponentDefinition> {
        self.components
            .read()
            .values()
            .map(|c| c.definition())
            .collect()
    }

    /// Check whether a component id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.components.read().contains_key(id)
    }

    /// Number of registered components
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }

    /// Subscribe to change notifications; returns an id for `unsubscribe`
    pub fn subscribe(
        &self,
        callback: impl Fn(&RegistryEvent) + Send + Sync + 'static,
    ) -> usize {
        let mut next = self.next_subscriber_id.lock();
        let id = *next;
        *next += 1;
        self.subscribers.lock().push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription by id
    pub fn unsubscribe(&self, subscription_id: usize) {
        self.subscribers
            .lock()
            .retain(|(id, _)| *id != subscription_id);
    }

    fn notify(&self, event: &RegistryEvent) {
        for (_, subscriber) in self.subscribers.lock().iter() {
            subscriber(event);
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::CallbackComponent;
    use crate::types::{
        ComponentCategory, ExecutorSpec, PortDataType, PortDefinition,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_component(id: &str, label: &str) -> Arc<dyn Component> {
        let definition = ComponentDefinition {
            id: id.to_string(),
            category: ComponentCategory::Data,
            label: label.to_string(),
            description: "Test component".to_string(),
            inputs: vec![],
            outputs: vec![PortDefinition::optional("out", "Out", PortDataType::Any)],
            configuration: vec![],
            executor: ExecutorSpec::local(),
        };
        Arc::new(CallbackComponent::new(definition, |_inputs, _config| async {
            Ok(Default::default())
        }))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ComponentRegistry::new();
        registry.register(test_component("walletConnector", "Wallet")).unwrap();

        assert!(registry.contains("walletConnector"));
        assert!(!registry.contains("unknown"));
        assert!(registry.get("walletConnector").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.definition("walletConnector").unwrap().label, "Wallet");
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_overwrite_replaces_definition() {
        let registry = ComponentRegistry::new();
        registry.register(test_component("swap", "Old")).unwrap();
        registry.register(test_component("swap", "New")).unwrap();

        // Replacement, not a merge of old and new
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.definition("swap").unwrap().label, "New");
    }

    #[test]
    fn test_strict_mode_rejects_duplicates() {
        let registry = ComponentRegistry::strict();
        registry.register(test_component("swap", "First")).unwrap();

        let err = registry.register(test_component("swap", "Second")).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateComponent(_)));
        assert_eq!(registry.definition("swap").unwrap().label, "First");
    }

    #[test]
    fn test_unregister() {
        let registry = ComponentRegistry::new();
        registry.register(test_component("bridge", "Bridge")).unwrap();

        assert!(registry.unregister("bridge"));
        assert!(!registry.unregister("bridge"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_notifications() {
        let registry = ComponentRegistry::new();
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        let subscription = registry.subscribe(move |event| {
            events_clone.lock().push(event.clone());
        });

        registry.register(test_component("a", "A")).unwrap();
        registry.unregister("a");

        {
            let seen = events.lock();
            assert_eq!(seen.len(), 2);
            assert_eq!(seen[0], RegistryEvent::Registered("a".to_string()));
            assert_eq!(seen[1], RegistryEvent::Unregistered("a".to_string()));
        }

        registry.unsubscribe(subscription);
        registry.register(test_component("b", "B")).unwrap();
        assert_eq!(events.lock().len(), 2);
    }

    #[test]
    fn test_unregister_missing_emits_nothing() {
        let registry = ComponentRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        registry.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.unregister("ghost");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
