//! Singleton Registry
//!
//! Well-known managed instances registered under a name so native code can
//! address them without constructing anything. Handles are opaque tokens
//! minted by the embedding runtime; the registry only stores them, and
//! dropping an entry does not release whatever the token refers to.

use dashmap::DashMap;
use gangway_sdk::InstanceHandle;

/// Name-to-instance table for well-known singletons.
#[derive(Debug, Default)]
pub struct SingletonRegistry {
    entries: DashMap<String, InstanceHandle>,
}

impl SingletonRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under a name, replacing any previous entry.
    pub fn register(&self, name: &str, handle: InstanceHandle) {
        log::debug!("register singleton {name} -> {:#x}", handle.raw());
        self.entries.insert(name.to_string(), handle);
    }

    /// Look up a singleton by name.
    pub fn get(&self, name: &str) -> Option<InstanceHandle> {
        self.entries.get(name).map(|e| *e)
    }

    /// Remove one entry. Returns true if the name was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Remove every entry.
    pub fn unregister_all(&self) {
        self.entries.clear();
    }

    /// Number of registered singletons.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let registry = SingletonRegistry::new();
        registry.register("app.AudioEngine", InstanceHandle(0xBEEF));

        assert_eq!(registry.get("app.AudioEngine"), Some(InstanceHandle(0xBEEF)));
        assert_eq!(registry.get("app.Missing"), None);
    }

    #[test]
    fn test_register_replaces() {
        let registry = SingletonRegistry::new();
        registry.register("app.AudioEngine", InstanceHandle(1));
        registry.register("app.AudioEngine", InstanceHandle(2));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("app.AudioEngine"), Some(InstanceHandle(2)));
    }

    #[test]
    fn test_unregister() {
        let registry = SingletonRegistry::new();
        registry.register("app.AudioEngine", InstanceHandle(1));

        assert!(registry.unregister("app.AudioEngine"));
        assert!(!registry.unregister("app.AudioEngine"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_all() {
        let registry = SingletonRegistry::new();
        registry.register("a", InstanceHandle(1));
        registry.register("b", InstanceHandle(2));

        registry.unregister_all();
        assert!(registry.is_empty());
    }
}
