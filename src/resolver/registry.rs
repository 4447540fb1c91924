//! Host to adapter registry.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::adapter::VerbAdapter;

// ============================================================================
// Registry
// ============================================================================

/// One [`VerbAdapter`] per host, created on first use.
///
/// Append-only. Lookups of known hosts take a read lock; an unseen host is
/// created under the write lock after re-checking the entry, so concurrent
/// first requests for a host share one adapter.
#[derive(Debug, Default)]
pub struct Registry {
    adapters: RwLock<FxHashMap<String, Arc<VerbAdapter>>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the adapter for `host` if it exists.
    #[must_use]
    pub fn get(&self, host: &str) -> Option<Arc<VerbAdapter>> {
        self.adapters.read().get(host).cloned()
    }

    /// Returns the adapter for `host`, creating it with `create` if needed.
    ///
    /// `create` runs at most once per host and must not block.
    pub fn get_or_insert_with<F>(&self, host: &str, create: F) -> Arc<VerbAdapter>
    where
        F: FnOnce() -> VerbAdapter,
    {
        if let Some(adapter) = self.get(host) {
            return adapter;
        }

        let mut adapters = self.adapters.write();
        if let Some(adapter) = adapters.get(host) {
            return Arc::clone(adapter);
        }

        let adapter = Arc::new(create());
        adapters.insert(host.to_string(), Arc::clone(&adapter));
        info!(host, hosts = adapters.len(), "Adapter created");
        adapter
    }

    /// Returns the known hosts, sorted.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.adapters.read().keys().cloned().collect();
        hosts.sort_unstable();
        hosts
    }

    /// Returns a snapshot of every adapter.
    #[must_use]
    pub fn adapters(&self) -> Vec<Arc<VerbAdapter>> {
        self.adapters.read().values().cloned().collect()
    }

    /// Returns the number of hosts.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    /// Returns `true` if no host has been seen.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::protocol::fake::FakeDevice;
    use crate::settings::Settings;

    #[test]
    fn test_create_once_per_host() {
        let device = FakeDevice::new();
        let registry = Registry::new();
        let created = AtomicUsize::new(0);
        let make = |host: &str| {
            created.fetch_add(1, Ordering::SeqCst);
            VerbAdapter::new(host, &Settings::default(), device.connector())
        };

        let a = registry.get_or_insert_with("r1", || make("r1"));
        let b = registry.get_or_insert_with("r1", || make("r1"));
        registry.get_or_insert_with("r0", || make("r0"));

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert_eq!(registry.hosts(), vec!["r0", "r1"]);
        assert_eq!(registry.adapters().len(), 2);
    }

    #[test]
    fn test_get_unknown_host() {
        let registry = Registry::new();
        assert!(registry.get("r1").is_none());
        assert!(registry.is_empty());
    }
}
