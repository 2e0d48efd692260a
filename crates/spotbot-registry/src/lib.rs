//! Stream subscription registry.
//!
//! Maps a stream key (a symbol, or the reserved account-stream key) to
//! an opaque subscription handle, enforcing at-most-one live
//! subscription per key. Subscription callbacks arrive on independent
//! execution contexts, so every operation is serialized behind one
//! mutex. The lock is held only for map mutation and lookup; releasing
//! the underlying network subscription is the caller's responsibility
//! after `remove` returns the handle.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

/// Reserved key for the account/user-data stream.
pub const ACCOUNT_STREAM_KEY: &str = "account";

/// Registry of live stream subscriptions.
///
/// Generic over the handle type: the registry is the single owner of
/// all live handles and never inspects them.
#[derive(Debug)]
pub struct SubscriptionRegistry<H> {
    entries: Mutex<HashMap<String, H>>,
}

impl<H> SubscriptionRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a handle for `key` unless one is already present.
    ///
    /// Returns false and leaves the existing entry untouched if the key
    /// is taken; the caller must not create a duplicate live
    /// subscription in that case.
    pub fn try_add(&self, key: &str, handle: H) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(key) {
            debug!(key, "subscription key already registered");
            return false;
        }
        entries.insert(key.to_string(), handle);
        true
    }

    /// Remove and return the handle for `key`, if present.
    pub fn remove(&self, key: &str) -> Option<H> {
        self.entries.lock().remove(key)
    }

    /// Whether a subscription exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Drain the registry, returning every live handle for release.
    pub fn remove_all(&self) -> Vec<H> {
        let mut entries = self.entries.lock();
        entries.drain().map(|(_, h)| h).collect()
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<H: Clone> SubscriptionRegistry<H> {
    /// Clone of the handle for `key`, if present.
    pub fn get_cloned(&self, key: &str) -> Option<H> {
        self.entries.lock().get(key).cloned()
    }
}

impl<H> Default for SubscriptionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_add_then_get() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.try_add("ETHBTC", 7u64));
        assert_eq!(registry.get_cloned("ETHBTC"), Some(7));
        assert!(registry.contains("ETHBTC"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_try_add_duplicate_keeps_existing() {
        let registry = SubscriptionRegistry::new();
        assert!(registry.try_add("ETHBTC", 7u64));
        assert!(!registry.try_add("ETHBTC", 8u64));
        assert_eq!(registry.get_cloned("ETHBTC"), Some(7));
    }

    #[test]
    fn test_remove_returns_handle() {
        let registry = SubscriptionRegistry::new();
        registry.try_add("ETHBTC", 7u64);

        assert_eq!(registry.remove("ETHBTC"), Some(7));
        assert_eq!(registry.remove("ETHBTC"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_all_drains() {
        let registry = SubscriptionRegistry::new();
        registry.try_add("ETHBTC", 1u64);
        registry.try_add("LTCBTC", 2u64);
        registry.try_add(ACCOUNT_STREAM_KEY, 3u64);

        let mut handles = registry.remove_all();
        handles.sort();
        assert_eq!(handles, vec![1, 2, 3]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_add_single_winner() {
        use std::sync::Arc;

        let registry = Arc::new(SubscriptionRegistry::new());
        let mut joins = Vec::new();
        for i in 0..8u64 {
            let reg = Arc::clone(&registry);
            joins.push(std::thread::spawn(move || reg.try_add("ETHBTC", i)));
        }

        let wins = joins
            .into_iter()
            .map(|j| j.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(registry.len(), 1);
    }
}
