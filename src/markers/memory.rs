//! In-memory marker store for testing.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use crate::markers::MarkerStore;

/// Thread-safe in-memory marker store.
///
/// Markers live in a `RwLock<HashMap>` and die with the store. The
/// backdating helper lets tests simulate marker age without sleeping.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    markers: RwLock<HashMap<String, SystemTime>>,
}

impl MemoryMarkerStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key's timestamp to `secs` seconds in the past.
    pub fn backdate(&self, key: &str, secs: u64) {
        let ts = SystemTime::now() - Duration::from_secs(secs);
        if let Ok(mut markers) = self.markers.write() {
            markers.insert(key.to_string(), ts);
        }
    }

    /// Remove a key entirely.
    pub fn remove(&self, key: &str) {
        if let Ok(mut markers) = self.markers.write() {
            markers.remove(key);
        }
    }

    /// Number of markers currently stored.
    pub fn len(&self) -> usize {
        self.markers.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether the store holds no markers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn touch(&self, key: &str) {
        if let Ok(mut markers) = self.markers.write() {
            markers.insert(key.to_string(), SystemTime::now());
        }
    }

    fn timestamp(&self, key: &str) -> Option<SystemTime> {
        self.markers.read().ok()?.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::tests::test_marker_store_basics;

    #[test]
    fn test_memory_store_basics() {
        let store = MemoryMarkerStore::new();
        test_marker_store_basics(&store);
    }

    #[test]
    fn test_backdate() {
        let store = MemoryMarkerStore::new();
        store.backdate("k", 120);

        let age = store.age_seconds("k").unwrap();
        assert!(age >= 119.0 && age < 130.0, "backdated age was {age}");
    }

    #[test]
    fn test_remove() {
        let store = MemoryMarkerStore::new();
        store.touch("k");
        assert!(!store.is_empty());

        store.remove("k");
        assert!(store.timestamp("k").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_debounce_thresholds() {
        use crate::markers::LINT_DEBOUNCE_SECS;

        let store = MemoryMarkerStore::new();

        // Edited 2 seconds ago: inside the window, lint suppressed.
        store.backdate("last-edit-time", 2);
        let age = store.age_seconds("last-edit-time").unwrap();
        assert!(age < LINT_DEBOUNCE_SECS);

        // Edited 15 seconds ago: outside the window, lint runs.
        store.backdate("last-edit-time", 15);
        let age = store.age_seconds("last-edit-time").unwrap();
        assert!(age >= LINT_DEBOUNCE_SECS);
    }
}
