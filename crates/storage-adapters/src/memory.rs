//! In-memory `KeyValueStore`. Lives as long as the process; nothing touches disk.

use std::sync::Arc;

use dashmap::DashMap;
use domains::KeyValueStore;
use once_cell::sync::Lazy;

static PROCESS_STORE: Lazy<Arc<MemoryStore>> = Lazy::new(|| Arc::new(MemoryStore::new()));

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single store shared by everything in this process.
    pub fn process_wide() -> Arc<MemoryStore> {
        Arc::clone(&PROCESS_STORE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            tracing::trace!(key, "storage entry removed");
        }
    }
}
