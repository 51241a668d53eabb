//! The API key store.
//!
//! A concurrency-safe allow-list: reads are lock-shared, writes (issuance)
//! are serialized by the lock so concurrent issuers cannot lose updates.

use std::collections::HashSet;
use std::sync::RwLock;
use tracing::info;

/// Allow-listed client API keys.
pub struct KeyStore {
    keys: RwLock<HashSet<String>>,
}

impl KeyStore {
    /// Create a store seeded with the configured keys.
    pub fn new(seed: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: RwLock::new(seed.into_iter().collect()),
        }
    }

    /// Is this key allow-listed?
    pub fn contains(&self, key: &str) -> bool {
        self.keys
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(key)
    }

    /// Add a key to the allow-list.
    pub fn add(&self, key: impl Into<String>) {
        self.keys
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into());
    }

    /// Mint a fresh key, add it, and return it.
    pub fn issue(&self) -> String {
        let key = uuid::Uuid::new_v4().to_string();
        self.add(key.clone());
        info!("Issued a new API key");
        key
    }

    /// Number of allow-listed keys.
    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
