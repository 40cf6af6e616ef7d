//! Process-local cart storage.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use till::cart::CartLine;
use tokio::sync::Mutex;

use crate::storage::{CartStorage, CartStorageError};

/// Keeps serialized carts in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryCartStorage {
    entries: Mutex<FxHashMap<String, String>>,
}

impl InMemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON stored under `key`.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl CartStorage for InMemoryCartStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<CartLine>>, CartStorageError> {
        let entries = self.entries.lock().await;

        entries
            .get(key)
            .map(|raw| serde_json::from_str(raw))
            .transpose()
            .map_err(CartStorageError::from)
    }

    async fn save(&self, key: &str, lines: &[CartLine]) -> Result<(), CartStorageError> {
        let raw = serde_json::to_string(lines)?;

        self.entries.lock().await.insert(key.to_string(), raw);

        Ok(())
    }
}
