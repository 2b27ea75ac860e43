use async_trait::async_trait;
use dashmap::DashMap;

use super::Store;

/// In-process store for local development and tests. State is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `value` under `key`.
    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.data.insert(key.to_string(), value.to_string());
        store
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.data.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}
