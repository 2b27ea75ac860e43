use std::sync::Arc;

use anyhow::Context;

use crate::store::Store;

pub const DEFAULT_KEY: &str = "count";

/// The single global counter, stored as a decimal string under one key.
///
/// Every failure of the store is returned to the caller; see
/// [`FallbackCounter`](crate::fallback::FallbackCounter) for the variant that
/// never fails.
///
/// `increment` is a plain read-modify-write without locking. Two concurrent
/// increments can read the same value and both write `value + 1`, losing one
/// visit. Visit counts are approximate, so this is accepted.
#[derive(Clone)]
pub struct Counter {
    store: Arc<dyn Store>,
    key: String,
}

impl Counter {
    pub fn new(store: Arc<dyn Store>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current count, zero when the key was never written.
    pub async fn get(&self) -> anyhow::Result<u64> {
        Ok(self.read().await?.unwrap_or(0))
    }

    /// Writes and returns the count plus one.
    pub async fn increment(&self) -> anyhow::Result<u64> {
        let current = self.read().await?.unwrap_or(0);
        let next = current.checked_add(1).context("counter overflow")?;
        self.store.put(&self.key, next.to_string()).await?;
        Ok(next)
    }

    async fn read(&self) -> anyhow::Result<Option<u64>> {
        let Some(raw) = self.store.get(&self.key).await? else {
            return Ok(None);
        };
        let count = raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("stored count {raw:?} is not a non-negative integer"))?;
        Ok(Some(count))
    }
}
