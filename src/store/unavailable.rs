use async_trait::async_trait;

use super::Store;

/// Store that is never reachable, like a worker deployed without a bound namespace.
#[derive(Default, Clone, Copy)]
pub struct UnavailableStore;

#[async_trait]
impl Store for UnavailableStore {
    async fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Err(anyhow::Error::msg("no key-value store available"))
    }

    async fn put(&self, _key: &str, _value: String) -> anyhow::Result<()> {
        Err(anyhow::Error::msg("no key-value store available"))
    }
}
