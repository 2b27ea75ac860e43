//! Key-value store capability behind the counter.
//!
//! The counter only needs two calls against the external store: read a string
//! value for a key and write one back. There is no transaction or compare-and-set
//! in the contract, so read-modify-write sequences built on top of it are racy.

mod cloudflare;
mod memory;
#[cfg(feature = "sqlite")]
mod sql;
mod unavailable;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{CounterConfig, StoreKind};

pub use cloudflare::CloudflareKvStore;
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sql::SqlStore;
pub use unavailable::UnavailableStore;

#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Value stored under `key`, or `None` when the key was never written.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()>;
}

/// Opens the backend chosen by the configuration.
/// A backend that cannot be opened degrades to [`UnavailableStore`] so the
/// service keeps answering with fallback values.
pub async fn connect(config: &CounterConfig) -> Arc<dyn Store> {
    crate::app::logger();
    let opened: anyhow::Result<Arc<dyn Store>> = match &config.store {
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreKind::Disabled => Ok(Arc::new(UnavailableStore)),
        StoreKind::Cloudflare => match &config.cloudflare {
            Some(cf) => Ok(Arc::new(CloudflareKvStore::new(cf.clone()))),
            None => Err(anyhow::Error::msg("cloudflare store selected without credentials")),
        },
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => open_sqlite().await,
        #[cfg(not(feature = "sqlite"))]
        StoreKind::Sqlite => Err(anyhow::Error::msg(
            "sqlite store selected but the sqlite feature is not enabled",
        )),
    };
    match opened {
        Ok(store) => {
            info!(store = ?config.store, key = %config.key, "Counter store ready");
            store
        }
        Err(e) => {
            warn!(store = ?config.store, error = %e, "Counter store unavailable, serving fallback values");
            Arc::new(UnavailableStore)
        }
    }
}

#[cfg(feature = "sqlite")]
async fn open_sqlite() -> anyhow::Result<Arc<dyn Store>> {
    let pool = crate::db::sqlite().await?;
    Ok(Arc::new(SqlStore::setup(pool).await?))
}
