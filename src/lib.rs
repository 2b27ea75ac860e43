mod app;
pub mod client;
pub mod config;
pub mod counter;
mod cors;
#[cfg(feature = "sqlite")]
pub mod db;
mod errors;
pub mod fallback;
pub mod metrics;
pub mod routes;
pub mod store;
pub mod visitor;

pub mod prelude {
    pub use crate::app::App;
    pub use crate::client::client;
    pub use crate::config::{CloudflareConfig, CounterConfig, StoreKind};
    pub use crate::counter::Counter;
    pub use crate::errors::AppError;
    pub use crate::fallback::{Fallback, FallbackCounter};
    pub use crate::routes::Count;
    pub use crate::store::{CloudflareKvStore, MemoryStore, Store, UnavailableStore};
    pub use crate::visitor::{CountLabel, CounterClient, Session};
    pub use async_trait::async_trait;
    pub use axum::extract::{Json, Path};
    pub use axum::response::IntoResponse;
    pub use axum::routing::{get, post};
    pub use axum::{Extension, Router};
    pub use rust_embed::RustEmbed;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use tracing::{debug, error, info, trace, warn};

    #[cfg(feature = "sqlite")]
    pub use crate::db::sqlite;
    #[cfg(feature = "sqlite")]
    pub use crate::store::SqlStore;
}
