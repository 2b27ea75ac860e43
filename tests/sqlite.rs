#![cfg(feature = "sqlite")]

use serial_test::serial;
use sqlx::sqlite::SqlitePoolOptions;
use visitor_counter::prelude::*;

async fn memory_db() -> anyhow::Result<SqlStore> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    SqlStore::setup(pool).await
}

#[tokio::test]
async fn get_and_put() -> anyhow::Result<()> {
    let store = memory_db().await?;
    assert_eq!(store.get("count").await?, None);
    store.put("count", "1".into()).await?;
    store.put("count", "2".into()).await?;
    assert_eq!(store.get("count").await?.as_deref(), Some("2"));
    Ok(())
}

#[tokio::test]
async fn counter_over_table() -> anyhow::Result<()> {
    let counter = Counter::new(Arc::new(memory_db().await?), "count");
    for expected in 1..=5 {
        assert_eq!(counter.increment().await?, expected);
    }
    assert_eq!(counter.get().await?, 5);
    Ok(())
}

#[tokio::test]
#[serial]
async fn sqlite_store_from_env() -> anyhow::Result<()> {
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    let config = CounterConfig {
        store: StoreKind::Sqlite,
        ..Default::default()
    };
    let store = visitor_counter::store::connect(&config).await;
    std::env::remove_var("DATABASE_URL");
    let counter = Counter::new(store, "count");
    assert_eq!(counter.increment().await?, 1);
    assert_eq!(counter.get().await?, 1);
    Ok(())
}
