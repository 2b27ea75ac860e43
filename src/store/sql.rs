use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::Store;

/// Table-backed store, one row per key.
pub struct SqlStore {
    db: SqlitePool,
}

impl SqlStore {
    pub async fn setup(db: SqlitePool) -> anyhow::Result<Self> {
        let create = r#"
create table if not exists counter_store (
    name varchar(255) not null,
    value varchar(255) not null,
    primary key (name)
)
"#;
        sqlx::query(create).execute(&db).await?;
        Ok(Self { db })
    }
}

#[async_trait]
impl Store for SqlStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("select value from counter_store where name = ?")
            .bind(key)
            .fetch_optional(&self.db)
            .await?;
        Ok(match row {
            Some(row) => Some(row.try_get::<String, _>("value")?),
            None => None,
        })
    }

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        sqlx::query(
            "insert into counter_store (name, value) values (?, ?)
            on conflict (name) do update set value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
