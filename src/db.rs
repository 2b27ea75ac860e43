pub async fn sqlite() -> anyhow::Result<sqlx::SqlitePool> {
    // May be opened before the app is constructed, so trigger dotenvs in both situations
    dotenvy::dotenv().ok();
    crate::app::logger();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::Error::msg("DATABASE_URL environment variable not set"))?;
    let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;
    Ok(pool)
}
