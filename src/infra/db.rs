use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub type Db = sqlx::PgPool;

/// Connect to the account-secret store. The store holds enrolled per-account
/// secrets only; the service can run without it on the master secret alone.
pub async fn connect() -> anyhow::Result<Db> {
    let url = std::env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL missing"))?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .with_context(|| "failed to connect to secret store; check DATABASE_URL")?;
    Ok(pool)
}
