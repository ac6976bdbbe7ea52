//! Operator CLI for the secret store: create the schema and enroll
//! per-account secrets.
//!
//! Usage:
//!   provision init
//!   provision add <email> [label]

use anyhow::bail;
use uuid::Uuid;

use vidgate::infra::db;
use vidgate::security::totp;

const ISSUER: &str = "Vidgate";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("init") => init().await,
        Some("add") => {
            let Some(email) = args.get(1) else {
                bail!("usage: provision add <email> [label]");
            };
            add(email, args.get(2).map(String::as_str)).await
        }
        _ => bail!("usage: provision <init|add> ..."),
    }
}

async fn init() -> anyhow::Result<()> {
    let pool = db::connect().await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS access_secrets (
            id UUID PRIMARY KEY,
            email TEXT,
            label TEXT,
            secret_b32 TEXT NOT NULL,
            active BOOLEAN NOT NULL DEFAULT true,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(&pool)
    .await?;
    println!("access_secrets table ready");
    Ok(())
}

async fn add(email: &str, label: Option<&str>) -> anyhow::Result<()> {
    let pool = db::connect().await?;
    let secret = totp::generate_secret();

    sqlx::query(
        "INSERT INTO access_secrets (id, email, label, secret_b32, active)
         VALUES ($1, $2, $3, $4, true)",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(label)
    .bind(&secret)
    .execute(&pool)
    .await?;

    println!("enrolled {email}");
    println!("secret: {secret}");
    println!("enroll with an authenticator app:");
    println!("{}", totp::otpauth_url(ISSUER, email, &secret));
    Ok(())
}
