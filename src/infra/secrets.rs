use sqlx::Row;
use tracing::warn;

use crate::domain::secret::Secret;
use crate::infra::db::Db;

/// Candidate-secret provider, constructed once in `main` and handed to the
/// request handlers through shared state.
///
/// The pool it returns is ordered: the operator-configured master secret
/// first, then account secrets in enrollment order. When the store is
/// unconfigured or unreachable it degrades to whatever it has rather than
/// failing the request outright; with neither store nor master secret the
/// pool is empty and authorization fails downstream.
#[derive(Clone)]
pub struct SecretStore {
    db: Option<Db>,
    master: Option<String>,
}

impl SecretStore {
    pub fn new(db: Option<Db>, master: Option<String>) -> Self {
        if db.is_none() && master.is_none() {
            warn!("no secret store and no master secret configured; every code will be rejected");
        }
        Self { db, master }
    }

    pub async fn fetch_active_secrets(&self) -> Vec<Secret> {
        let mut pool = Vec::new();
        if let Some(master) = &self.master {
            pool.push(Secret::master(master.clone()));
        }

        let Some(db) = &self.db else {
            return pool;
        };

        let rows = sqlx::query(
            "SELECT secret_b32 FROM access_secrets WHERE active ORDER BY created_at, id",
        )
        .fetch_all(db)
        .await;

        match rows {
            Ok(rows) => {
                pool.extend(
                    rows.into_iter()
                        .map(|row| Secret::account(row.get::<String, _>("secret_b32"))),
                );
            }
            Err(err) => {
                warn!("secret store unavailable, continuing with degraded pool: {err}");
            }
        }
        pool
    }
}
