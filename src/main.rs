use axum::http::Method;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidgate::config::AccessConfig;
use vidgate::infra::{db, secrets::SecretStore};
use vidgate::security::signer::UrlSigner;
use vidgate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AccessConfig::from_env();

    let db = match db::connect().await {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!("secret store unavailable: {err:#}; continuing with master secret only");
            None
        }
    };
    let secrets = SecretStore::new(db, config.master_secret.clone());

    let signer = match &config.signing_key {
        Some(key) => match UrlSigner::new(key, &config.delivery_base_url, config.token_encoding) {
            Ok(signer) => Some(signer),
            Err(err) => {
                warn!("signed URL issuance disabled: {err}");
                None
            }
        },
        None => None,
    };

    let shared_state = AppState::new(config, secrets, signer);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .merge(vidgate::routes::router())
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
