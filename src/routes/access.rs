use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::error::ApiError;
use crate::security::{signer, totp};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/access/secure-url", post(secure_url))
}

#[derive(Deserialize)]
struct SecureUrlPayload {
    code: String,
    video_id: String,
}

#[derive(Serialize)]
struct SecureUrlResponse {
    success: bool,
    url: String,
}

/// Exchange a one-time code for a short-lived signed delivery URL.
///
/// Authorization is stateless: the same code can be exchanged again within
/// its validity window, and time-boxing is the only anti-replay control.
async fn secure_url(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SecureUrlPayload>,
) -> Result<Json<SecureUrlResponse>, ApiError> {
    let video_id = payload.video_id.trim();
    if payload.code.trim().is_empty() || video_id.is_empty() {
        return Err(ApiError::BadRequest("missing code or video id".into()));
    }
    if !valid_video_id(video_id) {
        return Err(ApiError::BadRequest("invalid video id".into()));
    }

    let pool = state.secrets.fetch_active_secrets().await;
    let now = OffsetDateTime::now_utc().unix_timestamp() as u64;
    if !totp::authorize(&payload.code, &pool, now, state.config.drift_window) {
        return Err(ApiError::Unauthorized);
    }

    let path = signer::playlist_path(video_id);
    let signer = state.signer.as_ref().ok_or(ApiError::Misconfigured)?;
    let token = signer.sign(&path, state.config.url_ttl_seconds, now);
    info!(video_id, expires_at = token.expires_at, "issued signed delivery url");

    Ok(Json(SecureUrlResponse {
        success: true,
        url: signer.signed_url(&token),
    }))
}

fn valid_video_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_ids_are_restricted_to_a_safe_charset() {
        assert!(valid_video_id("0c5e0b8e-6d5a-4a3c-9a9e-0f1e2d3c4b5a"));
        assert!(valid_video_id("solo_basement_talk"));
        assert!(!valid_video_id(""));
        assert!(!valid_video_id("../../etc/passwd"));
        assert!(!valid_video_id("a/playlist"));
        assert!(!valid_video_id("a?b"));
        assert!(!valid_video_id(&"x".repeat(129)));
    }
}
