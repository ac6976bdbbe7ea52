use tracing::warn;

use crate::security::signer::TokenEncoding;

const DEFAULT_DRIFT_WINDOW: u32 = 1;
const DEFAULT_URL_TTL_SECS: u64 = 3600;

/// Process-wide access configuration, read from the environment at startup.
///
/// The signing key and the master secret are both optional here: a missing
/// signing key disables URL issuance but not verification, and a missing
/// master secret just means the pool comes entirely from the store.
#[derive(Clone)]
pub struct AccessConfig {
    pub master_secret: Option<String>,
    pub signing_key: Option<String>,
    pub delivery_base_url: String,
    pub token_encoding: TokenEncoding,
    pub drift_window: u32,
    pub url_ttl_seconds: u64,
}

impl AccessConfig {
    pub fn from_env() -> Self {
        let master_secret = env_string("MASTER_TOTP_SECRET");
        if master_secret.is_none() {
            warn!("MASTER_TOTP_SECRET not set; only store-enrolled secrets will be accepted");
        }

        let signing_key = env_string("DELIVERY_TOKEN_KEY");
        if signing_key.is_none() {
            warn!("DELIVERY_TOKEN_KEY not set; signed URL issuance is disabled");
        }

        let delivery_base_url = env_string("DELIVERY_BASE_URL").unwrap_or_else(|| {
            warn!("DELIVERY_BASE_URL not set; falling back to http://localhost");
            "http://localhost".into()
        });

        let token_encoding = env_string("DELIVERY_TOKEN_ENCODING")
            .and_then(|v| parse_encoding(&v))
            .unwrap_or(TokenEncoding::Hex);

        let drift_window = env_u32("TOTP_DRIFT_WINDOW").unwrap_or(DEFAULT_DRIFT_WINDOW);
        let url_ttl_seconds = env_u64("SIGNED_URL_TTL_SECS").unwrap_or(DEFAULT_URL_TTL_SECS);

        AccessConfig {
            master_secret,
            signing_key,
            delivery_base_url,
            token_encoding,
            drift_window,
            url_ttl_seconds,
        }
    }
}

pub(crate) fn parse_encoding(value: &str) -> Option<TokenEncoding> {
    match value.trim().to_ascii_lowercase().as_str() {
        "hex" => Some(TokenEncoding::Hex),
        "base64url" | "base64" => Some(TokenEncoding::Base64Url),
        other => {
            warn!("unrecognized DELIVERY_TOKEN_ENCODING {other:?}; using hex");
            None
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
