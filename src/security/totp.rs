use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::domain::secret::Secret;
use crate::security::{base32, hotp};

/// Width of one time bucket. Fixed for the lifetime of a deployment:
/// changing it invalidates every enrolled client generator.
pub const STEP_SECONDS: u64 = 30;

/// Length of the decimal codes clients present.
pub const CODE_DIGITS: u32 = 6;

const SECRET_BYTES: usize = 20;

/// Counter value for a given wall-clock second.
pub fn time_step(now_unix: u64) -> u64 {
    now_unix / STEP_SECONDS
}

/// Check one presented code against one decoded key, tolerating `window`
/// steps of clock drift on either side of the current step.
///
/// The presented code is stripped of whitespace first; anything that is not
/// exactly [`CODE_DIGITS`] decimal digits afterwards is rejected without
/// touching the key.
pub fn verify_code(presented: &str, key: &[u8], now_unix: u64, window: u32) -> bool {
    let code: String = presented.chars().filter(|c| !c.is_whitespace()).collect();
    if code.len() != CODE_DIGITS as usize || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let center = time_step(now_unix);
    let first = center.saturating_sub(window as u64);
    let last = center.saturating_add(window as u64);
    for counter in first..=last {
        match hotp::derive_code(key, counter, CODE_DIGITS) {
            Ok(candidate) if candidate == code => return true,
            Ok(_) | Err(_) => {}
        }
    }
    false
}

/// Try a presented code against an ordered pool of candidate secrets,
/// returning true on the first match.
///
/// A secret that fails to decode is skipped; one bad entry never aborts the
/// scan. An empty pool always fails.
pub fn authorize(presented: &str, pool: &[Secret], now_unix: u64, window: u32) -> bool {
    for secret in pool {
        let key = match base32::decode(&secret.material) {
            Ok(key) => key,
            Err(err) => {
                debug!(origin = ?secret.origin, "skipping undecodable secret: {err}");
                continue;
            }
        };
        if verify_code(presented, &key, now_unix, window) {
            return true;
        }
    }
    false
}

/// Generate a fresh base32 shared secret for enrollment.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    base32::encode(&bytes)
}

/// Enrollment URL understood by standard authenticator apps.
pub fn otpauth_url(issuer: &str, account: &str, secret_b32: &str) -> String {
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
        urlencoding::encode(issuer),
        urlencoding::encode(account),
        secret_b32,
        urlencoding::encode(issuer),
        CODE_DIGITS,
        STEP_SECONDS,
    )
}
