use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("key rejected by hmac")]
pub struct InvalidKey;

/// Derive a zero-padded `digits`-long decimal code for one counter value.
///
/// The counter is serialized as 8 bytes big-endian and keyed-hashed with
/// HMAC-SHA1; the result goes through standard dynamic truncation (offset
/// from the low nibble of the final byte, 31-bit big-endian read, reduced
/// modulo `10^digits`).
pub fn derive_code(key: &[u8], counter: u64, digits: u32) -> Result<String, InvalidKey> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| InvalidKey)?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    let code = binary % 10u32.pow(digits);
    Ok(format!("{code:0width$}", width = digits as usize))
}
