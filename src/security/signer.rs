use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hex::ToHex;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Token encodings understood by delivery edges. Hex is the primary scheme;
/// some zones expect URL-safe unpadded base64 instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEncoding {
    Hex,
    Base64Url,
}

#[derive(Debug, Error)]
pub enum SignError {
    #[error("signing key is empty")]
    EmptyKey,
}

/// An expiring path token the CDN edge recomputes and checks before serving.
/// Built fresh per request; validity is entirely the edge's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub signature: String,
    pub expires_at: u64,
    pub path: String,
}

/// Signs resource paths for the private delivery zone.
///
/// The signature input is the exact concatenation of key bytes, resource
/// path, and the decimal expiry timestamp, with no separators; anything else
/// produces a token the edge rejects.
#[derive(Clone)]
pub struct UrlSigner {
    key: Vec<u8>,
    base_url: String,
    encoding: TokenEncoding,
}

impl UrlSigner {
    /// Build a signer from configured key material. The key is trimmed of
    /// incidental whitespace; a wrong key still signs, it just produces
    /// tokens the edge refuses.
    pub fn new(key: &str, base_url: &str, encoding: TokenEncoding) -> Result<Self, SignError> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(SignError::EmptyKey);
        }
        Ok(Self {
            key: trimmed.as_bytes().to_vec(),
            base_url: base_url.trim_end_matches('/').to_string(),
            encoding,
        })
    }

    pub fn sign(&self, path: &str, ttl_seconds: u64, now_unix: u64) -> SignedToken {
        let expires_at = now_unix + ttl_seconds;
        let mut hasher = Sha256::new();
        hasher.update(&self.key);
        hasher.update(path.as_bytes());
        hasher.update(expires_at.to_string().as_bytes());
        let digest = hasher.finalize();
        let signature = match self.encoding {
            TokenEncoding::Hex => digest.encode_hex::<String>(),
            TokenEncoding::Base64Url => URL_SAFE_NO_PAD.encode(digest),
        };
        SignedToken {
            signature,
            expires_at,
            path: path.to_string(),
        }
    }

    /// Full delivery URL carrying the token as query parameters.
    pub fn signed_url(&self, token: &SignedToken) -> String {
        format!(
            "{}{}?token={}&expires={}",
            self.base_url, token.path, token.signature, token.expires_at
        )
    }
}

/// Fixed template mapping an asset identifier to the CDN path of its HLS
/// playlist.
pub fn playlist_path(video_id: &str) -> String {
    format!("/{video_id}/playlist.m3u8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(encoding: TokenEncoding) -> UrlSigner {
        UrlSigner::new("edge-key", "https://vz-test.example.net", encoding)
            .expect("signer should build")
    }

    #[test]
    fn signature_matches_external_recomputation() {
        let token = signer(TokenEncoding::Hex).sign("/abc/playlist.m3u8", 3600, 1_700_000_000);
        let mut hasher = Sha256::new();
        hasher.update(b"edge-key");
        hasher.update(b"/abc/playlist.m3u8");
        hasher.update(b"1700003600");
        let expected = hasher.finalize().encode_hex::<String>();
        assert_eq!(token.signature, expected);
    }

    #[test]
    fn expiry_is_now_plus_ttl_exactly() {
        let token = signer(TokenEncoding::Hex).sign("/abc/playlist.m3u8", 3600, 1_700_000_000);
        assert_eq!(token.expires_at - 1_700_000_000, 3600);
    }

    #[test]
    fn any_input_change_changes_the_signature() {
        let base = signer(TokenEncoding::Hex).sign("/a/playlist.m3u8", 3600, 1_700_000_000);
        let other_path = signer(TokenEncoding::Hex).sign("/b/playlist.m3u8", 3600, 1_700_000_000);
        let other_expiry = signer(TokenEncoding::Hex).sign("/a/playlist.m3u8", 3601, 1_700_000_000);
        let other_key = UrlSigner::new("other-key", "https://vz-test.example.net", TokenEncoding::Hex)
            .unwrap()
            .sign("/a/playlist.m3u8", 3600, 1_700_000_000);
        assert_ne!(base.signature, other_path.signature);
        assert_ne!(base.signature, other_expiry.signature);
        assert_ne!(base.signature, other_key.signature);
    }

    #[test]
    fn key_is_trimmed_before_use() {
        let padded = UrlSigner::new(" edge-key \n", "https://vz-test.example.net", TokenEncoding::Hex)
            .unwrap()
            .sign("/a/playlist.m3u8", 60, 0);
        let plain = signer(TokenEncoding::Hex).sign("/a/playlist.m3u8", 60, 0);
        assert_eq!(padded.signature, plain.signature);
    }

    #[test]
    fn empty_key_is_a_configuration_error() {
        assert!(matches!(
            UrlSigner::new("   ", "https://vz-test.example.net", TokenEncoding::Hex),
            Err(SignError::EmptyKey)
        ));
    }

    #[test]
    fn hex_tokens_are_lowercase_hex() {
        let token = signer(TokenEncoding::Hex).sign("/a/playlist.m3u8", 60, 0);
        assert_eq!(token.signature.len(), 64);
        assert!(token
            .signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn base64url_tokens_are_unpadded_and_url_safe() {
        let token = signer(TokenEncoding::Base64Url).sign("/a/playlist.m3u8", 60, 0);
        assert_eq!(token.signature.len(), 43);
        assert!(!token.signature.contains('='));
        assert!(!token.signature.contains('+'));
        assert!(!token.signature.contains('/'));
    }

    #[test]
    fn signed_url_appends_token_and_expiry() {
        let s = signer(TokenEncoding::Hex);
        let token = s.sign(&playlist_path("abc-123"), 3600, 1_700_000_000);
        let url = s.signed_url(&token);
        assert!(url.starts_with("https://vz-test.example.net/abc-123/playlist.m3u8?token="));
        assert!(url.ends_with("&expires=1700003600"));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let s = UrlSigner::new("k", "https://vz-test.example.net/", TokenEncoding::Hex).unwrap();
        let token = s.sign("/v/playlist.m3u8", 60, 0);
        assert!(s
            .signed_url(&token)
            .starts_with("https://vz-test.example.net/v/playlist.m3u8?"));
    }

    #[test]
    fn playlist_path_uses_the_fixed_template() {
        assert_eq!(playlist_path("guid-1"), "/guid-1/playlist.m3u8");
    }
}
