use once_cell::sync::Lazy;
use thiserror::Error;

/// RFC 4648 alphabet; shared secrets are exchanged in this form.
const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

static DECODE_MAP: Lazy<[i8; 128]> = Lazy::new(|| {
    let mut map = [-1i8; 128];
    for (value, &symbol) in ALPHABET.iter().enumerate() {
        map[symbol as usize] = value as i8;
    }
    map
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("secret is empty")]
    Empty,
    #[error("invalid base32 character {0:?}")]
    InvalidCharacter(char),
}

/// Decode an unpadded or padded base32 secret into raw key bytes.
///
/// Input is uppercased and trailing `=` padding is stripped before decoding.
/// Decoding is strict: any other out-of-alphabet character fails with
/// [`DecodeError::InvalidCharacter`] rather than being skipped. A trailing
/// group of fewer than 8 bits is discarded.
pub fn decode(secret: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = secret.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut out = Vec::with_capacity(trimmed.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for ch in trimmed.chars() {
        let upper = ch.to_ascii_uppercase();
        let value = if upper.is_ascii() {
            DECODE_MAP[upper as usize]
        } else {
            -1
        };
        if value < 0 {
            return Err(DecodeError::InvalidCharacter(ch));
        }
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
        }
    }

    Ok(out)
}

/// Encode raw key bytes as unpadded base32.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in bytes {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::BASE32_NOPAD;

    #[test]
    fn decodes_known_secret() {
        let bytes = decode("JBSWY3DPEHPK3PXP").expect("secret should decode");
        assert_eq!(bytes, b"Hello!\xde\xad\xbe\xef");
    }

    #[test]
    fn decodes_rfc6238_test_key() {
        let bytes =
            decode("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").expect("secret should decode");
        assert_eq!(bytes, b"12345678901234567890");
    }

    #[test]
    fn lowercase_and_padding_are_normalized() {
        let padded = decode("jbswy3dpehpk3pxp======").expect("secret should decode");
        assert_eq!(padded, decode("JBSWY3DPEHPK3PXP").unwrap());
    }

    #[test]
    fn rejects_out_of_alphabet_characters() {
        assert_eq!(decode("JBSW1"), Err(DecodeError::InvalidCharacter('1')));
        assert_eq!(decode("JB SW"), Err(DecodeError::InvalidCharacter(' ')));
        assert_eq!(decode("JBSW8"), Err(DecodeError::InvalidCharacter('8')));
        assert_eq!(decode("JBSWé"), Err(DecodeError::InvalidCharacter('é')));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(decode(""), Err(DecodeError::Empty));
        assert_eq!(decode("===="), Err(DecodeError::Empty));
        assert_eq!(decode("   "), Err(DecodeError::Empty));
    }

    #[test]
    fn partial_trailing_group_is_discarded() {
        // 15 symbols carry 75 bits: 9 whole bytes, 3 bits dropped.
        let full = decode("JBSWY3DPEHPK3PXP").unwrap();
        let short = decode("JBSWY3DPEHPK3PX").expect("secret should decode");
        assert_eq!(short, full[..9]);
    }

    #[test]
    fn encode_matches_reference_encoding() {
        for bytes in [
            &b"12345678901234567890"[..],
            &b"Hello!\xde\xad\xbe\xef"[..],
            &b"\x00"[..],
            &b"\xff\xff\xff"[..],
            &[][..],
        ] {
            assert_eq!(encode(bytes), BASE32_NOPAD.encode(bytes));
        }
    }

    #[test]
    fn round_trips_through_decode() {
        let bytes = b"\x00\x01\x02\xfa\xfb\xfc\x7f";
        assert_eq!(decode(&encode(bytes)).unwrap(), bytes);
    }
}
