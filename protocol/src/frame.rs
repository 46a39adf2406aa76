//! Wire encodings for the three handshake messages.
//!
//! Frame 1/2 carry a raw 32-byte X25519 public key. Frame 3 carries the base
//! time as ASCII decimal digits, no trailing newline, per the external
//! interface contract.

use crate::errors::{Error, Result};

/// Encode a public key as its raw 32 bytes (the frame payload itself).
pub fn encode_public_key(key: &[u8; 32]) -> Vec<u8> {
    key.to_vec()
}

/// Decode a frame payload as a raw 32-byte public key.
pub fn decode_public_key(payload: &[u8]) -> Result<[u8; 32]> {
    payload
        .try_into()
        .map_err(|_| Error::link_broken("public key frame is not 32 bytes"))
}

/// Encode the base time as ASCII decimal digits.
pub fn encode_base_time(t0: i64) -> Vec<u8> {
    t0.to_string().into_bytes()
}

/// Decode a frame payload as ASCII decimal digits into the base time.
pub fn decode_base_time(payload: &[u8]) -> Result<i64> {
    let s = std::str::from_utf8(payload)
        .map_err(|_| Error::link_broken("base time frame is not valid ASCII"))?;
    s.trim()
        .parse::<i64>()
        .map_err(|_| Error::link_broken("base time frame is not a decimal integer"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_roundtrip() {
        let key = [9u8; 32];
        let payload = encode_public_key(&key);
        assert_eq!(decode_public_key(&payload).unwrap(), key);
    }

    #[test]
    fn public_key_wrong_length_rejected() {
        assert!(decode_public_key(&[0u8; 31]).is_err());
    }

    #[test]
    fn base_time_roundtrip() {
        let t0 = 1_700_000_123i64;
        let payload = encode_base_time(t0);
        assert_eq!(payload, b"1700000123");
        assert_eq!(decode_base_time(&payload).unwrap(), t0);
    }

    #[test]
    fn base_time_rejects_garbage() {
        assert!(decode_base_time(b"not-a-number").is_err());
    }
}
