//! Base64 (standard alphabet, padded) helpers for tokens and signatures.

use crate::error::{Result, SecError};
use base64ct::{Base64, Encoding};

/// Length of the encoded text for `len` input bytes.
pub fn max_encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

pub fn encode(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

pub fn decode(text: &str) -> Result<Vec<u8>> {
    Base64::decode_vec(text.trim()).map_err(|e| SecError::Base64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_length_is_padded_to_quads() {
        assert_eq!(max_encoded_len(0), 0);
        assert_eq!(max_encoded_len(1), 4);
        assert_eq!(max_encoded_len(8), 12);
        assert_eq!(max_encoded_len(136), 184);
        assert_eq!(encode(&[0u8; 8]).len(), max_encoded_len(8));
    }

    #[test]
    fn encodes_known_vector() {
        assert_eq!(encode(b"sspl"), "c3NwbA==");
        assert_eq!(decode("c3NwbA==\n").unwrap(), b"sspl");
    }

    #[test]
    fn rejects_invalid_text() {
        let err = decode("not base64!").unwrap_err();
        assert!(matches!(err, SecError::Base64(_)));
    }
}
