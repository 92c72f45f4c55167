//! # Text Encodings
//!
//! Keys, signatures, addresses, attachments and anchors travel as base58
//! (Bitcoin alphabet). Scripts travel as standard padded base64. Both decoders
//! report which encoding failed so an error surfacing from deep inside a JSON
//! body still points at the right field type.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// A string that should have been base58 or base64 and wasn't.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid base58: {0}")]
    Base58(String),

    #[error("invalid base64: {0}")]
    Base64(String),
}

/// Encode bytes as base58.
pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decode a base58 string.
///
/// # Example
///
/// ```
/// use lto_protocol::crypto::encoding::{base58_decode, base58_encode};
///
/// let text = base58_encode(b"anchor");
/// assert_eq!(base58_decode(&text).unwrap(), b"anchor");
/// ```
pub fn base58_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| DecodeError::Base58(e.to_string()))
}

/// Encode bytes as padded base64 with the standard alphabet.
pub fn base64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a padded base64 string with the standard alphabet.
pub fn base64_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(text)
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_known_vector() {
        assert_eq!(base58_encode(b"hello world"), "StV1DL6CwTryKyV");
        assert_eq!(base58_decode("StV1DL6CwTryKyV").unwrap(), b"hello world");
    }

    #[test]
    fn test_base58_keeps_leading_zeros() {
        let encoded = base58_encode(&[0, 0, 1]);
        assert!(encoded.starts_with("11"));
        assert_eq!(base58_decode(&encoded).unwrap(), vec![0, 0, 1]);
    }

    #[test]
    fn test_base58_rejects_excluded_characters() {
        // 0, O, I and l are not in the alphabet.
        for bad in ["0abc", "Oabc", "Iabc", "labc"] {
            match base58_decode(bad) {
                Err(DecodeError::Base58(_)) => {}
                other => panic!("expected Base58 error for {bad}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_base64_known_vector() {
        assert_eq!(base64_encode(b"script"), "c2NyaXB0");
        assert_eq!(base64_decode("c2NyaXB0").unwrap(), b"script");
    }

    #[test]
    fn test_base64_rejects_garbage() {
        match base64_decode("not base64!") {
            Err(DecodeError::Base64(_)) => {}
            other => panic!("expected Base64 error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(base58_encode(&[]), "");
        assert!(base58_decode("").unwrap().is_empty());
        assert!(base64_decode("").unwrap().is_empty());
    }
}
