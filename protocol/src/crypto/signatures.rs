//! # Digital Signatures
//!
//! Signing and verification over any supported key type.
//!
//! Every proof attached to a transaction goes through here. The functions are
//! thin on purpose: the interesting parts (key type dispatch, ECDSA encoding)
//! live on [`KeyPair`] and [`PublicKey`], and this module gives the
//! transaction layer one place to call into.

use thiserror::Error;

use super::keys::{KeyPair, PublicKey, Signature};

/// Errors during signature operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,
}

/// Sign a message with a keypair.
///
/// # Example
///
/// ```
/// use lto_protocol::crypto::{sign, verify, KeyPair, KeyType};
///
/// let keypair = KeyPair::generate(KeyType::Ed25519);
/// let message = b"lease 1000 LTO to the node";
/// let signature = sign(&keypair, message);
///
/// assert!(verify(&keypair.public_key(), message, &signature));
/// ```
pub fn sign(keypair: &KeyPair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

/// Verify a signature against a public key and message.
///
/// Returns `true` if the signature is valid, `false` otherwise. Wrong key,
/// wrong message and malformed signature all look the same.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature)
}

/// Verify several `(key, message, signature)` triples.
///
/// Fails on the first bad signature without saying which one.
pub fn batch_verify(items: &[(&PublicKey, &[u8], &Signature)]) -> Result<(), SignatureError> {
    for (public_key, message, signature) in items {
        if !verify(public_key, message, signature) {
            return Err(SignatureError::VerificationFailed);
        }
    }
    Ok(())
}
