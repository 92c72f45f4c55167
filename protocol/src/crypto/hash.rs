//! # Hashing Utilities
//!
//! The chain uses exactly two hash functions, and one composition of them:
//!
//! - **SHA-256**: account seed derivation and the outer half of the network
//!   hash.
//! - **BLAKE2b-256**: transaction ids and the inner half of the network hash.
//! - **`hash_chain`**: `SHA-256(BLAKE2b-256(x))`, the "secure hash" that
//!   addresses and their checksums are cut from.
//!
//! Everything returns a fixed-size `[u8; HASH_OUTPUT_LENGTH]` (32 bytes);
//! callers slice what they need.

use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::{Digest, Sha256};

use crate::config::HASH_OUTPUT_LENGTH;

type Blake2b256 = Blake2b<U32>;

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use lto_protocol::crypto::sha256;
///
/// let hash = sha256(b"LTO Network");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the 256-bit BLAKE2b hash of the input data.
///
/// This is BLAKE2b with a 32-byte output length configured in the parameter
/// block, not a truncated BLAKE2b-512. The two produce different digests.
pub fn blake2b256(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// The network hash: `SHA-256(BLAKE2b-256(data))`.
///
/// Address bodies take the first 20 bytes of the chained hash of a public
/// key; address checksums take the first 4 bytes of the chained hash of the
/// address body.
///
/// # Example
///
/// ```
/// use lto_protocol::crypto::{blake2b256, hash_chain, sha256};
///
/// let data = b"public key bytes";
/// assert_eq!(hash_chain(data), sha256(&blake2b256(data)));
/// ```
pub fn hash_chain(data: &[u8]) -> [u8; HASH_OUTPUT_LENGTH] {
    sha256(&blake2b256(data))
}

/// Hash multiple byte slices with SHA-256 without concatenating them first.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; HASH_OUTPUT_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
