//! # Cryptographic Primitives
//!
//! Everything the codec needs to hash, encode and sign lives here:
//!
//! - **SHA-256** and **BLAKE2b-256**, plus their composition, the network hash.
//! - **base58** and **base64** codecs.
//! - **Ed25519**, **ECDSA/secp256k1** and **ECDSA/secp256r1** keypairs.
//!
//! Every function is a thin, typed wrapper around an audited implementation.
//! The only logic that is ours is the wire format: how keys and signatures
//! are laid out as bytes.

pub mod encoding;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use encoding::{base58_decode, base58_encode, base64_decode, base64_encode, DecodeError};
pub use hash::{blake2b256, hash_chain, sha256};
pub use keys::{derive_account_seed, KeyError, KeyPair, KeyType, PublicKey, Signature};
pub use signatures::{sign, verify};
