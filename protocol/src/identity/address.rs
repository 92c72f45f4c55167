//! # Addresses
//!
//! An address is 26 bytes derived from a public key, shown to users in
//! base58:
//!
//! ```text
//! body     = 0x01 || chain_id || hash_chain(public_key)[0..20]
//! address  = body || hash_chain(body)[0..4]
//! ```
//!
//! `hash_chain` is `SHA-256(BLAKE2b-256(x))`. The chain id is a single ASCII
//! character (`L` for mainnet, `T` for testnet), which is why every mainnet
//! address starts with `3J` and every testnet address with `3N`.
//!
//! The four checksum bytes catch typos. Validation checks them before the
//! version byte, so any single corrupted byte of a valid address, version
//! included, is reported as a checksum failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ADDRESS_CHECKSUM_LENGTH, ADDRESS_HASH_LENGTH, ADDRESS_LENGTH, ADDRESS_VERSION};
use crate::crypto::encoding::{base58_decode, base58_encode, DecodeError};
use crate::crypto::hash::hash_chain;
use crate::crypto::keys::PublicKey;

const BODY_LENGTH: usize = ADDRESS_LENGTH - ADDRESS_CHECKSUM_LENGTH;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while deriving or parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The chain id must be a single ASCII character.
    #[error("invalid chain id {0:?}: must be a single ASCII character")]
    InvalidChainId(char),

    /// The first byte is not the address version.
    #[error("wrong address version: expected 1, got {found}")]
    WrongVersion {
        /// The version byte that was actually found.
        found: u8,
    },

    /// The decoded address has the wrong number of bytes.
    #[error("wrong address length: expected {expected} bytes, got {found}")]
    WrongLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        found: usize,
    },

    /// The trailing four bytes don't match the hash of the rest.
    #[error("address checksum mismatch")]
    WrongChecksum,

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A validated network address.
///
/// Every `Address` value has passed the length, checksum and version checks;
/// the only ways to get one are deriving it from a public key or parsing it.
///
/// # Examples
///
/// ```
/// use lto_protocol::crypto::{KeyPair, KeyType};
/// use lto_protocol::identity::Address;
///
/// let kp = KeyPair::generate(KeyType::Ed25519);
/// let address = Address::from_public_key(&kp.public_key(), 'T').unwrap();
/// assert!(address.to_string().starts_with("3N"));
///
/// let parsed: Address = address.to_string().parse().unwrap();
/// assert_eq!(parsed, address);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Derive the address of a public key on the given chain.
    pub fn from_public_key(public_key: &PublicKey, chain_id: char) -> Result<Self, AddressError> {
        if !chain_id.is_ascii() {
            return Err(AddressError::InvalidChainId(chain_id));
        }

        let key_hash = hash_chain(public_key.as_bytes());
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[0] = ADDRESS_VERSION;
        bytes[1] = chain_id as u8;
        bytes[2..BODY_LENGTH].copy_from_slice(&key_hash[..ADDRESS_HASH_LENGTH]);

        let checksum = hash_chain(&bytes[..BODY_LENGTH]);
        bytes[BODY_LENGTH..].copy_from_slice(&checksum[..ADDRESS_CHECKSUM_LENGTH]);
        Ok(Self(bytes))
    }

    /// Validate raw address bytes.
    ///
    /// Checks length, then checksum, then version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() != ADDRESS_LENGTH {
            return Err(AddressError::WrongLength {
                expected: ADDRESS_LENGTH,
                found: bytes.len(),
            });
        }

        let expected = hash_chain(&bytes[..BODY_LENGTH]);
        if bytes[BODY_LENGTH..] != expected[..ADDRESS_CHECKSUM_LENGTH] {
            return Err(AddressError::WrongChecksum);
        }

        if bytes[0] != ADDRESS_VERSION {
            return Err(AddressError::WrongVersion { found: bytes[0] });
        }

        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// The chain this address belongs to.
    pub fn chain_id(&self) -> char {
        self.0[1] as char
    }

    /// Whether this address was derived from `public_key` on its own chain.
    pub fn matches_public_key(&self, public_key: &PublicKey) -> bool {
        Self::from_public_key(public_key, self.chain_id())
            .map(|derived| derived == *self)
            .unwrap_or(false)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        base58_encode(&self.0)
    }
}

/// Check whether `text` is a well-formed address.
///
/// Returns `Ok(true)` for a valid address and the specific failure otherwise.
///
/// # Example
///
/// ```
/// use lto_protocol::identity::{validate_address, AddressError};
///
/// assert_eq!(validate_address("3N6MFpSbbzTozDcfkTUT5zZ2sNbJKFyRtRj"), Ok(true));
/// assert_eq!(validate_address("3N6MFpSbbzTozDcfkTUT5zZ2sNbJKFyRtRk"), Err(AddressError::WrongChecksum));
/// ```
pub fn validate_address(text: &str) -> Result<bool, AddressError> {
    text.parse::<Address>().map(|_| true)
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(&base58_decode(s)?)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
