//! # Accounts
//!
//! An [`Account`] bundles everything known about one keypair on one chain:
//! its address, its public key, and, when we hold them, the private key and
//! the seed phrase it was derived from.
//!
//! Accounts are immutable. Build them with
//! [`AccountFactory`](super::AccountFactory).

use std::fmt;

use crate::crypto::keys::{KeyError, KeyPair, KeyType, PublicKey, Signature};
use crate::identity::address::Address;

/// A keypair bound to an address.
///
/// An account built from a public key alone is read-only: it verifies but
/// refuses to sign.
///
/// # Examples
///
/// ```
/// use lto_protocol::identity::AccountFactory;
///
/// let factory = AccountFactory::new('T').unwrap();
/// let account = factory.create_from_seed("my secret phrase", 0);
///
/// let sig = account.sign(b"hello").unwrap();
/// assert!(account.verify(b"hello", &sig));
/// ```
#[derive(Clone)]
pub struct Account {
    address: Address,
    public_key: PublicKey,
    key_pair: Option<KeyPair>,
    seed: Option<String>,
    nonce: u32,
}

impl Account {
    pub(crate) fn new(
        address: Address,
        public_key: PublicKey,
        key_pair: Option<KeyPair>,
        seed: Option<String>,
        nonce: u32,
    ) -> Self {
        Self {
            address,
            public_key,
            key_pair,
            seed,
            nonce,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn key_type(&self) -> KeyType {
        self.public_key.key_type()
    }

    /// Byte 1 of the address.
    pub fn chain_id(&self) -> char {
        self.address.chain_id()
    }

    /// The private key, if this account can sign.
    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.key_pair.as_ref()
    }

    /// The seed phrase, if the account was derived from one.
    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// The account index within its seed phrase.
    pub fn nonce(&self) -> u32 {
        self.nonce
    }

    pub fn can_sign(&self) -> bool {
        self.key_pair.is_some()
    }

    /// Sign a message with the account's private key.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, KeyError> {
        let key_pair = self.key_pair.as_ref().ok_or(KeyError::MissingPrivateKey)?;
        Ok(key_pair.sign(message))
    }

    /// Verify a signature against the account's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key.verify(message, signature)
    }
}

impl PartialEq for Account {
    /// Two accounts are the same account if they share an address and key.
    /// Whether either side holds the private half doesn't matter.
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.public_key == other.public_key
    }
}

impl Eq for Account {}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("key_type", &self.key_type())
            .field("nonce", &self.nonce)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}
