//! # Account Factory
//!
//! Every account lives on one chain and uses one key type, so the factory is
//! configured with both and hands out accounts from whatever key material is
//! at hand: a fresh random phrase, an existing phrase plus nonce, an exported
//! private key, or a bare public key.

use thiserror::Error;
use tracing::debug;

use super::account::Account;
use super::address::{Address, AddressError};
use super::seed_phrase::generate_seed_phrase;
use crate::config::CHAIN_ID_MAINNET;
use crate::crypto::encoding::base58_decode;
use crate::crypto::keys::{derive_account_seed, KeyError, KeyPair, KeyType, PublicKey};

/// Errors from building or checking an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Address(#[from] AddressError),

    /// The account does not match an expected value supplied alongside it.
    #[error("account {field} does not match the expected value")]
    Mismatch {
        /// Which field disagreed: `address`, `public key` or `private key`.
        field: &'static str,
    },
}

/// Builds accounts for a fixed chain id and key type.
///
/// # Examples
///
/// ```
/// use lto_protocol::crypto::KeyType;
/// use lto_protocol::identity::AccountFactory;
///
/// let factory = AccountFactory::new('T').unwrap().with_key_type(KeyType::Secp256k1);
/// let account = factory.create();
/// assert_eq!(account.chain_id(), 'T');
/// assert_eq!(account.key_type(), KeyType::Secp256k1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFactory {
    chain_id: char,
    key_type: KeyType,
}

impl Default for AccountFactory {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID_MAINNET,
            key_type: KeyType::Ed25519,
        }
    }
}

impl AccountFactory {
    /// An Ed25519 factory for `chain_id`.
    pub fn new(chain_id: char) -> Result<Self, AddressError> {
        if !chain_id.is_ascii() {
            return Err(AddressError::InvalidChainId(chain_id));
        }
        Ok(Self {
            chain_id,
            key_type: KeyType::Ed25519,
        })
    }

    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }

    pub fn chain_id(&self) -> char {
        self.chain_id
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Create a new account from a freshly generated 15-word phrase.
    pub fn create(&self) -> Account {
        self.create_from_seed(&generate_seed_phrase(), 0)
    }

    /// Derive account number `nonce` of a seed phrase.
    ///
    /// Deterministic: the same phrase, nonce, chain and key type always give
    /// the same account.
    pub fn create_from_seed(&self, seed: &str, nonce: u32) -> Account {
        let key_pair = KeyPair::from_seed(self.key_type, &derive_account_seed(seed, nonce));
        let public_key = key_pair.public_key();
        let address = self.address_of(&public_key);
        debug!(%address, key_type = %self.key_type, nonce, "derived account from seed");
        Account::new(address, public_key, Some(key_pair), Some(seed.to_string()), nonce)
    }

    /// Build an account from exported private key bytes.
    pub fn create_from_private_key(&self, private_key: &[u8]) -> Result<Account, AccountError> {
        let key_pair = KeyPair::from_secret_bytes(self.key_type, private_key)?;
        let public_key = key_pair.public_key();
        let address = self.address_of(&public_key);
        Ok(Account::new(address, public_key, Some(key_pair), None, 0))
    }

    /// Base58 variant of [`create_from_private_key`](Self::create_from_private_key).
    pub fn create_from_private_key_base58(&self, private_key: &str) -> Result<Account, AccountError> {
        self.create_from_private_key(&base58_decode(private_key).map_err(KeyError::from)?)
    }

    /// Build a read-only account from a public key.
    pub fn create_from_public_key(&self, public_key: &[u8]) -> Result<Account, AccountError> {
        let public_key = PublicKey::from_bytes(self.key_type, public_key)?;
        let address = self.address_of(&public_key);
        Ok(Account::new(address, public_key, None, None, 0))
    }

    /// Base58 variant of [`create_from_public_key`](Self::create_from_public_key).
    pub fn create_from_public_key_base58(&self, public_key: &str) -> Result<Account, AccountError> {
        self.create_from_public_key(&base58_decode(public_key).map_err(KeyError::from)?)
    }

    /// Check an account against independently supplied values.
    ///
    /// Useful when a user provides a seed *and* the address they expect it
    /// to produce: a typo in the phrase gives a valid but different account,
    /// and this is where it gets caught.
    pub fn assert_account(
        &self,
        account: &Account,
        address: Option<&str>,
        public_key: Option<&str>,
        private_key: Option<&str>,
    ) -> Result<(), AccountError> {
        if let Some(expected) = address {
            let expected: Address = expected.parse()?;
            if &expected != account.address() {
                return Err(AccountError::Mismatch { field: "address" });
            }
        }

        if let Some(expected) = public_key {
            let expected = PublicKey::from_base58(account.key_type(), expected)?;
            if &expected != account.public_key() {
                return Err(AccountError::Mismatch { field: "public key" });
            }
        }

        if let Some(expected) = private_key {
            let expected = KeyPair::from_base58(account.key_type(), expected)?;
            if account.key_pair() != Some(&expected) {
                return Err(AccountError::Mismatch { field: "private key" });
            }
        }

        Ok(())
    }

    fn address_of(&self, public_key: &PublicKey) -> Address {
        Address::from_public_key(public_key, self.chain_id)
            .expect("factory chain id is checked to be ASCII on construction")
    }
}
