//! The transaction envelope and its signing states.
//!
//! A [`Transaction`] wraps a [`TransactionBody`] with everything the chain
//! needs around it: version, fee, timestamp, sender, optional sponsor and
//! the list of proofs. The type parameter tracks how far along signing is,
//! so that "sponsor before the sender signed" is a compile error rather than
//! a runtime surprise:
//!
//! ```text
//!   Unsigned ──sign_with──▶ SenderSigned ──sponsor_with──▶ FullySigned
//!                              │    ▲
//!                              └────┘ sign_with (co-signer)
//! ```
//!
//! The transitions themselves live in [`super::signing`].

use std::marker::PhantomData;

use super::codec::{self, Envelope};
use super::error::TransactionError;
use super::kinds::TransactionBody;
use super::types::{TransactionType, TxConfig, Version};
use crate::crypto::encoding::base58_encode;
use crate::crypto::hash::blake2b256;
use crate::crypto::keys::{PublicKey, Signature};
use crate::identity::address::Address;

// ---------------------------------------------------------------------------
// Signing states
// ---------------------------------------------------------------------------

/// Freshly built, no proofs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsigned;

/// Signed by the sender, and possibly by co-signers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderSigned;

/// Signed by the sender and a sponsor. Terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullySigned;

// ---------------------------------------------------------------------------
// Signer
// ---------------------------------------------------------------------------

/// The identity of a sender or sponsor as recorded on a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    address: Address,
    public_key: PublicKey,
}

impl Signer {
    pub(crate) fn new(address: Address, public_key: PublicKey) -> Self {
        Self { address, public_key }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction in signing state `S`.
///
/// # Examples
///
/// ```
/// use lto_protocol::identity::AccountFactory;
/// use lto_protocol::transaction::{Anchor, Transaction, TxConfig};
///
/// let account = AccountFactory::new('T').unwrap().create();
/// let tx = Transaction::new(Anchor::new(b"hello".to_vec()), TxConfig::new())
///     .unwrap()
///     .sign_with(&account)
///     .unwrap();
///
/// assert_eq!(tx.proofs().len(), 1);
/// assert!(account.verify(&tx.to_binary().unwrap(), &tx.proofs()[0]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<S = Unsigned> {
    pub(crate) body: TransactionBody,
    pub(crate) version: Version,
    pub(crate) fee: u64,
    pub(crate) timestamp: Option<u64>,
    pub(crate) sender: Option<Signer>,
    pub(crate) sponsor: Option<Signer>,
    pub(crate) proofs: Vec<Signature>,
    pub(crate) state: PhantomData<S>,
}

impl Transaction<Unsigned> {
    /// Wrap `body` in an unsigned envelope.
    ///
    /// The version and fee are resolved here, so asking for a version the
    /// kind does not have fails immediately with `UnsupportedVersion`, and a
    /// body the version cannot carry with `ExpiryNotSupported`.
    pub fn new(body: impl Into<TransactionBody>, config: TxConfig) -> Result<Self, TransactionError> {
        let body = body.into();
        let version = config.version.resolve(body.kind())?;
        body.check_layout(version)?;
        let fee = body.fee(config.fee)?;
        Ok(Self {
            body,
            version,
            fee,
            timestamp: config.timestamp,
            sender: None,
            sponsor: None,
            proofs: Vec::new(),
            state: PhantomData,
        })
    }
}

impl<S> Transaction<S> {
    pub fn body(&self) -> &TransactionBody {
        &self.body
    }

    pub fn kind(&self) -> TransactionType {
        self.body.kind()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    /// `None` until the sender signs, unless set through [`TxConfig`].
    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn sender(&self) -> Option<&Signer> {
        self.sender.as_ref()
    }

    pub fn sponsor(&self) -> Option<&Signer> {
        self.sponsor.as_ref()
    }

    pub fn proofs(&self) -> &[Signature] {
        &self.proofs
    }

    /// The chain the transaction is bound to, read from the sender address.
    pub fn chain_id(&self) -> Option<char> {
        self.sender.as_ref().map(|s| s.address.chain_id())
    }

    /// The bytes that get signed, in the transaction's own version.
    pub fn to_binary(&self) -> Result<Vec<u8>, TransactionError> {
        self.to_binary_with(self.version)
    }

    /// The bytes for an explicit version. Fails with `UnsupportedVersion`
    /// when the kind has no layout for it, and with `MissingSender` before
    /// the sender is known.
    pub fn to_binary_with(&self, version: Version) -> Result<Vec<u8>, TransactionError> {
        let sender = self.sender.as_ref().ok_or(TransactionError::MissingSender)?;
        let envelope = Envelope {
            chain_id: sender.address.as_bytes()[1],
            timestamp: self.timestamp.unwrap_or(0),
            sender: &sender.public_key,
            fee: self.fee,
        };
        codec::encode(&self.body, version, &envelope)
    }

    /// `base58(blake2b256(to_binary()))`, the id the node assigns.
    pub fn id(&self) -> Result<String, TransactionError> {
        Ok(base58_encode(&blake2b256(&self.to_binary()?)))
    }

    pub(crate) fn into_state<T>(self) -> Transaction<T> {
        Transaction {
            body: self.body,
            version: self.version,
            fee: self.fee,
            timestamp: self.timestamp,
            sender: self.sender,
            sponsor: self.sponsor,
            proofs: self.proofs,
            state: PhantomData,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccountFactory;
    use crate::transaction::kinds::{Anchor, Lease, MassTransfer, TransferEntry};

    fn recipient() -> Address {
        AccountFactory::new('T').unwrap().create_from_seed("recipient", 0).address().to_owned()
    }

    #[test]
    fn new_resolves_version_and_fee() {
        let tx = Transaction::new(Anchor::new(vec![1]), TxConfig::new()).unwrap();
        assert_eq!(tx.version(), Version::V3);
        assert_eq!(tx.fee(), 35_000_000);
        assert_eq!(tx.timestamp(), None);
        assert!(tx.proofs().is_empty());

        let tx = Transaction::new(Anchor::new(vec![1]), TxConfig::new().version(Version::V1).fee(7)).unwrap();
        assert_eq!(tx.version(), Version::V1);
        assert_eq!(tx.fee(), 7);
    }

    #[test]
    fn new_rejects_unsupported_version() {
        let lease = Lease::new(recipient(), 1).unwrap();
        match Transaction::new(lease, TxConfig::new().version(Version::V1)) {
            Err(TransactionError::UnsupportedVersion {
                kind: TransactionType::Lease,
                version: Version::V1,
            }) => {}
            other => panic!("expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn mass_transfer_fee_uses_override_as_base() {
        let entries = vec![TransferEntry::new(recipient(), 1); 10];
        let mass = MassTransfer::new(entries, Vec::new()).unwrap();
        let tx = Transaction::new(mass, TxConfig::new().fee(50)).unwrap();
        assert_eq!(tx.fee(), 100);
    }

    #[test]
    fn binary_needs_sender() {
        let tx = Transaction::new(Anchor::new(vec![1]), TxConfig::new()).unwrap();
        assert!(matches!(tx.to_binary(), Err(TransactionError::MissingSender)));
        assert!(matches!(tx.id(), Err(TransactionError::MissingSender)));
        assert_eq!(tx.chain_id(), None);
    }
}
