//! Signing transitions.
//!
//! Every proof, the sender's, a co-signer's or the sponsor's, is a signature
//! over the same `to_binary()` bytes. Signing never changes those bytes
//! after the first proof: the timestamp and sender are frozen when the
//! sender signs.
//!
//! Note that the sponsor's identity is not part of the signed bytes. A
//! sponsor proof can therefore be lifted onto another copy of the same
//! transaction with a different `sponsor` field; the node resolves this by
//! checking the proof against the key it is given. Kept as is for wire
//! compatibility.

use chrono::Utc;
use tracing::debug;

use super::builder::{FullySigned, SenderSigned, Signer, Transaction, Unsigned};
use super::error::TransactionError;
use super::kinds::TransactionBody;
use super::types::{TransactionType, Version};
use crate::crypto::keys::Signature;
use crate::identity::account::Account;

fn now_millis() -> u64 {
    Utc::now().timestamp_millis() as u64
}

fn signer_of(account: &Account) -> Signer {
    Signer::new(*account.address(), account.public_key().clone())
}

impl Transaction<Unsigned> {
    /// Sign as the sender.
    ///
    /// Freezes the timestamp (now, unless one was configured), records the
    /// account as sender and appends its proof. Fails with `MissingPrivateKey`
    /// for read-only accounts, and with `UnsupportedKeyType` when a legacy
    /// version was requested for an ECDSA account.
    pub fn sign_with(self, account: &Account) -> Result<Transaction<SenderSigned>, TransactionError> {
        let mut tx: Transaction<SenderSigned> = self.into_state();
        tx.timestamp.get_or_insert_with(now_millis);
        tx.sender = Some(signer_of(account));

        let proof = account.sign(&tx.to_binary()?)?;
        tx.proofs.push(proof);

        debug!(
            kind = %tx.kind(),
            version = %tx.version(),
            sender = %account.address(),
            "transaction signed by sender"
        );
        Ok(tx)
    }
}

impl Transaction<SenderSigned> {
    /// Add a co-signer proof. The sender fields are left untouched.
    pub fn sign_with(mut self, account: &Account) -> Result<Self, TransactionError> {
        let proof = account.sign(&self.to_binary()?)?;
        self.proofs.push(proof);
        debug!(
            kind = %self.kind(),
            signer = %account.address(),
            proofs = self.proofs.len(),
            "transaction co-signed"
        );
        Ok(self)
    }

    /// Have `account` pay the fee.
    ///
    /// The sponsor signs the same bytes as the sender; see the module docs.
    pub fn sponsor_with(self, account: &Account) -> Result<Transaction<FullySigned>, TransactionError> {
        let mut tx: Transaction<FullySigned> = self.into_state();
        let proof = account.sign(&tx.to_binary()?)?;
        tx.sponsor = Some(signer_of(account));
        tx.proofs.push(proof);
        debug!(kind = %tx.kind(), sponsor = %account.address(), "transaction sponsored");
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// AnyTransaction
// ---------------------------------------------------------------------------

/// A transaction whose signing state is only known at runtime, such as one
/// parsed from JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyTransaction {
    Unsigned(Transaction<Unsigned>),
    SenderSigned(Transaction<SenderSigned>),
    FullySigned(Transaction<FullySigned>),
}

macro_rules! each {
    ($value:expr, $tx:ident => $body:expr) => {
        match $value {
            AnyTransaction::Unsigned($tx) => $body,
            AnyTransaction::SenderSigned($tx) => $body,
            AnyTransaction::FullySigned($tx) => $body,
        }
    };
}

impl AnyTransaction {
    /// Sign as sender, or as co-signer once the sender has signed. Fails
    /// with `AlreadySponsored` on a fully signed transaction.
    pub fn sign_with(self, account: &Account) -> Result<Self, TransactionError> {
        match self {
            Self::Unsigned(tx) => tx.sign_with(account).map(Self::SenderSigned),
            Self::SenderSigned(tx) => tx.sign_with(account).map(Self::SenderSigned),
            Self::FullySigned(_) => Err(TransactionError::AlreadySponsored),
        }
    }

    /// Fails with `NotYetSigned` before the sender signed and with
    /// `AlreadySponsored` after a sponsor did.
    pub fn sponsor_with(self, account: &Account) -> Result<Transaction<FullySigned>, TransactionError> {
        match self {
            Self::Unsigned(_) => Err(TransactionError::NotYetSigned),
            Self::SenderSigned(tx) => tx.sponsor_with(account),
            Self::FullySigned(_) => Err(TransactionError::AlreadySponsored),
        }
    }

    pub fn body(&self) -> &TransactionBody {
        each!(self, tx => tx.body())
    }

    pub fn kind(&self) -> TransactionType {
        each!(self, tx => tx.kind())
    }

    pub fn version(&self) -> Version {
        each!(self, tx => tx.version())
    }

    pub fn fee(&self) -> u64 {
        each!(self, tx => tx.fee())
    }

    pub fn timestamp(&self) -> Option<u64> {
        each!(self, tx => tx.timestamp())
    }

    pub fn sender(&self) -> Option<&Signer> {
        each!(self, tx => tx.sender())
    }

    pub fn sponsor(&self) -> Option<&Signer> {
        each!(self, tx => tx.sponsor())
    }

    pub fn proofs(&self) -> &[Signature] {
        each!(self, tx => tx.proofs())
    }

    pub fn chain_id(&self) -> Option<char> {
        each!(self, tx => tx.chain_id())
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, TransactionError> {
        each!(self, tx => tx.to_binary())
    }

    pub fn to_binary_with(&self, version: Version) -> Result<Vec<u8>, TransactionError> {
        each!(self, tx => tx.to_binary_with(version))
    }

    pub fn id(&self) -> Result<String, TransactionError> {
        each!(self, tx => tx.id())
    }
}

impl From<Transaction<Unsigned>> for AnyTransaction {
    fn from(tx: Transaction<Unsigned>) -> Self {
        Self::Unsigned(tx)
    }
}

impl From<Transaction<SenderSigned>> for AnyTransaction {
    fn from(tx: Transaction<SenderSigned>) -> Self {
        Self::SenderSigned(tx)
    }
}

impl From<Transaction<FullySigned>> for AnyTransaction {
    fn from(tx: Transaction<FullySigned>) -> Self {
        Self::FullySigned(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{KeyError, KeyType};
    use crate::identity::AccountFactory;
    use crate::transaction::kinds::{Anchor, Sponsorship};
    use crate::transaction::types::TxConfig;

    fn account(seed: &str) -> Account {
        AccountFactory::new('T').unwrap().create_from_seed(seed, 0)
    }

    fn anchor() -> Transaction<Unsigned> {
        Transaction::new(Anchor::new(b"anchor".to_vec()), TxConfig::new()).unwrap()
    }

    #[test]
    fn sign_freezes_timestamp_and_sender() {
        let sender = account("sender");
        let tx = anchor().sign_with(&sender).unwrap();

        assert!(tx.timestamp().is_some());
        assert_eq!(tx.sender().unwrap().address(), sender.address());
        assert_eq!(tx.chain_id(), Some('T'));
        assert_eq!(tx.proofs().len(), 1);
        assert!(sender.verify(&tx.to_binary().unwrap(), &tx.proofs()[0]));
    }

    #[test]
    fn configured_timestamp_is_kept() {
        let tx = Transaction::new(Anchor::new(vec![1]), TxConfig::new().timestamp(42))
            .unwrap()
            .sign_with(&account("sender"))
            .unwrap();
        assert_eq!(tx.timestamp(), Some(42));
    }

    #[test]
    fn co_signer_signs_same_bytes() {
        let sender = account("sender");
        let cosigner = account("cosigner");
        let tx = anchor().sign_with(&sender).unwrap();
        let bytes = tx.to_binary().unwrap();

        let tx = tx.sign_with(&cosigner).unwrap();
        assert_eq!(tx.to_binary().unwrap(), bytes);
        assert_eq!(tx.sender().unwrap().address(), sender.address());
        assert!(cosigner.verify(&bytes, &tx.proofs()[1]));
    }

    #[test]
    fn sponsor_adds_second_proof() {
        let sender = account("sender");
        let sponsor = account("sponsor");
        let tx = anchor().sign_with(&sender).unwrap().sponsor_with(&sponsor).unwrap();

        assert_eq!(tx.proofs().len(), 2);
        assert_eq!(tx.sponsor().unwrap().address(), sponsor.address());
        let bytes = tx.to_binary().unwrap();
        assert!(sender.verify(&bytes, &tx.proofs()[0]));
        assert!(sponsor.verify(&bytes, &tx.proofs()[1]));
    }

    #[test]
    fn read_only_account_cannot_sign() {
        let factory = AccountFactory::new('T').unwrap();
        let public = account("sender").public_key().to_base58();
        let read_only = factory.create_from_public_key_base58(&public).unwrap();
        match anchor().sign_with(&read_only) {
            Err(TransactionError::Key(KeyError::MissingPrivateKey)) => {}
            other => panic!("expected MissingPrivateKey, got {:?}", other),
        }
    }

    #[test]
    fn legacy_version_rejects_ecdsa_sender() {
        let sender = AccountFactory::new('T')
            .unwrap()
            .with_key_type(KeyType::Secp256k1)
            .create_from_seed("sender", 0);
        let recipient = *account("recipient").address();
        let tx = Transaction::new(Sponsorship::new(recipient), TxConfig::new().version(Version::V1)).unwrap();
        assert!(matches!(
            tx.sign_with(&sender),
            Err(TransactionError::UnsupportedKeyType { key_type: KeyType::Secp256k1, .. })
        ));
    }

    #[test]
    fn any_transaction_state_errors() {
        let sender = account("sender");
        let sponsor = account("sponsor");

        match AnyTransaction::from(anchor()).sponsor_with(&sponsor) {
            Err(TransactionError::NotYetSigned) => {}
            other => panic!("expected NotYetSigned, got {:?}", other),
        }

        let signed = AnyTransaction::from(anchor()).sign_with(&sender).unwrap();
        assert!(matches!(signed, AnyTransaction::SenderSigned(_)));

        let sponsored = AnyTransaction::from(signed.sponsor_with(&sponsor).unwrap());
        assert!(matches!(
            sponsored.clone().sponsor_with(&sponsor),
            Err(TransactionError::AlreadySponsored)
        ));
        assert!(matches!(sponsored.sign_with(&sender), Err(TransactionError::AlreadySponsored)));
    }
}
