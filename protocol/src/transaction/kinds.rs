//! Kind-specific transaction bodies.
//!
//! Each body holds only the fields that differ between kinds; the envelope
//! (sender, fee, timestamp, proofs) lives on
//! [`Transaction`](super::Transaction). Constructors enforce every rule that
//! can be checked without a sender, so an invalid body never exists.

use chrono::Utc;

use super::error::TransactionError;
use super::types::{TransactionType, Version};
use crate::config::{LEASE_ID_LENGTH, MAX_MASS_TRANSFER_RECIPIENTS, SCRIPT_PREFIX};
use crate::crypto::encoding::{base58_decode, base58_encode, base64_decode};
use crate::identity::address::Address;

fn positive(amount: i64) -> Result<u64, TransactionError> {
    if amount <= 0 {
        return Err(TransactionError::InvalidAmount { amount });
    }
    Ok(amount as u64)
}

fn non_empty(bytes: Option<Vec<u8>>) -> Option<Vec<u8>> {
    bytes.filter(|b| !b.is_empty())
}

// ---------------------------------------------------------------------------
// Transfer / Lease
// ---------------------------------------------------------------------------

/// Pay `amount` to one recipient, with an optional attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub(crate) recipient: Address,
    pub(crate) amount: u64,
    pub(crate) attachment: Vec<u8>,
}

impl Transfer {
    /// Fails with `InvalidAmount` unless `amount > 0`.
    pub fn new(recipient: Address, amount: i64, attachment: impl Into<Vec<u8>>) -> Result<Self, TransactionError> {
        Ok(Self {
            recipient,
            amount: positive(amount)?,
            attachment: attachment.into(),
        })
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn attachment(&self) -> &[u8] {
        &self.attachment
    }
}

/// Lease `amount` to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub(crate) recipient: Address,
    pub(crate) amount: u64,
}

impl Lease {
    /// Fails with `InvalidAmount` unless `amount > 0`.
    pub fn new(recipient: Address, amount: i64) -> Result<Self, TransactionError> {
        Ok(Self {
            recipient,
            amount: positive(amount)?,
        })
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Cancel the lease created by transaction `lease_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelLease {
    pub(crate) lease_id: [u8; LEASE_ID_LENGTH],
}

impl CancelLease {
    /// Parse a base58 lease id (the id of the lease transaction).
    pub fn new(lease_id: &str) -> Result<Self, TransactionError> {
        let bytes = base58_decode(lease_id)?;
        let lease_id: [u8; LEASE_ID_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TransactionError::InvalidLeaseId { len: bytes.len() })?;
        Ok(Self { lease_id })
    }

    pub fn from_bytes(lease_id: [u8; LEASE_ID_LENGTH]) -> Self {
        Self { lease_id }
    }

    pub fn lease_id(&self) -> String {
        base58_encode(&self.lease_id)
    }
}

// ---------------------------------------------------------------------------
// MassTransfer
// ---------------------------------------------------------------------------

/// One line of a mass transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    pub recipient: Address,
    pub amount: u64,
}

impl TransferEntry {
    pub fn new(recipient: Address, amount: u64) -> Self {
        Self { recipient, amount }
    }
}

/// Pay up to 100 recipients in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassTransfer {
    pub(crate) transfers: Vec<TransferEntry>,
    pub(crate) attachment: Vec<u8>,
}

impl MassTransfer {
    /// Fails with `TooManyRecipients` above 100 entries.
    pub fn new(transfers: Vec<TransferEntry>, attachment: impl Into<Vec<u8>>) -> Result<Self, TransactionError> {
        if transfers.len() > MAX_MASS_TRANSFER_RECIPIENTS {
            return Err(TransactionError::TooManyRecipients {
                count: transfers.len(),
                max: MAX_MASS_TRANSFER_RECIPIENTS,
            });
        }
        Ok(Self {
            transfers,
            attachment: attachment.into(),
        })
    }

    pub fn transfers(&self) -> &[TransferEntry] {
        &self.transfers
    }

    pub fn attachment(&self) -> &[u8] {
        &self.attachment
    }

    /// `base + count * base / 10`, rounded down. Fails with `InvalidFee`
    /// when the total does not fit in a `u64`.
    pub fn fee_for(&self, base_fee: u64) -> Result<u64, TransactionError> {
        (self.transfers.len() as u64)
            .checked_mul(base_fee)
            .and_then(|extra| base_fee.checked_add(extra / 10))
            .ok_or(TransactionError::InvalidFee {
                base_fee,
                recipients: self.transfers.len(),
            })
    }
}

// ---------------------------------------------------------------------------
// SetScript / Anchor
// ---------------------------------------------------------------------------

/// Attach a compiled script to the sender's account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetScript {
    pub(crate) script: Vec<u8>,
}

impl SetScript {
    pub fn new(script: impl Into<Vec<u8>>) -> Self {
        Self { script: script.into() }
    }

    /// Parse a compiled script as the node returns it, with or without the
    /// `base64:` prefix.
    pub fn from_base64(text: &str) -> Result<Self, TransactionError> {
        let text = text.strip_prefix(SCRIPT_PREFIX).unwrap_or(text);
        Ok(Self::new(base64_decode(text)?))
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }
}

/// Record arbitrary bytes (usually a hash) on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub(crate) anchor: Vec<u8>,
}

impl Anchor {
    pub fn new(anchor: impl Into<Vec<u8>>) -> Self {
        Self { anchor: anchor.into() }
    }

    pub fn anchor(&self) -> &[u8] {
        &self.anchor
    }
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

/// A typed, optionally hashed, optionally expiring link from the sender to
/// `recipient`.
///
/// Only the v3 layout has room for an expiry. Building a v1 transaction
/// from an association with `expires` set fails with
/// `ExpiryNotSupported`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub(crate) recipient: Address,
    pub(crate) association_type: i32,
    pub(crate) hash: Option<Vec<u8>>,
    pub(crate) expires: Option<u64>,
}

impl Association {
    /// Fails with `InvalidExpiry` when `expires` is not in the future. An
    /// empty hash is treated as no hash.
    pub fn new(
        recipient: Address,
        association_type: i32,
        hash: Option<Vec<u8>>,
        expires: Option<u64>,
    ) -> Result<Self, TransactionError> {
        if let Some(expires) = expires {
            let now = Utc::now().timestamp_millis() as u64;
            if expires <= now {
                return Err(TransactionError::InvalidExpiry { expires, now });
            }
        }
        Ok(Self::unchecked(recipient, association_type, hash, expires))
    }

    /// Skips the expiry check. Used when parsing transactions that were valid
    /// when they were signed.
    pub(crate) fn unchecked(
        recipient: Address,
        association_type: i32,
        hash: Option<Vec<u8>>,
        expires: Option<u64>,
    ) -> Self {
        Self {
            recipient,
            association_type,
            hash: non_empty(hash),
            expires: expires.filter(|&e| e != 0),
        }
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn association_type(&self) -> i32 {
        self.association_type
    }

    pub fn hash(&self) -> Option<&[u8]> {
        self.hash.as_deref()
    }

    pub fn expires(&self) -> Option<u64> {
        self.expires
    }
}

/// Withdraw an association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeAssociation {
    pub(crate) recipient: Address,
    pub(crate) association_type: i32,
    pub(crate) hash: Option<Vec<u8>>,
}

impl RevokeAssociation {
    pub fn new(recipient: Address, association_type: i32, hash: Option<Vec<u8>>) -> Self {
        Self {
            recipient,
            association_type,
            hash: non_empty(hash),
        }
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn association_type(&self) -> i32 {
        self.association_type
    }

    pub fn hash(&self) -> Option<&[u8]> {
        self.hash.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Sponsorships
// ---------------------------------------------------------------------------

/// Start paying fees for `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sponsorship {
    pub(crate) recipient: Address,
}

impl Sponsorship {
    pub fn new(recipient: Address) -> Self {
        Self { recipient }
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }
}

/// Stop paying fees for `recipient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelSponsorship {
    pub(crate) recipient: Address,
}

impl CancelSponsorship {
    pub fn new(recipient: Address) -> Self {
        Self { recipient }
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }
}

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// The closed set of transaction bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    Transfer(Transfer),
    Lease(Lease),
    CancelLease(CancelLease),
    MassTransfer(MassTransfer),
    SetScript(SetScript),
    Anchor(Anchor),
    Association(Association),
    RevokeAssociation(RevokeAssociation),
    Sponsorship(Sponsorship),
    CancelSponsorship(CancelSponsorship),
}

impl TransactionBody {
    pub fn kind(&self) -> TransactionType {
        match self {
            Self::Transfer(_) => TransactionType::Transfer,
            Self::Lease(_) => TransactionType::Lease,
            Self::CancelLease(_) => TransactionType::CancelLease,
            Self::MassTransfer(_) => TransactionType::MassTransfer,
            Self::SetScript(_) => TransactionType::SetScript,
            Self::Anchor(_) => TransactionType::Anchor,
            Self::Association(_) => TransactionType::Association,
            Self::RevokeAssociation(_) => TransactionType::RevokeAssociation,
            Self::Sponsorship(_) => TransactionType::Sponsorship,
            Self::CancelSponsorship(_) => TransactionType::CancelSponsorship,
        }
    }

    /// The fee to charge given an optional override. Mass transfers treat
    /// the override as their base fee.
    pub fn fee(&self, fee_override: Option<u64>) -> Result<u64, TransactionError> {
        let base = fee_override.unwrap_or_else(|| self.kind().default_fee());
        match self {
            Self::MassTransfer(mass) => mass.fee_for(base),
            _ => Ok(base),
        }
    }

    /// Fails when the body holds a field the `version` layout cannot carry.
    pub(crate) fn check_layout(&self, version: Version) -> Result<(), TransactionError> {
        match self {
            Self::Association(a) if a.expires.is_some() && version != Version::V3 => {
                Err(TransactionError::ExpiryNotSupported {
                    kind: self.kind(),
                    version,
                })
            }
            _ => Ok(()),
        }
    }
}

macro_rules! impl_from_body {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for TransactionBody {
                fn from(body: $kind) -> Self {
                    TransactionBody::$kind(body)
                }
            }
        )*
    };
}

impl_from_body!(
    Transfer,
    Lease,
    CancelLease,
    MassTransfer,
    SetScript,
    Anchor,
    Association,
    RevokeAssociation,
    Sponsorship,
    CancelSponsorship,
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
