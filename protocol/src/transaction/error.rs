//! Error type shared by every stage of the transaction pipeline.
//!
//! Each variant maps to one rule. Construction errors are raised eagerly,
//! when the body is built; codec errors when bytes are requested; state
//! errors when a signing step is called out of order.

use thiserror::Error;

use super::types::{TransactionType, Version};
use crate::crypto::encoding::DecodeError;
use crate::crypto::keys::{KeyError, KeyType};
use crate::identity::address::AddressError;

/// Errors that can occur while building, encoding, signing or parsing a
/// transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Transfer and lease amounts must be strictly positive.
    #[error("amount must be > 0, got {amount}")]
    InvalidAmount { amount: i64 },

    /// A mass transfer may pay at most 100 recipients.
    #[error("too many recipients: {count} (max {max})")]
    TooManyRecipients { count: usize, max: usize },

    /// The fee of a mass transfer does not fit in a `u64`.
    #[error("fee overflows: base fee {base_fee} for {recipients} recipients")]
    InvalidFee { base_fee: u64, recipients: usize },

    /// Only the v3 association layout carries an expiry.
    #[error("{kind} v{version} cannot carry an expiry")]
    ExpiryNotSupported { kind: TransactionType, version: Version },

    /// An association expiry must lie in the future.
    #[error("expiry {expires} is not after the current time {now}")]
    InvalidExpiry { expires: u64, now: u64 },

    /// The kind has no binary layout for this version.
    #[error("{kind} does not support version {version}")]
    UnsupportedVersion { kind: TransactionType, version: Version },

    /// Legacy layouts carry a bare 32-byte public key and only work for
    /// Ed25519 senders.
    #[error("{kind} v{version} cannot encode a {key_type} sender")]
    UnsupportedKeyType {
        kind: TransactionType,
        version: Version,
        key_type: KeyType,
    },

    /// The transaction already carries a sponsor proof.
    #[error("transaction is already sponsored")]
    AlreadySponsored,

    /// Sponsoring needs the sender's proof first.
    #[error("transaction must be signed by the sender before it can be sponsored")]
    NotYetSigned,

    /// The sender is only known once the transaction is signed.
    #[error("transaction has no sender")]
    MissingSender,

    /// A length-prefixed field exceeds the 16-bit length prefix.
    #[error("{field} is {len} bytes, longer than the 65535-byte limit")]
    FieldTooLong { field: &'static str, len: usize },

    /// Lease ids are 32-byte transaction ids.
    #[error("invalid lease id: expected 32 bytes, got {len}")]
    InvalidLeaseId { len: usize },

    /// The JSON `type` field names no known transaction kind.
    #[error("unknown transaction type {0}")]
    UnknownType(u64),

    /// The JSON `version` field names no known format version.
    #[error("unknown transaction version {0}")]
    UnknownVersion(u64),

    /// The JSON body is structurally valid but semantically wrong.
    #[error("malformed transaction: {0}")]
    Malformed(String),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("invalid transaction JSON: {0}")]
    Json(#[from] serde_json::Error),
}
