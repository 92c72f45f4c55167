//! Core type definitions for transactions.
//!
//! These types form the vocabulary of every transaction: which kind it is,
//! which binary format version it is encoded with, and the per-operation
//! knobs a caller can override.

use std::fmt;

use super::error::TransactionError;
use crate::config::{
    ANCHOR_FEE, ASSOCIATION_FEE, CANCEL_LEASE_FEE, CANCEL_SPONSORSHIP_FEE, LEASE_FEE,
    MASS_TRANSFER_BASE_FEE, REVOKE_ASSOCIATION_FEE, SET_SCRIPT_FEE, SPONSORSHIP_FEE, TRANSFER_FEE,
};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents.
///
/// The set is closed: the node rejects any type id not listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Move tokens to one recipient.
    Transfer,
    /// Lease tokens to a node to increase its mining power.
    Lease,
    /// End a lease.
    CancelLease,
    /// Move tokens to up to 100 recipients at once.
    MassTransfer,
    /// Attach (or remove) an account script.
    SetScript,
    /// Record a hash on chain.
    Anchor,
    /// Record a typed relationship between two accounts.
    Association,
    /// Withdraw an association.
    RevokeAssociation,
    /// Offer to pay transaction fees for another account.
    Sponsorship,
    /// Withdraw a sponsorship.
    CancelSponsorship,
}

const V1_V3: &[Version] = &[Version::V1, Version::V3];
const V2_V3: &[Version] = &[Version::V2, Version::V3];

impl TransactionType {
    pub const ALL: [TransactionType; 10] = [
        Self::Transfer,
        Self::Lease,
        Self::CancelLease,
        Self::MassTransfer,
        Self::SetScript,
        Self::Anchor,
        Self::Association,
        Self::RevokeAssociation,
        Self::Sponsorship,
        Self::CancelSponsorship,
    ];

    /// The type id byte the chain uses.
    pub fn type_id(self) -> u8 {
        match self {
            Self::Transfer => 4,
            Self::Lease => 8,
            Self::CancelLease => 9,
            Self::MassTransfer => 11,
            Self::SetScript => 13,
            Self::Anchor => 15,
            Self::Association => 16,
            Self::RevokeAssociation => 17,
            Self::Sponsorship => 18,
            Self::CancelSponsorship => 19,
        }
    }

    /// Inverse of [`type_id`](Self::type_id).
    pub fn from_type_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_id() == id)
    }

    /// Default fee in the smallest unit. For mass transfers this is the
    /// base fee; the real fee grows with the number of recipients.
    pub fn default_fee(self) -> u64 {
        match self {
            Self::Transfer => TRANSFER_FEE,
            Self::Lease => LEASE_FEE,
            Self::CancelLease => CANCEL_LEASE_FEE,
            Self::MassTransfer => MASS_TRANSFER_BASE_FEE,
            Self::SetScript => SET_SCRIPT_FEE,
            Self::Anchor => ANCHOR_FEE,
            Self::Association => ASSOCIATION_FEE,
            Self::RevokeAssociation => REVOKE_ASSOCIATION_FEE,
            Self::Sponsorship => SPONSORSHIP_FEE,
            Self::CancelSponsorship => CANCEL_SPONSORSHIP_FEE,
        }
    }

    /// Versions with a binary layout, oldest first.
    pub fn supported_versions(self) -> &'static [Version] {
        match self {
            Self::Transfer | Self::Lease | Self::CancelLease => V2_V3,
            _ => V1_V3,
        }
    }

    /// The version used unless the caller asks for another. Always v3.
    pub fn default_version(self) -> Version {
        Version::V3
    }

    pub fn supports(self, version: Version) -> bool {
        self.supported_versions().contains(&version)
    }

    /// Fail with `UnsupportedVersion` unless this kind has a layout for
    /// `version`.
    pub fn check_version(self, version: Version) -> Result<Version, TransactionError> {
        if self.supports(version) {
            Ok(version)
        } else {
            Err(TransactionError::UnsupportedVersion {
                kind: self,
                version,
            })
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transfer => "Transfer",
            Self::Lease => "Lease",
            Self::CancelLease => "CancelLease",
            Self::MassTransfer => "MassTransfer",
            Self::SetScript => "SetScript",
            Self::Anchor => "Anchor",
            Self::Association => "Association",
            Self::RevokeAssociation => "RevokeAssociation",
            Self::Sponsorship => "Sponsorship",
            Self::CancelSponsorship => "CancelSponsorship",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// Binary format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            3 => Some(Self::V3),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ---------------------------------------------------------------------------
// TxConfig
// ---------------------------------------------------------------------------

/// Which version to encode with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionSelect {
    /// The kind's default, v3 for every kind today.
    #[default]
    KindDefault,
    /// Exactly this version, or `UnsupportedVersion`.
    Exact(Version),
}

impl VersionSelect {
    pub fn resolve(self, kind: TransactionType) -> Result<Version, TransactionError> {
        match self {
            Self::KindDefault => Ok(kind.default_version()),
            Self::Exact(version) => kind.check_version(version),
        }
    }
}

/// Per-operation overrides.
///
/// Everything defaults: latest version, the kind's fee, and a timestamp taken
/// when the sender signs.
///
/// # Examples
///
/// ```
/// use lto_protocol::transaction::{TxConfig, Version};
///
/// let config = TxConfig::new().version(Version::V1).fee(50_000_000).timestamp(1_700_000_000_000);
/// assert_eq!(config.fee, Some(50_000_000));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxConfig {
    pub version: VersionSelect,
    /// Fee override. For mass transfers this replaces the base fee, and the
    /// per-recipient surcharge is computed from it.
    pub fee: Option<u64>,
    /// Timestamp override in UNIX milliseconds.
    pub timestamp: Option<u64>,
}

impl TxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = VersionSelect::Exact(version);
        self
    }

    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
