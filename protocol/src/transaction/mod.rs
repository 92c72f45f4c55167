//! # Transaction Module
//!
//! Building, encoding, signing and verifying LTO transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs       : TransactionType, Version, per-operation TxConfig
//! kinds.rs       : the ten kind-specific bodies and their invariants
//! builder.rs     : Transaction<S>, the envelope with a signing typestate
//! codec.rs       : binary layouts, one pure function per (kind, version)
//! signing.rs     : sender, co-signer and sponsor transitions, AnyTransaction
//! json.rs        : the node's JSON representation, both ways
//! verification.rs: proof checks
//! error.rs       : TransactionError
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** a body (e.g. [`Transfer::new`]) and wrap it with
//!    [`Transaction::new`]. Invalid amounts, recipient counts, expiries and
//!    versions are rejected here.
//! 2. **Sign** with [`Transaction::sign_with`]. This freezes the timestamp
//!    and sender.
//! 3. **Sponsor** (optional) with `sponsor_with`.
//! 4. **Broadcast** the output of `to_json` through a node.
//!
//! ## Design Decisions
//!
//! - The version is always explicit. A transaction built as v1 is encoded
//!   as v1; it is never guessed from which fields are set.
//! - Amounts enter as `i64` so that negative input is rejected rather than
//!   wrapped, and are stored as `u64`.
//! - The transaction id is `base58(blake2b256(to_binary()))`.

pub mod builder;
mod codec;
pub mod error;
pub mod json;
pub mod kinds;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{FullySigned, SenderSigned, Signer, Transaction, Unsigned};
pub use error::TransactionError;
pub use kinds::{
    Anchor, Association, CancelLease, CancelSponsorship, Lease, MassTransfer, RevokeAssociation,
    SetScript, Sponsorship, TransactionBody, Transfer, TransferEntry,
};
pub use signing::AnyTransaction;
pub use types::{TransactionType, TxConfig, Version, VersionSelect};
pub use verification::{verify_proofs, verify_sender_proof};
