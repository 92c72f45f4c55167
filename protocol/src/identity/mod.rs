//! # Identity Module
//!
//! Who is signing, and where they receive funds.
//!
//! The identity stack is layered:
//!
//! 1. **Seed phrase**: 15 words, the only secret a user has to keep.
//! 2. **Account**: one keypair derived from `(phrase, nonce)`, bound to an
//!    address on one chain.
//! 3. **Address**: 26 checksummed bytes cut from the network hash of the
//!    public key, base58 on the wire.
//!
//! [`AccountFactory`] ties them together for a given chain id and key type.

pub mod account;
pub mod address;
pub mod factory;
pub mod seed_phrase;
pub mod wordlist;

pub use account::Account;
pub use address::{validate_address, Address, AddressError};
pub use factory::{AccountError, AccountFactory};
pub use seed_phrase::generate_seed_phrase;
