// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # LTO Protocol Core Library
//!
//! Accounts, addresses and transactions for the LTO Network, down to the
//! byte. Everything a client needs to produce a transaction the node will
//! accept, and nothing that needs a network connection.
//!
//! ## Architecture
//!
//! - **crypto**: SHA-256, BLAKE2b, base58/base64, and keys for the three
//!   supported curves. Don't roll your own.
//! - **identity**: seed phrases, accounts and checksummed addresses.
//! - **transaction**: the ten transaction kinds, their binary and JSON
//!   encodings, signing and sponsoring.
//! - **config**: protocol constants and network parameters.
//!
//! ## Design Philosophy
//!
//! 1. Byte-exact with the node. Every layout has a field-offset test.
//! 2. Invalid states are unrepresentable where the type system allows it:
//!    you cannot sponsor a transaction nobody signed.
//! 3. Failures are typed and raised where the rule is broken.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod transaction;
