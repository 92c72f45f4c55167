//! # Protocol Configuration & Constants
//!
//! Every magic number the codec and the key derivation depend on lives here.
//! The chain validates these byte-for-byte, so none of them are tunables: a
//! wrong fee is a rejected broadcast, a wrong address version is an address
//! nobody can pay.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet chain id. Shows up as byte 1 of every mainnet address, which is
/// why mainnet addresses start with `3J`.
pub const CHAIN_ID_MAINNET: char = 'L';

/// Testnet chain id. Testnet addresses start with `3N`.
pub const CHAIN_ID_TESTNET: char = 'T';

/// Default public node for mainnet.
pub const MAINNET_NODE_URL: &str = "https://nodes.lto.network";

/// Default public node for testnet.
pub const TESTNET_NODE_URL: &str = "https://testnet.lto.network";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// ECDSA public keys travel as the raw `x || y` coordinates, without the
/// SEC1 `0x04` tag.
pub const ECDSA_PUBLIC_KEY_LENGTH: usize = 64;

/// Secret key / seed length for every supported curve.
pub const SECRET_KEY_LENGTH: usize = 32;

/// All supported algorithms produce 64-byte signatures (`R || S` or `r || s`).
pub const SIGNATURE_LENGTH: usize = 64;

/// Digest length of both SHA-256 and BLAKE2b-256.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Key type markers, as written into the v3 binary envelope.
pub const KEY_TYPE_ED25519: u8 = 1;
pub const KEY_TYPE_SECP256K1: u8 = 2;
pub const KEY_TYPE_SECP256R1: u8 = 3;

// ---------------------------------------------------------------------------
// Address Format
// ---------------------------------------------------------------------------

/// First byte of every address.
pub const ADDRESS_VERSION: u8 = 1;

/// `version(1) || chain(1) || hash(20) || checksum(4)`.
pub const ADDRESS_LENGTH: usize = 26;

/// Bytes of the chained public-key hash kept in the address.
pub const ADDRESS_HASH_LENGTH: usize = 20;

/// Bytes of the chained hash used as the checksum.
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Fee Parameters
// ---------------------------------------------------------------------------
//
// Fees are denominated in the smallest unit, 1 LTO = 100_000_000.

pub const TRANSFER_FEE: u64 = 100_000_000;
pub const LEASE_FEE: u64 = 100_000_000;
pub const CANCEL_LEASE_FEE: u64 = 500_000_000;
pub const SET_SCRIPT_FEE: u64 = 500_000_000;
pub const ANCHOR_FEE: u64 = 35_000_000;
pub const ASSOCIATION_FEE: u64 = 100_000_000;
pub const REVOKE_ASSOCIATION_FEE: u64 = 100_000_000;
pub const SPONSORSHIP_FEE: u64 = 500_000_000;
pub const CANCEL_SPONSORSHIP_FEE: u64 = 500_000_000;

/// Base fee of a mass transfer. Each recipient adds a tenth of it.
pub const MASS_TRANSFER_BASE_FEE: u64 = 100_000_000;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum number of recipients in a single mass transfer.
pub const MAX_MASS_TRANSFER_RECIPIENTS: usize = 100;

/// Lease ids are transaction ids: a 32-byte BLAKE2b digest.
pub const LEASE_ID_LENGTH: usize = 32;

/// Prefix the node puts in front of base64-encoded scripts.
pub const SCRIPT_PREFIX: &str = "base64:";

// ---------------------------------------------------------------------------
// Seed Phrases
// ---------------------------------------------------------------------------

/// A generated seed phrase is five rounds of three words.
pub const SEED_PHRASE_ROUNDS: usize = 5;

/// Words in the English wordlist.
pub const WORDLIST_SIZE: u32 = 2048;

// ---------------------------------------------------------------------------
// Node Polling
// ---------------------------------------------------------------------------

/// How often to ask the node whether a broadcast transaction made it into a
/// block.
pub const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How long to keep asking before giving up. Three minutes covers a couple of
/// slow blocks on testnet.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(180);

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns the default public node for a chain id.
/// Returns `None` for private chains; those need an explicit URL.
pub fn node_url_for_chain(chain_id: char) -> Option<&'static str> {
    match chain_id {
        CHAIN_ID_MAINNET => Some(MAINNET_NODE_URL),
        CHAIN_ID_TESTNET => Some(TESTNET_NODE_URL),
        _ => None,
    }
}

/// Returns a friendly name for a chain id, mainly for logging.
pub fn network_name(chain_id: char) -> String {
    match chain_id {
        CHAIN_ID_MAINNET => "mainnet".to_string(),
        CHAIN_ID_TESTNET => "testnet".to_string(),
        other => format!("custom({})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids_are_distinct_ascii() {
        assert_ne!(CHAIN_ID_MAINNET, CHAIN_ID_TESTNET);
        assert!(CHAIN_ID_MAINNET.is_ascii());
        assert!(CHAIN_ID_TESTNET.is_ascii());
    }

    #[test]
    fn test_address_layout_adds_up() {
        assert_eq!(
            1 + 1 + ADDRESS_HASH_LENGTH + ADDRESS_CHECKSUM_LENGTH,
            ADDRESS_LENGTH
        );
    }

    #[test]
    fn test_key_type_markers_are_distinct() {
        assert_ne!(KEY_TYPE_ED25519, KEY_TYPE_SECP256K1);
        assert_ne!(KEY_TYPE_ED25519, KEY_TYPE_SECP256R1);
        assert_ne!(KEY_TYPE_SECP256K1, KEY_TYPE_SECP256R1);
    }

    #[test]
    fn test_node_url_for_known_chains() {
        assert_eq!(node_url_for_chain('L'), Some(MAINNET_NODE_URL));
        assert_eq!(node_url_for_chain('T'), Some(TESTNET_NODE_URL));
        assert_eq!(node_url_for_chain('Z'), None);
    }

    #[test]
    fn test_network_name_formatting() {
        assert_eq!(network_name('L'), "mainnet");
        assert_eq!(network_name('T'), "testnet");
        assert_eq!(network_name('Z'), "custom(Z)");
    }

    #[test]
    fn test_polling_constants_sanity() {
        assert!(CONFIRMATION_POLL_INTERVAL < CONFIRMATION_TIMEOUT);
        assert!(CONFIRMATION_POLL_INTERVAL.as_millis() > 0);
    }
}
