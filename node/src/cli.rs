//! # CLI Interface
//!
//! Defines the command-line argument structure for `lto-node` using `clap`
//! derive. Every flag that carries configuration or a secret can also come
//! from the environment (`LTO_NODE_URL`, `LTO_CHAIN_ID`, `LTO_SEED`,
//! `LTO_LOG_FORMAT`).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use lto_protocol::crypto::KeyType;

use crate::logging::LogFormat;

/// LTO Network client.
///
/// Derives accounts, builds and signs transactions offline, and talks to a
/// public node to broadcast them and read chain state.
#[derive(Parser, Debug)]
#[command(
    name = "lto-node",
    about = "Build, sign and broadcast LTO Network transactions",
    version,
    propagate_version = true
)]
pub struct LtoNodeCli {
    /// Public node to talk to. Defaults to the public node of the chain.
    #[arg(long, global = true, env = "LTO_NODE_URL")]
    pub node_url: Option<String>,

    /// Network identifier: 'L' for mainnet, 'T' for testnet.
    #[arg(long, global = true, env = "LTO_CHAIN_ID", default_value_t = 'L')]
    pub chain_id: char,

    /// Log output format.
    #[arg(long, global = true, env = "LTO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Log debug output from the client and the protocol library.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the LTO client binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or inspect accounts.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Check that an address is well-formed.
    Validate(ValidateArgs),
    /// Anchor a hash on chain.
    Anchor(AnchorArgs),
    /// Send tokens to one recipient.
    Transfer(TransferArgs),
    /// Lease tokens to a node.
    Lease(LeaseArgs),
    /// Show the balance of an address.
    Balance(AddressArg),
    /// Show a transaction by id.
    Tx(TxArgs),
    /// Block until a transaction is known to the node.
    Wait(IdArg),
    /// Show the current block height.
    Height,
    /// Show a block, the latest one by default.
    Block {
        height: Option<u64>,
    },
    /// List transactions involving an address.
    History(HistoryArgs),
    /// List the active leases of an address.
    Leases(AddressArg),
    /// Show who sponsors an address.
    Sponsorships(AddressArg),
    /// List the associations of an address.
    Associations(AddressArg),
    /// Compile a script on the node and print it in `SetScript` form.
    Compile {
        /// File with the script source.
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Generate a new seed phrase and derive its first account.
    New {
        #[arg(long, default_value_t = KeyType::Ed25519)]
        key_type: KeyType,
    },
    /// Derive an account from a seed phrase.
    Show {
        #[command(flatten)]
        signer: SignerArgs,

        /// Fail unless the derived account has this address.
        #[arg(long)]
        expect_address: Option<String>,
    },
}

/// Account that signs a transaction.
#[derive(Args, Debug)]
pub struct SignerArgs {
    /// Seed phrase of the signing account.
    #[arg(long, env = "LTO_SEED", hide_env_values = true)]
    pub seed: String,

    /// Account number within the seed phrase.
    #[arg(long, default_value_t = 0)]
    pub nonce: u32,

    #[arg(long, default_value_t = KeyType::Ed25519)]
    pub key_type: KeyType,
}

/// What to do with a transaction after it is signed.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Seed phrase of an account that pays the fee instead of the sender.
    #[arg(long, env = "LTO_SPONSOR_SEED", hide_env_values = true)]
    pub sponsor_seed: Option<String>,

    /// Fee override in the smallest unit.
    #[arg(long)]
    pub fee: Option<u64>,

    /// Binary format version. Defaults to the latest.
    #[arg(long = "tx-version")]
    pub tx_version: Option<u8>,

    /// Submit to the node instead of only printing the JSON.
    #[arg(long)]
    pub broadcast: bool,

    /// After broadcasting, wait until the node knows the transaction.
    #[arg(long, requires = "broadcast")]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    pub address: String,
}

#[derive(Args, Debug)]
pub struct AnchorArgs {
    /// Hex-encoded hash to anchor.
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub hash: Option<String>,

    /// Anchor the SHA-256 of this file instead.
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub signer: SignerArgs,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    pub recipient: String,

    /// Amount in the smallest unit.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,

    /// Free-form attachment, sent as UTF-8 bytes.
    #[arg(long, default_value = "")]
    pub attachment: String,

    #[command(flatten)]
    pub signer: SignerArgs,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Args, Debug)]
pub struct LeaseArgs {
    /// Address of the node to lease to.
    pub recipient: String,

    /// Amount in the smallest unit.
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,

    #[command(flatten)]
    pub signer: SignerArgs,

    #[command(flatten)]
    pub submit: SubmitArgs,
}

#[derive(Args, Debug)]
pub struct AddressArg {
    pub address: String,
}

#[derive(Args, Debug)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct TxArgs {
    pub id: String,

    /// Parse the transaction and check its proofs.
    #[arg(long)]
    pub verify: bool,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    pub address: String,

    #[arg(long, default_value_t = 100)]
    pub limit: u32,

    /// Continue after this transaction id.
    #[arg(long)]
    pub after: Option<String>,
}
