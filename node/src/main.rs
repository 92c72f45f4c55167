// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # LTO Node Client
//!
//! Entry point for the `lto-node` binary. Parses CLI arguments, initializes
//! logging, and runs one command:
//!
//! - `account`: generate or derive accounts
//! - `validate`: check an address
//! - `anchor`, `transfer`, `lease`: build and sign a transaction, print
//!   its JSON, and optionally broadcast it
//! - `balance`, `tx`, `wait`, `height`, `block`, `history`, `leases`,
//!   `sponsorships`, `associations`: read from a public node
//! - `compile`: turn script source into a `SetScript` payload
//!
//! Results go to stdout as JSON; logs go to stderr.

mod cli;
mod client;
mod logging;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use lto_protocol::config::{network_name, SCRIPT_PREFIX};
use lto_protocol::crypto::{base64_encode, sha256};
use lto_protocol::identity::{validate_address, Account, AccountFactory, Address};
use lto_protocol::transaction::{
    Anchor, AnyTransaction, Lease, Transaction, TransactionBody, Transfer, TxConfig, Version,
};

use cli::{AccountCommand, Commands, LtoNodeCli, SignerArgs, SubmitArgs};
use client::{NodeConfig, PublicNode};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = LtoNodeCli::parse();
    logging::init_logging(logging::default_directives(cli.verbose), cli.log_format);

    tracing::debug!(
        chain_id = %cli.chain_id,
        network = %network_name(cli.chain_id),
        "starting lto-node"
    );

    let session = Session::new(&cli)?;
    let output = match cli.command {
        Commands::Account(command) => account(&session, command)?,
        Commands::Validate(args) => validate(&args.address),
        Commands::Anchor(args) => {
            let hash = match (&args.hash, &args.file) {
                (Some(hash), _) => hex_decode(hash)?,
                (None, Some(path)) => {
                    let contents = std::fs::read(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    sha256(&contents).to_vec()
                }
                (None, None) => bail!("either a hash or --file is required"),
            };
            session.submit(Anchor::new(hash).into(), &args.signer, &args.submit).await?
        }
        Commands::Transfer(args) => {
            let recipient = parse_address(&args.recipient)?;
            let body = Transfer::new(recipient, args.amount, args.attachment.into_bytes())
                .context("invalid transfer")?;
            session.submit(body.into(), &args.signer, &args.submit).await?
        }
        Commands::Lease(args) => {
            let recipient = parse_address(&args.recipient)?;
            let body = Lease::new(recipient, args.amount).context("invalid lease")?;
            session.submit(body.into(), &args.signer, &args.submit).await?
        }
        Commands::Balance(args) => {
            let balance = session.node()?.balance(&args.address).await.context("balance query failed")?;
            json!({ "address": args.address, "balance": balance })
        }
        Commands::Tx(args) if args.verify => {
            let tx = session
                .node()?
                .transaction(&args.id)
                .await
                .context("transaction query failed")?
                .ok_or_else(|| anyhow!("transaction {} is not known to the node", args.id))?;
            let valid = tx.verify_proofs().context("cannot verify transaction")?;
            json!({ "transaction": tx.to_json(), "proofsValid": valid })
        }
        Commands::Tx(args) => session
            .node()?
            .transaction_info(&args.id)
            .await
            .context("transaction query failed")?
            .ok_or_else(|| anyhow!("transaction {} is not known to the node", args.id))?,
        Commands::Wait(args) => session
            .node()?
            .wait_for_transaction(&args.id)
            .await
            .with_context(|| format!("waiting for {} failed", args.id))?,
        Commands::Height => json!({ "height": session.node()?.height().await.context("height query failed")? }),
        Commands::Block { height } => {
            let node = session.node()?;
            match height {
                Some(height) => node.block_at(height).await,
                None => node.last_block().await,
            }
            .context("block query failed")?
        }
        Commands::History(args) => session
            .node()?
            .transactions(&args.address, args.limit, args.after.as_deref())
            .await
            .context("history query failed")?,
        Commands::Leases(args) => session.node()?.lease_list(&args.address).await.context("lease query failed")?,
        Commands::Sponsorships(args) => session
            .node()?
            .sponsorship_list(&args.address)
            .await
            .context("sponsorship query failed")?,
        Commands::Associations(args) => session
            .node()?
            .association_list(&args.address)
            .await
            .context("association query failed")?,
        Commands::Compile { file } => {
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let script = session.node()?.compile_script(&source).await.context("compilation failed")?;
            json!({ "script": format!("{SCRIPT_PREFIX}{}", base64_encode(&script)), "size": script.len() })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Settings shared by every command.
struct Session {
    factory: AccountFactory,
    node_config: Option<NodeConfig>,
}

impl Session {
    fn new(cli: &LtoNodeCli) -> Result<Self> {
        let factory = AccountFactory::new(cli.chain_id)
            .with_context(|| format!("invalid chain id '{}'", cli.chain_id))?;
        let node_config = match &cli.node_url {
            Some(url) => Some(NodeConfig::new(url.as_str())),
            None => NodeConfig::for_chain(cli.chain_id),
        };
        Ok(Self { factory, node_config })
    }

    fn node(&self) -> Result<PublicNode> {
        let config = self
            .node_config
            .clone()
            .ok_or_else(|| anyhow!("no known public node for this chain; pass --node-url"))?;
        PublicNode::connect(config).context("failed to create HTTP client")
    }

    fn account(&self, signer: &SignerArgs) -> Account {
        self.factory
            .with_key_type(signer.key_type)
            .create_from_seed(&signer.seed, signer.nonce)
    }

    /// Sign `body`, optionally sponsor it, print or broadcast it.
    async fn submit(&self, body: TransactionBody, signer: &SignerArgs, submit: &SubmitArgs) -> Result<Value> {
        let mut config = TxConfig::new();
        if let Some(fee) = submit.fee {
            config = config.fee(fee);
        }
        if let Some(version) = submit.tx_version {
            let version = Version::from_u8(version).ok_or_else(|| anyhow!("unknown version {version}"))?;
            config = config.version(version);
        }

        let sender = self.account(signer);
        let signed = Transaction::new(body, config)?
            .sign_with(&sender)
            .context("failed to sign transaction")?;

        let tx: AnyTransaction = match &submit.sponsor_seed {
            Some(seed) => {
                let sponsor = self.factory.create_from_seed(seed, 0);
                signed.sponsor_with(&sponsor).context("failed to sponsor transaction")?.into()
            }
            None => signed.into(),
        };

        let json = tx.to_json();
        if !submit.broadcast {
            return Ok(json);
        }

        let node = self.node()?;
        let id = node.broadcast(&json).await.context("broadcast failed")?;
        if submit.wait {
            return node
                .wait_for_transaction(&id)
                .await
                .with_context(|| format!("transaction {id} was broadcast but not confirmed"));
        }
        Ok(json!({ "id": id, "transaction": json }))
    }
}

fn account(session: &Session, command: AccountCommand) -> Result<Value> {
    let account = match command {
        AccountCommand::New { key_type } => session.factory.with_key_type(key_type).create(),
        AccountCommand::Show { signer, expect_address } => {
            let account = session.account(&signer);
            session.factory
                .with_key_type(signer.key_type)
                .assert_account(&account, expect_address.as_deref(), None, None)
                .context("derived account does not match")?;
            account
        }
    };

    let private_key = account.key_pair().map(|kp| kp.secret_base58());
    Ok(json!({
        "address": account.address().to_string(),
        "chainId": account.chain_id().to_string(),
        "keyType": account.key_type().as_str(),
        "publicKey": account.public_key().to_base58(),
        "privateKey": private_key,
        "seed": account.seed(),
        "nonce": account.nonce(),
    }))
}

fn validate(address: &str) -> Value {
    match validate_address(address) {
        Ok(valid) => json!({ "address": address, "valid": valid }),
        Err(err) => json!({ "address": address, "valid": false, "reason": err.to_string() }),
    }
}

fn parse_address(text: &str) -> Result<Address> {
    text.parse().with_context(|| format!("invalid recipient address {text}"))
}

fn hex_decode(text: &str) -> Result<Vec<u8>> {
    hex::decode(text.trim_start_matches("0x")).with_context(|| format!("{text} is not valid hex"))
}
