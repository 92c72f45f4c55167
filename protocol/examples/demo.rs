//! Walkthrough of the LTO protocol library, offline.
//!
//! Generates a seed phrase, derives accounts on all three curves, builds a
//! transfer and an anchor, signs, sponsors, prints the wire formats and
//! parses them back. Nothing is broadcast; see the `lto-node` binary for
//! that.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use lto_protocol::crypto::{sha256, KeyType};
use lto_protocol::identity::{generate_seed_phrase, AccountFactory};
use lto_protocol::transaction::{Anchor, AnyTransaction, Transaction, Transfer, TxConfig};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    LTO PROTOCOL  --  Offline Signing Walkthrough                   {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    Ed25519 + secp256k1 + secp256r1  |  testnet ('T')               {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                                    {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]=============================================================={RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}------------------------------------------------------------------------{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}{MAGENTA}  [{label}: {ms:.2} ms]{RESET}");
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    banner();

    // -----------------------------------------------------------------------
    // Step 1: Seed phrase and accounts
    // -----------------------------------------------------------------------

    section(1, "Seed Phrase & Account Derivation");
    let phrase = generate_seed_phrase();
    info("Seed phrase", &phrase);

    let t = Instant::now();
    let accounts: Vec<_> = [KeyType::Ed25519, KeyType::Secp256k1, KeyType::Secp256r1]
        .into_iter()
        .map(|key_type| {
            AccountFactory::new('T')
                .unwrap()
                .with_key_type(key_type)
                .create_from_seed(&phrase, 0)
        })
        .collect();
    timing("derive x3", t.elapsed());

    for account in &accounts {
        println!(
            "  {BLUE}{BOLD}{:<10}{RESET} {} {DIM}{}{RESET}",
            account.key_type().as_str(),
            account.address(),
            account.public_key()
        );
    }
    success("One phrase, three curves, three addresses");

    let alice = &accounts[0];
    let bob = AccountFactory::new('T').unwrap().create();
    let sponsor = &accounts[1];

    // -----------------------------------------------------------------------
    // Step 2: Transfer
    // -----------------------------------------------------------------------

    section(2, "Build & Sign a Transfer");
    let t = Instant::now();
    let transfer = Transaction::new(
        Transfer::new(*bob.address(), 250_000_000, b"coffee".to_vec()).unwrap(),
        TxConfig::new(),
    )
    .unwrap()
    .sign_with(alice)
    .unwrap();
    timing("build + sign", t.elapsed());

    let bytes = transfer.to_binary().unwrap();
    info("Binary", &hex::encode(&bytes));
    info("Id", &transfer.id().unwrap());
    info("Fee", &transfer.fee().to_string());
    println!();
    println!("{DIM}{}{RESET}", serde_json::to_string_pretty(&transfer.to_json()).unwrap());

    // -----------------------------------------------------------------------
    // Step 3: Sponsored anchor
    // -----------------------------------------------------------------------

    section(3, "Sponsored Anchor");
    let digest = sha256(b"contract.pdf");
    let anchor = Transaction::new(Anchor::new(digest.to_vec()), TxConfig::new())
        .unwrap()
        .sign_with(alice)
        .unwrap()
        .sponsor_with(sponsor)
        .unwrap();
    info("Sender", &anchor.sender().unwrap().address().to_string());
    info("Sponsor", &anchor.sponsor().unwrap().address().to_string());
    info("Proofs", &anchor.proofs().len().to_string());
    success("Sender signs first, sponsor signs the same bytes");

    // -----------------------------------------------------------------------
    // Step 4: Round trip
    // -----------------------------------------------------------------------

    section(4, "JSON Round Trip & Verification");
    let text = serde_json::to_string(&anchor.to_json()).unwrap();
    let parsed = AnyTransaction::from_json_str(&text).unwrap();
    assert_eq!(parsed.to_binary().unwrap(), anchor.to_binary().unwrap());
    assert!(parsed.verify_proofs().unwrap());
    success("Parsed transaction is byte-identical and both proofs verify");
    println!();
}
