//! # Seed Phrases
//!
//! Fresh accounts get a 15-word phrase from the 2048-word English list. Each
//! of five rounds draws a random `u32` and turns it into three words:
//!
//! ```text
//! w1 = x mod n
//! w2 = (x / n + w1) mod n
//! w3 = (x / n / n + w2) mod n
//! ```
//!
//! The phrase is the only secret; everything else is derived from it.

use rand::rngs::OsRng;
use rand::RngCore;

use super::wordlist::WORDLIST;
use crate::config::{SEED_PHRASE_ROUNDS, WORDLIST_SIZE};

/// Generate a new 15-word seed phrase with the OS RNG.
pub fn generate_seed_phrase() -> String {
    generate_seed_phrase_with(&mut OsRng)
}

/// Generate a seed phrase from a caller-supplied RNG.
pub fn generate_seed_phrase_with<R: RngCore>(rng: &mut R) -> String {
    let mut words = Vec::with_capacity(SEED_PHRASE_ROUNDS * 3);
    for _ in 0..SEED_PHRASE_ROUNDS {
        words.extend(words_for(rng.next_u32()));
    }
    words.join(" ")
}

fn words_for(x: u32) -> [&'static str; 3] {
    let n = WORDLIST_SIZE;
    let w1 = x % n;
    let w2 = (x / n + w1) % n;
    let w3 = (x / n / n + w2) % n;
    [
        WORDLIST[w1 as usize],
        WORDLIST[w2 as usize],
        WORDLIST[w3 as usize],
    ]
}
