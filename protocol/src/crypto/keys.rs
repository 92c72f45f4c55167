//! # Key Management
//!
//! Keypairs, public keys and signatures for the three signature schemes the
//! chain accepts:
//!
//! | Key type    | Marker | Public key                  | Signature        |
//! |-------------|--------|-----------------------------|------------------|
//! | `ed25519`   | 1      | 32 bytes                    | 64 bytes, R‖S    |
//! | `secp256k1` | 2      | 64 bytes, `x ‖ y`           | 64 bytes, r‖s    |
//! | `secp256r1` | 3      | 64 bytes, `x ‖ y`           | 64 bytes, r‖s    |
//!
//! ECDSA public keys are the uncompressed SEC1 point with the leading `0x04`
//! tag stripped. ECDSA signatures are RFC 6979 deterministic over SHA-256 and
//! normalized to low-S.
//!
//! ## Deterministic derivation
//!
//! A seed phrase and an account index (`nonce`) map to a 32-byte account
//! seed:
//!
//! ```text
//! account_seed = SHA-256( hash_chain( u32_be(nonce) || latin1(phrase) ) )
//! ```
//!
//! For Ed25519 the account seed *is* the RFC 8032 secret. For the ECDSA
//! curves it seeds a try-and-again scalar sampler (see
//! [`KeyPair::from_seed`]).
//!
//! Key bytes are never logged. Debug output shows the public half only.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer as _, Verifier as _};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{
    ECDSA_PUBLIC_KEY_LENGTH, ED25519_PUBLIC_KEY_LENGTH, KEY_TYPE_ED25519, KEY_TYPE_SECP256K1,
    KEY_TYPE_SECP256R1, SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
use crate::crypto::encoding::{base58_decode, base58_encode, DecodeError};
use crate::crypto::hash::{hash_chain, sha256, sha256_multi};

/// Errors that can occur during key operations.
///
/// These say *what* was wrong with the input, never anything about the key
/// material itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes for {key_type}")]
    InvalidPublicKey { key_type: KeyType },

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,

    #[error("keypair validation failed: public key does not match secret key")]
    KeypairMismatch,

    #[error("account has no private key and cannot sign")]
    MissingPrivateKey,

    #[error("unknown key type: {0}")]
    UnknownKeyType(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// KeyType
// ---------------------------------------------------------------------------

/// Signature scheme of an account.
///
/// Serializes as the lowercase name the node uses in `senderKeyType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    #[default]
    Ed25519,
    Secp256k1,
    Secp256r1,
}

impl KeyType {
    /// The marker byte written into v3 binaries.
    pub fn marker(self) -> u8 {
        match self {
            KeyType::Ed25519 => KEY_TYPE_ED25519,
            KeyType::Secp256k1 => KEY_TYPE_SECP256K1,
            KeyType::Secp256r1 => KEY_TYPE_SECP256R1,
        }
    }

    /// Inverse of [`marker`](Self::marker).
    pub fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            KEY_TYPE_ED25519 => Some(KeyType::Ed25519),
            KEY_TYPE_SECP256K1 => Some(KeyType::Secp256k1),
            KEY_TYPE_SECP256R1 => Some(KeyType::Secp256r1),
            _ => None,
        }
    }

    /// The wire name: `ed25519`, `secp256k1` or `secp256r1`.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
            KeyType::Secp256k1 => "secp256k1",
            KeyType::Secp256r1 => "secp256r1",
        }
    }

    /// Length of a public key of this type in bytes.
    pub fn public_key_length(self) -> usize {
        match self {
            KeyType::Ed25519 => ED25519_PUBLIC_KEY_LENGTH,
            KeyType::Secp256k1 | KeyType::Secp256r1 => ECDSA_PUBLIC_KEY_LENGTH,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(KeyType::Ed25519),
            "secp256k1" => Ok(KeyType::Secp256k1),
            "secp256r1" => Ok(KeyType::Secp256r1),
            other => Err(KeyError::UnknownKeyType(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Account seed derivation
// ---------------------------------------------------------------------------

/// Derive the 32-byte account seed for `(phrase, nonce)`.
///
/// The phrase is hashed as Latin-1 when every character fits in one byte,
/// which covers every phrase the wordlist can generate. Phrases with
/// characters beyond U+00FF have no Latin-1 form and are hashed as UTF-8.
///
/// # Example
///
/// ```
/// use lto_protocol::crypto::keys::derive_account_seed;
///
/// let a = derive_account_seed("correct horse battery staple", 0);
/// let b = derive_account_seed("correct horse battery staple", 1);
/// assert_ne!(a, b);
/// ```
pub fn derive_account_seed(phrase: &str, nonce: u32) -> [u8; 32] {
    let mut input = Vec::with_capacity(4 + phrase.len());
    input.extend_from_slice(&nonce.to_be_bytes());
    input.extend_from_slice(&phrase_bytes(phrase));
    sha256(&hash_chain(&input))
}

fn phrase_bytes(phrase: &str) -> Vec<u8> {
    if phrase.chars().all(|c| (c as u32) <= 0xFF) {
        phrase.chars().map(|c| c as u8).collect()
    } else {
        phrase.as_bytes().to_vec()
    }
}

/// Deterministic byte stream used to sample ECDSA scalars from a seed.
///
/// Block `n` is `SHA-256("prng-" || n || "-" || seed)` with `n` in decimal.
struct SeedStream<'a> {
    seed: &'a [u8],
    counter: u64,
    buffer: Vec<u8>,
}

impl<'a> SeedStream<'a> {
    fn new(seed: &'a [u8]) -> Self {
        Self {
            seed,
            counter: 0,
            buffer: Vec::new(),
        }
    }

    fn take(&mut self) -> [u8; 32] {
        while self.buffer.len() < 32 {
            let counter = self.counter.to_string();
            let block = sha256_multi(&[b"prng-", counter.as_bytes(), b"-", self.seed]);
            self.buffer.extend_from_slice(&block);
            self.counter += 1;
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.buffer[..32]);
        self.buffer.drain(..32);
        out
    }
}

/// Adds one to a big-endian 256-bit integer. `None` on overflow.
fn increment_be(mut bytes: [u8; 32]) -> Option<[u8; 32]> {
    for byte in bytes.iter_mut().rev() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            return Some(bytes);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum SecretKey {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
    Secp256r1(p256::ecdsa::SigningKey),
}

/// A signing keypair of any supported type.
///
/// Deliberately not `Serialize`. Exporting a private key is an explicit call
/// to [`secret_bytes`](Self::secret_bytes).
///
/// # Examples
///
/// ```
/// use lto_protocol::crypto::keys::{KeyPair, KeyType};
///
/// let kp = KeyPair::generate(KeyType::Secp256k1);
/// let sig = kp.sign(b"anchor this");
/// assert!(kp.public_key().verify(b"anchor this", &sig));
/// ```
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
}

impl KeyPair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate(key_type: KeyType) -> Self {
        let secret = match key_type {
            KeyType::Ed25519 => SecretKey::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng)),
            KeyType::Secp256k1 => SecretKey::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng)),
            KeyType::Secp256r1 => SecretKey::Secp256r1(p256::ecdsa::SigningKey::random(&mut OsRng)),
        };
        Self { secret }
    }

    /// Constructs a keypair deterministically from a 32-byte account seed.
    ///
    /// Ed25519 uses the seed as its secret directly. The ECDSA curves draw
    /// 32-byte blocks from a SHA-256 stream over the seed, read each as a
    /// big-endian integer plus one, and keep the first value in `[1, n)`.
    pub fn from_seed(key_type: KeyType, seed: &[u8; 32]) -> Self {
        let secret = match key_type {
            KeyType::Ed25519 => SecretKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(seed)),
            KeyType::Secp256k1 => {
                SecretKey::Secp256k1(sample_scalar(seed, |b| k256::ecdsa::SigningKey::from_slice(b).ok()))
            }
            KeyType::Secp256r1 => {
                SecretKey::Secp256r1(sample_scalar(seed, |b| p256::ecdsa::SigningKey::from_slice(b).ok()))
            }
        };
        Self { secret }
    }

    /// Reconstruct a keypair from exported secret key bytes.
    ///
    /// Ed25519 accepts the 32-byte seed or the 64-byte `seed || public key`
    /// form; in the latter the halves must agree. ECDSA accepts the 32-byte
    /// big-endian scalar.
    pub fn from_secret_bytes(key_type: KeyType, bytes: &[u8]) -> Result<Self, KeyError> {
        let secret = match key_type {
            KeyType::Ed25519 => match bytes.len() {
                SECRET_KEY_LENGTH => {
                    let mut seed = [0u8; 32];
                    seed.copy_from_slice(bytes);
                    SecretKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed))
                }
                64 => {
                    let mut pair = [0u8; 64];
                    pair.copy_from_slice(bytes);
                    let key = ed25519_dalek::SigningKey::from_keypair_bytes(&pair)
                        .map_err(|_| KeyError::KeypairMismatch)?;
                    SecretKey::Ed25519(key)
                }
                _ => return Err(KeyError::InvalidSecretKey),
            },
            KeyType::Secp256k1 => SecretKey::Secp256k1(
                k256::ecdsa::SigningKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?,
            ),
            KeyType::Secp256r1 => SecretKey::Secp256r1(
                p256::ecdsa::SigningKey::from_slice(bytes).map_err(|_| KeyError::InvalidSecretKey)?,
            ),
        };
        Ok(Self { secret })
    }

    /// Base58 variant of [`from_secret_bytes`](Self::from_secret_bytes).
    pub fn from_base58(key_type: KeyType, text: &str) -> Result<Self, KeyError> {
        Self::from_secret_bytes(key_type, &base58_decode(text)?)
    }

    pub fn key_type(&self) -> KeyType {
        match self.secret {
            SecretKey::Ed25519(_) => KeyType::Ed25519,
            SecretKey::Secp256k1(_) => KeyType::Secp256k1,
            SecretKey::Secp256r1(_) => KeyType::Secp256r1,
        }
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> PublicKey {
        let bytes = match &self.secret {
            SecretKey::Ed25519(key) => key.verifying_key().to_bytes().to_vec(),
            SecretKey::Secp256k1(key) => key.verifying_key().to_encoded_point(false).as_bytes()[1..].to_vec(),
            SecretKey::Secp256r1(key) => key.verifying_key().to_encoded_point(false).as_bytes()[1..].to_vec(),
        };
        PublicKey {
            key_type: self.key_type(),
            bytes,
        }
    }

    /// Sign a message.
    ///
    /// Deterministic for every key type: Ed25519 by construction, ECDSA via
    /// RFC 6979 nonces.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        match &self.secret {
            SecretKey::Ed25519(key) => bytes.copy_from_slice(&key.sign(message).to_bytes()),
            SecretKey::Secp256k1(key) => {
                let sig: k256::ecdsa::Signature = k256::ecdsa::signature::Signer::sign(key, message);
                bytes.copy_from_slice(&sig.to_bytes());
            }
            SecretKey::Secp256r1(key) => {
                let sig: p256::ecdsa::Signature = p256::ecdsa::signature::Signer::sign(key, message);
                bytes.copy_from_slice(&sig.to_bytes());
            }
        }
        Signature(bytes)
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Exports the secret key.
    ///
    /// Ed25519 exports the 64-byte `seed || public key` form the rest of the
    /// ecosystem expects; ECDSA exports the 32-byte scalar.
    pub fn secret_bytes(&self) -> Vec<u8> {
        match &self.secret {
            SecretKey::Ed25519(key) => key.to_keypair_bytes().to_vec(),
            SecretKey::Secp256k1(key) => key.to_bytes().to_vec(),
            SecretKey::Secp256r1(key) => key.to_bytes().to_vec(),
        }
    }

    /// Base58 of [`secret_bytes`](Self::secret_bytes).
    pub fn secret_base58(&self) -> String {
        base58_encode(&self.secret_bytes())
    }
}

fn sample_scalar<K>(seed: &[u8; 32], accept: impl Fn(&[u8]) -> Option<K>) -> K {
    let mut stream = SeedStream::new(seed);
    loop {
        if let Some(candidate) = increment_be(stream.take()) {
            // from_slice rejects zero and anything >= the group order.
            if let Some(key) = accept(&candidate) {
                return key;
            }
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({}, pub={})", self.key_type(), self.public_key().to_base58())
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for KeyPair {}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of a keypair, tagged with its key type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Wrap raw public key bytes, checking that they encode a valid point.
    pub fn from_bytes(key_type: KeyType, bytes: &[u8]) -> Result<Self, KeyError> {
        let invalid = || KeyError::InvalidPublicKey { key_type };
        if bytes.len() != key_type.public_key_length() {
            return Err(invalid());
        }
        let valid = match key_type {
            KeyType::Ed25519 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                ed25519_dalek::VerifyingKey::from_bytes(&arr).is_ok()
            }
            KeyType::Secp256k1 => {
                k256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1_uncompressed(bytes)).is_ok()
            }
            KeyType::Secp256r1 => {
                p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1_uncompressed(bytes)).is_ok()
            }
        };
        if !valid {
            return Err(invalid());
        }
        Ok(Self {
            key_type,
            bytes: bytes.to_vec(),
        })
    }

    /// Parse a base58 public key.
    pub fn from_base58(key_type: KeyType, text: &str) -> Result<Self, KeyError> {
        Self::from_bytes(key_type, &base58_decode(text)?)
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_base58(&self) -> String {
        base58_encode(&self.bytes)
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `false` for any failure, including malformed signatures.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        match self.key_type {
            KeyType::Ed25519 => {
                let Ok(arr) = <[u8; 32]>::try_from(self.bytes.as_slice()) else {
                    return false;
                };
                let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&arr) else {
                    return false;
                };
                let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
                key.verify(message, &sig).is_ok()
            }
            KeyType::Secp256k1 => {
                use k256::ecdsa::signature::Verifier;
                let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1_uncompressed(&self.bytes)) else {
                    return false;
                };
                let Ok(sig) = k256::ecdsa::Signature::from_slice(&signature.0) else {
                    return false;
                };
                key.verify(message, &sig).is_ok()
            }
            KeyType::Secp256r1 => {
                use p256::ecdsa::signature::Verifier;
                let Ok(key) = p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1_uncompressed(&self.bytes)) else {
                    return false;
                };
                let Ok(sig) = p256::ecdsa::Signature::from_slice(&signature.0) else {
                    return false;
                };
                key.verify(message, &sig).is_ok()
            }
        }
    }
}

fn sec1_uncompressed(xy: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(xy.len() + 1);
    out.push(0x04);
    out.extend_from_slice(xy);
    out
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}, {})", self.key_type, self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte signature. Base58 in text form and on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_LENGTH] = slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self(bytes))
    }

    pub fn from_base58(text: &str) -> Result<Self, KeyError> {
        Self::try_from_slice(&base58_decode(text)?)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        base58_encode(&self.0)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_base58();
        if text.len() > 16 {
            write!(f, "Signature({}...{})", &text[..8], &text[text.len() - 8..])
        } else {
            write!(f, "Signature({})", text)
        }
    }
}

impl FromStr for Signature {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base58(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "fragile because fox snap picnic mean art observe vicious program chicken purse text hidden chest";

    const ALL_TYPES: [KeyType; 3] = [KeyType::Ed25519, KeyType::Secp256k1, KeyType::Secp256r1];

    #[test]
    fn test_account_seed_known_vector() {
        let seed = derive_account_seed(PHRASE, 0);
        assert_eq!(
            hex::encode(seed),
            "c15f03dadb6aaa27dc3f33600ba3a4edbf6e1cf05a300449fbe3011995ea7726"
        );
    }

    #[test]
    fn test_account_seed_depends_on_nonce() {
        assert_ne!(derive_account_seed(PHRASE, 0), derive_account_seed(PHRASE, 1));
    }

    #[test]
    fn test_ed25519_known_public_key() {
        let kp = KeyPair::from_seed(KeyType::Ed25519, &derive_account_seed(PHRASE, 0));
        assert_eq!(
            kp.public_key().to_base58(),
            "G3PaJt9cUvM5dVW8XAZnKrqmQj1xbSQ4yM7gWuknEKjn"
        );
    }

    #[test]
    fn test_ecdsa_known_scalars() {
        let seed = derive_account_seed(PHRASE, 0);
        let expected = "7d491f72cb4536dbdd32403078c4e353888454cf8739c3a434a64e28cf07846e";
        for key_type in [KeyType::Secp256k1, KeyType::Secp256r1] {
            let kp = KeyPair::from_seed(key_type, &seed);
            assert_eq!(hex::encode(kp.secret_bytes()), expected, "{key_type}");
        }
    }

    #[test]
    fn test_ecdsa_known_public_keys() {
        let seed = derive_account_seed(PHRASE, 0);
        assert_eq!(
            KeyPair::from_seed(KeyType::Secp256k1, &seed).public_key().to_base58(),
            "5EhdMs1NT955hxWxVSYN4xD8K3DX1hCa8gaEMABAMGZEbkRh4SK8FBbLkEbVmQUvLSQojgJTi8ZApTZuZRQNZqWs"
        );
        assert_eq!(
            KeyPair::from_seed(KeyType::Secp256r1, &seed).public_key().to_base58(),
            "5mtr9sjYpKXQvdWztmBiTHEsnAopGJzQzJYeLgQLL4rHMc4suQ4fYYbP2FFN6pDGtS3QQoeA92o41zdmdiAAcgH1"
        );
    }

    #[test]
    fn test_latin1_phrase_matches_utf8_for_ascii() {
        assert_eq!(phrase_bytes("plain ascii"), b"plain ascii".to_vec());
        // U+00E9 is one Latin-1 byte but two UTF-8 bytes.
        assert_eq!(phrase_bytes("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        // U+20AC has no Latin-1 form.
        assert_eq!(phrase_bytes("\u{20ac}"), "\u{20ac}".as_bytes().to_vec());
    }

    #[test]
    fn test_increment_be() {
        let mut low = [0u8; 32];
        low[31] = 0xFF;
        let bumped = increment_be(low).unwrap();
        assert_eq!(bumped[30], 1);
        assert_eq!(bumped[31], 0);
        assert!(increment_be([0xFF; 32]).is_none());
    }

    #[test]
    fn keypair_sign_verify_roundtrip() {
        for key_type in ALL_TYPES {
            let kp = KeyPair::generate(key_type);
            let sig = kp.sign(b"transfer 100 LTO");
            assert!(kp.verify(b"transfer 100 LTO", &sig), "{key_type}");
            assert!(!kp.verify(b"transfer 101 LTO", &sig), "{key_type}");
        }
    }

    #[test]
    fn wrong_key_fails_verification() {
        for key_type in ALL_TYPES {
            let kp1 = KeyPair::generate(key_type);
            let kp2 = KeyPair::generate(key_type);
            let sig = kp1.sign(b"message");
            assert!(!kp2.verify(b"message", &sig));
        }
    }

    #[test]
    fn test_deterministic_signatures() {
        for key_type in ALL_TYPES {
            let kp = KeyPair::from_seed(key_type, &[7u8; 32]);
            assert_eq!(kp.sign(b"same"), kp.sign(b"same"), "{key_type}");
        }
    }

    #[test]
    fn test_public_key_lengths() {
        for key_type in ALL_TYPES {
            let pk = KeyPair::generate(key_type).public_key();
            assert_eq!(pk.as_bytes().len(), key_type.public_key_length());
            assert_eq!(pk.key_type(), key_type);
        }
    }

    #[test]
    fn test_secret_bytes_roundtrip() {
        for key_type in ALL_TYPES {
            let kp = KeyPair::generate(key_type);
            let restored = KeyPair::from_secret_bytes(key_type, &kp.secret_bytes()).unwrap();
            assert_eq!(kp, restored);
            let restored = KeyPair::from_base58(key_type, &kp.secret_base58()).unwrap();
            assert_eq!(kp, restored);
        }
    }

    #[test]
    fn test_ed25519_accepts_32_byte_seed() {
        let kp = KeyPair::from_secret_bytes(KeyType::Ed25519, &[9u8; 32]).unwrap();
        assert_eq!(kp, KeyPair::from_seed(KeyType::Ed25519, &[9u8; 32]));
        assert_eq!(kp.secret_bytes().len(), 64);
    }

    #[test]
    fn test_ed25519_rejects_mismatched_halves() {
        let mut bytes = KeyPair::generate(KeyType::Ed25519).secret_bytes();
        let other = KeyPair::generate(KeyType::Ed25519).public_key();
        bytes[32..].copy_from_slice(other.as_bytes());
        match KeyPair::from_secret_bytes(KeyType::Ed25519, &bytes) {
            Err(KeyError::KeypairMismatch) => {}
            other => panic!("expected KeypairMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_secret_lengths_rejected() {
        for key_type in ALL_TYPES {
            assert_eq!(
                KeyPair::from_secret_bytes(key_type, &[1u8; 16]).unwrap_err(),
                KeyError::InvalidSecretKey
            );
        }
        // Zero is not a valid ECDSA scalar.
        assert!(KeyPair::from_secret_bytes(KeyType::Secp256k1, &[0u8; 32]).is_err());
    }

    #[test]
    fn test_public_key_rejects_wrong_length() {
        match PublicKey::from_bytes(KeyType::Ed25519, &[0u8; 16]) {
            Err(KeyError::InvalidPublicKey { key_type: KeyType::Ed25519 }) => {}
            other => panic!("expected InvalidPublicKey, got {:?}", other),
        }
        // A 64-byte string of zeros is not a point on either curve.
        assert!(PublicKey::from_bytes(KeyType::Secp256k1, &[0u8; 64]).is_err());
        assert!(PublicKey::from_bytes(KeyType::Secp256r1, &[0u8; 64]).is_err());
    }

    #[test]
    fn test_public_key_base58_roundtrip() {
        for key_type in ALL_TYPES {
            let pk = KeyPair::generate(key_type).public_key();
            let restored = PublicKey::from_base58(key_type, &pk.to_base58()).unwrap();
            assert_eq!(pk, restored);
        }
    }

    #[test]
    fn test_key_type_names_and_markers() {
        for key_type in ALL_TYPES {
            assert_eq!(key_type.as_str().parse::<KeyType>().unwrap(), key_type);
            assert_eq!(KeyType::from_marker(key_type.marker()), Some(key_type));
        }
        assert_eq!(KeyType::from_marker(9), None);
        assert!(matches!("rsa".parse::<KeyType>(), Err(KeyError::UnknownKeyType(_))));
        assert_eq!(serde_json::to_string(&KeyType::Secp256r1).unwrap(), "\"secp256r1\"");
    }

    #[test]
    fn test_signature_serde_is_base58() {
        let sig = KeyPair::generate(KeyType::Ed25519).sign(b"x");
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", sig.to_base58()));
        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn test_signature_rejects_wrong_length() {
        assert_eq!(Signature::try_from_slice(&[0u8; 63]).unwrap_err(), KeyError::InvalidSignature);
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = KeyPair::from_seed(KeyType::Ed25519, &[1u8; 32]);
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("KeyPair(ed25519, pub="));
        assert!(!debug_str.contains(&kp.secret_base58()));
    }
}
