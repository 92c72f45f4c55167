//! Proof verification.
//!
//! A bad proof is an answer, not an error: these functions return
//! `Ok(false)` on any mismatch. They only fail when there is nothing to
//! verify against (no sender) or the bytes cannot be produced.

use super::builder::Transaction;
use super::error::TransactionError;
use super::signing::AnyTransaction;
use crate::crypto::signatures::{batch_verify, verify};

/// Check `proofs[0]` against the sender's public key.
pub fn verify_sender_proof<S>(tx: &Transaction<S>) -> Result<bool, TransactionError> {
    let sender = tx.sender().ok_or(TransactionError::MissingSender)?;
    let Some(proof) = tx.proofs().first() else {
        return Ok(false);
    };
    Ok(verify(sender.public_key(), &tx.to_binary()?, proof))
}

/// Check the sender proof and, when sponsored, the last proof against the
/// sponsor's public key.
///
/// Co-signer proofs in between are not checked; they belong to keys the
/// transaction does not name.
pub fn verify_proofs<S>(tx: &Transaction<S>) -> Result<bool, TransactionError> {
    let sender = tx.sender().ok_or(TransactionError::MissingSender)?;
    let proofs = tx.proofs();
    let Some(sender_proof) = proofs.first() else {
        return Ok(false);
    };
    let message = tx.to_binary()?;

    let mut checks = vec![(sender.public_key(), message.as_slice(), sender_proof)];
    if let Some(sponsor) = tx.sponsor() {
        match proofs.last() {
            Some(sponsor_proof) if proofs.len() >= 2 => {
                checks.push((sponsor.public_key(), message.as_slice(), sponsor_proof))
            }
            _ => return Ok(false),
        }
    }

    Ok(batch_verify(&checks).is_ok())
}

impl AnyTransaction {
    pub fn verify_sender_proof(&self) -> Result<bool, TransactionError> {
        match self {
            Self::Unsigned(tx) => verify_sender_proof(tx),
            Self::SenderSigned(tx) => verify_sender_proof(tx),
            Self::FullySigned(tx) => verify_sender_proof(tx),
        }
    }

    pub fn verify_proofs(&self) -> Result<bool, TransactionError> {
        match self {
            Self::Unsigned(tx) => verify_proofs(tx),
            Self::SenderSigned(tx) => verify_proofs(tx),
            Self::FullySigned(tx) => verify_proofs(tx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{KeyType, Signature};
    use crate::identity::{Account, AccountFactory};
    use crate::transaction::kinds::Anchor;
    use crate::transaction::types::TxConfig;

    fn account(seed: &str, key_type: KeyType) -> Account {
        AccountFactory::new('T').unwrap().with_key_type(key_type).create_from_seed(seed, 0)
    }

    fn anchor() -> Transaction {
        Transaction::new(Anchor::new(b"verify me".to_vec()), TxConfig::new()).unwrap()
    }

    #[test]
    fn unsigned_has_no_sender() {
        assert!(matches!(verify_sender_proof(&anchor()), Err(TransactionError::MissingSender)));
        assert!(matches!(verify_proofs(&anchor()), Err(TransactionError::MissingSender)));
    }

    #[test]
    fn valid_proofs_for_every_key_type() {
        for key_type in [KeyType::Ed25519, KeyType::Secp256k1, KeyType::Secp256r1] {
            let tx = anchor()
                .sign_with(&account("sender", key_type))
                .unwrap()
                .sponsor_with(&account("sponsor", key_type))
                .unwrap();
            assert!(verify_sender_proof(&tx).unwrap());
            assert!(verify_proofs(&tx).unwrap());
        }
    }

    #[test]
    fn tampered_proof_is_false() {
        let mut tx = anchor().sign_with(&account("sender", KeyType::Ed25519)).unwrap();
        let mut bytes = *tx.proofs[0].as_bytes();
        bytes[0] ^= 1;
        tx.proofs[0] = Signature::from_bytes(bytes);
        assert!(!verify_sender_proof(&tx).unwrap());
        assert!(!verify_proofs(&tx).unwrap());
    }

    #[test]
    fn swapped_sponsor_key_is_false() {
        let tx = anchor()
            .sign_with(&account("sender", KeyType::Ed25519))
            .unwrap()
            .sponsor_with(&account("sponsor", KeyType::Ed25519))
            .unwrap();
        let mut json = tx.to_json();
        let impostor = account("impostor", KeyType::Ed25519);
        json["sponsor"] = serde_json::json!(impostor.address().to_string());
        json["sponsorPublicKey"] = serde_json::json!(impostor.public_key().to_base58());

        let parsed = AnyTransaction::from_json(&json).unwrap();
        assert!(parsed.verify_sender_proof().unwrap());
        assert!(!parsed.verify_proofs().unwrap());
    }
}
