//! JSON wire representation, as accepted by `/transactions/broadcast` and
//! returned by `/transactions/info/{id}`.
//!
//! Binary fields (attachments, anchors, hashes, keys, proofs) are base58;
//! scripts are `base64:`-prefixed base64. Fields the node adds to its
//! responses, such as `id` and `height`, are ignored on input.

use std::marker::PhantomData;

use serde_json::{json, Map, Value};
use tracing::warn;

use super::builder::{Signer, Transaction, Unsigned};
use super::error::TransactionError;
use super::kinds::{
    Anchor, Association, CancelLease, CancelSponsorship, Lease, MassTransfer, RevokeAssociation,
    SetScript, Sponsorship, TransactionBody, Transfer, TransferEntry,
};
use super::signing::AnyTransaction;
use super::types::{TransactionType, Version};
use crate::config::SCRIPT_PREFIX;
use crate::crypto::encoding::{base58_decode, base58_encode, base64_encode};
use crate::crypto::keys::{KeyType, PublicKey, Signature};
use crate::identity::address::Address;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

impl<S> Transaction<S> {
    /// The JSON object the node accepts for broadcast.
    ///
    /// Sender fields are left out until the sender signs, and sponsor fields
    /// until a sponsor signs.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), json!(self.kind().type_id()));
        obj.insert("version".into(), json!(self.version.as_u8()));

        if let Some(sender) = &self.sender {
            insert_signer(&mut obj, "sender", sender);
        }

        obj.insert("fee".into(), json!(self.fee));
        if let Some(timestamp) = self.timestamp {
            obj.insert("timestamp".into(), json!(timestamp));
        }

        write_body(&mut obj, &self.body, self.version);

        if let Some(sponsor) = &self.sponsor {
            insert_signer(&mut obj, "sponsor", sponsor);
        }

        let proofs: Vec<String> = self.proofs.iter().map(Signature::to_base58).collect();
        obj.insert("proofs".into(), json!(proofs));

        Value::Object(obj)
    }
}

fn insert_signer(obj: &mut Map<String, Value>, prefix: &str, signer: &Signer) {
    obj.insert(prefix.to_string(), json!(signer.address().to_string()));
    obj.insert(
        format!("{prefix}KeyType"),
        json!(signer.public_key().key_type().as_str()),
    );
    obj.insert(
        format!("{prefix}PublicKey"),
        json!(signer.public_key().to_base58()),
    );
}

fn write_body(obj: &mut Map<String, Value>, body: &TransactionBody, version: Version) {
    match body {
        TransactionBody::Transfer(t) => {
            obj.insert("recipient".into(), json!(t.recipient.to_string()));
            obj.insert("amount".into(), json!(t.amount));
            obj.insert("attachment".into(), json!(base58_encode(&t.attachment)));
        }
        TransactionBody::Lease(l) => {
            obj.insert("recipient".into(), json!(l.recipient.to_string()));
            obj.insert("amount".into(), json!(l.amount));
        }
        TransactionBody::CancelLease(c) => {
            obj.insert("leaseId".into(), json!(c.lease_id()));
        }
        TransactionBody::MassTransfer(m) => {
            let transfers: Vec<Value> = m
                .transfers
                .iter()
                .map(|e| json!({ "recipient": e.recipient.to_string(), "amount": e.amount }))
                .collect();
            obj.insert("transfers".into(), Value::Array(transfers));
            obj.insert("attachment".into(), json!(base58_encode(&m.attachment)));
        }
        TransactionBody::SetScript(s) => {
            obj.insert(
                "script".into(),
                json!(format!("{SCRIPT_PREFIX}{}", base64_encode(&s.script))),
            );
        }
        TransactionBody::Anchor(a) => {
            obj.insert("anchors".into(), json!([base58_encode(&a.anchor)]));
        }
        TransactionBody::Association(a) => {
            obj.insert("recipient".into(), json!(a.recipient.to_string()));
            obj.insert("associationType".into(), json!(a.association_type));
            if let Some(hash) = &a.hash {
                obj.insert("hash".into(), json!(base58_encode(hash)));
            }
            if let (Version::V3, Some(expires)) = (version, a.expires) {
                obj.insert("expires".into(), json!(expires));
            }
        }
        TransactionBody::RevokeAssociation(r) => {
            obj.insert("recipient".into(), json!(r.recipient.to_string()));
            obj.insert("associationType".into(), json!(r.association_type));
            if let Some(hash) = &r.hash {
                obj.insert("hash".into(), json!(base58_encode(hash)));
            }
        }
        TransactionBody::Sponsorship(s) => {
            obj.insert("recipient".into(), json!(s.recipient.to_string()));
        }
        TransactionBody::CancelSponsorship(s) => {
            obj.insert("recipient".into(), json!(s.recipient.to_string()));
        }
    }
}

impl AnyTransaction {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Unsigned(tx) => tx.to_json(),
            Self::SenderSigned(tx) => tx.to_json(),
            Self::FullySigned(tx) => tx.to_json(),
        }
    }

    /// Rebuild a transaction from its JSON form.
    ///
    /// The signing state follows from what is present: no sender means
    /// unsigned, a sponsor means fully signed. The sender address must
    /// belong to the sender public key, and the chain id is taken from it.
    /// Association expiries are not checked against the clock, since a
    /// transaction that was valid when signed stays parseable.
    pub fn from_json(value: &Value) -> Result<Self, TransactionError> {
        let obj = value
            .as_object()
            .ok_or_else(|| malformed("transaction must be a JSON object"))?;

        let type_id = u64_field(obj, "type")?;
        let kind = u8::try_from(type_id)
            .ok()
            .and_then(TransactionType::from_type_id)
            .ok_or(TransactionError::UnknownType(type_id))?;

        let version_id = u64_field(obj, "version")?;
        let version = u8::try_from(version_id)
            .ok()
            .and_then(Version::from_u8)
            .ok_or(TransactionError::UnknownVersion(version_id))?;
        kind.check_version(version)?;

        let body = read_body(obj, kind)?;
        body.check_layout(version)?;
        let fee = u64_field(obj, "fee")?;
        let timestamp = optional(obj, "timestamp")
            .map(|_| u64_field(obj, "timestamp"))
            .transpose()?;

        let sender = read_signer(obj, "sender", None)?;
        let chain_id = sender.as_ref().map(|s| s.address().chain_id());
        let sponsor = read_signer(obj, "sponsor", chain_id)?;

        let proofs = match optional(obj, "proofs") {
            None => Vec::new(),
            Some(value) => value
                .as_array()
                .ok_or_else(|| malformed("\"proofs\" must be an array"))?
                .iter()
                .map(|proof| {
                    let text = proof
                        .as_str()
                        .ok_or_else(|| malformed("proofs must be base58 strings"))?;
                    Ok(Signature::from_base58(text)?)
                })
                .collect::<Result<Vec<_>, TransactionError>>()?,
        };

        let tx = Transaction::<Unsigned> {
            body,
            version,
            fee,
            timestamp,
            sender,
            sponsor,
            proofs,
            state: PhantomData,
        };

        let state = (tx.sender.is_some(), tx.sponsor.is_some(), tx.proofs.len());
        match state {
            (false, false, 0) => Ok(Self::Unsigned(tx)),
            (false, _, _) => Err(malformed("proofs or sponsor present without a sender")),
            (true, _, 0) => Err(malformed("sender present without proofs")),
            (true, false, _) => Ok(Self::SenderSigned(tx.into_state())),
            (true, true, 1) => Err(malformed("sponsored transaction needs a sender and a sponsor proof")),
            (true, true, _) => Ok(Self::FullySigned(tx.into_state())),
        }
    }

    /// [`from_json`](Self::from_json) on raw text.
    pub fn from_json_str(text: &str) -> Result<Self, TransactionError> {
        Self::from_json(&serde_json::from_str(text)?)
    }
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

type Object = Map<String, Value>;

fn malformed(message: impl Into<String>) -> TransactionError {
    TransactionError::Malformed(message.into())
}

/// A present, non-null field.
fn optional<'a>(obj: &'a Object, name: &str) -> Option<&'a Value> {
    obj.get(name).filter(|v| !v.is_null())
}

fn required<'a>(obj: &'a Object, name: &str) -> Result<&'a Value, TransactionError> {
    optional(obj, name).ok_or_else(|| malformed(format!("missing field \"{name}\"")))
}

fn u64_field(obj: &Object, name: &str) -> Result<u64, TransactionError> {
    required(obj, name)?
        .as_u64()
        .ok_or_else(|| malformed(format!("\"{name}\" must be a non-negative integer")))
}

fn i64_field(obj: &Object, name: &str) -> Result<i64, TransactionError> {
    required(obj, name)?
        .as_i64()
        .ok_or_else(|| malformed(format!("\"{name}\" must be an integer")))
}

fn i32_field(obj: &Object, name: &str) -> Result<i32, TransactionError> {
    let value = i64_field(obj, name)?;
    i32::try_from(value).map_err(|_| malformed(format!("\"{name}\" does not fit in 32 bits")))
}

fn str_field<'a>(obj: &'a Object, name: &str) -> Result<&'a str, TransactionError> {
    required(obj, name)?
        .as_str()
        .ok_or_else(|| malformed(format!("\"{name}\" must be a string")))
}

fn address_field(obj: &Object, name: &str) -> Result<Address, TransactionError> {
    Ok(str_field(obj, name)?.parse()?)
}

/// Base58 bytes, empty when the field is absent.
fn bytes_field(obj: &Object, name: &str) -> Result<Vec<u8>, TransactionError> {
    match optional(obj, name) {
        None => Ok(Vec::new()),
        Some(_) => Ok(base58_decode(str_field(obj, name)?)?),
    }
}

fn read_signer(obj: &Object, prefix: &str, chain_id: Option<char>) -> Result<Option<Signer>, TransactionError> {
    let key_field = format!("{prefix}PublicKey");
    let Some(public_key) = optional(obj, &key_field) else {
        if optional(obj, prefix).is_some() {
            return Err(malformed(format!("\"{prefix}\" given without \"{key_field}\"")));
        }
        return Ok(None);
    };
    let public_key = public_key
        .as_str()
        .ok_or_else(|| malformed(format!("\"{key_field}\" must be a string")))?;

    let type_field = format!("{prefix}KeyType");
    let key_type = match optional(obj, &type_field) {
        None => KeyType::Ed25519,
        Some(_) => str_field(obj, &type_field)?.parse()?,
    };
    let public_key = PublicKey::from_base58(key_type, public_key)?;

    let address = match (optional(obj, prefix), chain_id) {
        (Some(_), _) => address_field(obj, prefix)?,
        (None, Some(chain_id)) => Address::from_public_key(&public_key, chain_id)?,
        (None, None) => return Err(malformed(format!("missing field \"{prefix}\""))),
    };
    if !address.matches_public_key(&public_key) {
        warn!(%address, field = prefix, "address does not belong to the public key");
        return Err(malformed(format!("\"{prefix}\" does not match \"{key_field}\"")));
    }

    Ok(Some(Signer::new(address, public_key)))
}

fn read_body(obj: &Object, kind: TransactionType) -> Result<TransactionBody, TransactionError> {
    let body: TransactionBody = match kind {
        TransactionType::Transfer => Transfer::new(
            address_field(obj, "recipient")?,
            i64_field(obj, "amount")?,
            bytes_field(obj, "attachment")?,
        )?
        .into(),
        TransactionType::Lease => {
            Lease::new(address_field(obj, "recipient")?, i64_field(obj, "amount")?)?.into()
        }
        TransactionType::CancelLease => CancelLease::new(str_field(obj, "leaseId")?)?.into(),
        TransactionType::MassTransfer => {
            let entries = required(obj, "transfers")?
                .as_array()
                .ok_or_else(|| malformed("\"transfers\" must be an array"))?
                .iter()
                .map(|entry| {
                    let entry = entry
                        .as_object()
                        .ok_or_else(|| malformed("transfers must be objects"))?;
                    Ok(TransferEntry::new(
                        address_field(entry, "recipient")?,
                        u64_field(entry, "amount")?,
                    ))
                })
                .collect::<Result<Vec<_>, TransactionError>>()?;
            MassTransfer::new(entries, bytes_field(obj, "attachment")?)?.into()
        }
        TransactionType::SetScript => SetScript::from_base64(str_field(obj, "script")?)?.into(),
        TransactionType::Anchor => {
            let anchors = required(obj, "anchors")?
                .as_array()
                .ok_or_else(|| malformed("\"anchors\" must be an array"))?;
            let [anchor] = anchors.as_slice() else {
                return Err(malformed(format!("expected exactly one anchor, got {}", anchors.len())));
            };
            let anchor = anchor
                .as_str()
                .ok_or_else(|| malformed("anchors must be base58 strings"))?;
            Anchor::new(base58_decode(anchor)?).into()
        }
        TransactionType::Association => {
            let expires = match optional(obj, "expires") {
                None => None,
                Some(_) => Some(u64_field(obj, "expires")?),
            };
            Association::unchecked(
                address_field(obj, "recipient")?,
                i32_field(obj, "associationType")?,
                Some(bytes_field(obj, "hash")?),
                expires,
            )
            .into()
        }
        TransactionType::RevokeAssociation => RevokeAssociation::new(
            address_field(obj, "recipient")?,
            i32_field(obj, "associationType")?,
            Some(bytes_field(obj, "hash")?),
        )
        .into(),
        TransactionType::Sponsorship => Sponsorship::new(address_field(obj, "recipient")?).into(),
        TransactionType::CancelSponsorship => {
            CancelSponsorship::new(address_field(obj, "recipient")?).into()
        }
    };
    Ok(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Account, AccountFactory};
    use crate::transaction::types::TxConfig;

    fn account(seed: &str) -> Account {
        AccountFactory::new('T').unwrap().create_from_seed(seed, 0)
    }

    fn signed_anchor() -> AnyTransaction {
        Transaction::new(Anchor::new(b"anchor".to_vec()), TxConfig::new().timestamp(1_000))
            .unwrap()
            .sign_with(&account("sender"))
            .unwrap()
            .into()
    }

    #[test]
    fn unsigned_json_has_no_sender() {
        let tx = Transaction::new(Anchor::new(vec![1, 2]), TxConfig::new()).unwrap();
        let json = tx.to_json();
        assert_eq!(json["type"], 15);
        assert_eq!(json["version"], 3);
        assert_eq!(json["fee"], 35_000_000);
        assert!(json.get("sender").is_none());
        assert!(json.get("timestamp").is_none());
        assert_eq!(json["proofs"], json!([]));

        let parsed = AnyTransaction::from_json(&json).unwrap();
        assert!(matches!(parsed, AnyTransaction::Unsigned(_)));
    }

    #[test]
    fn signed_json_fields() {
        let tx = signed_anchor();
        let json = tx.to_json();
        let sender = account("sender");
        assert_eq!(json["sender"], sender.address().to_string());
        assert_eq!(json["senderKeyType"], "ed25519");
        assert_eq!(json["senderPublicKey"], sender.public_key().to_base58());
        assert_eq!(json["timestamp"], 1_000);
        assert_eq!(json["anchors"], json!([base58_encode(b"anchor")]));
        assert_eq!(json["proofs"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn node_fields_are_ignored() {
        let mut json = signed_anchor().to_json();
        json["id"] = json!("whatever");
        json["height"] = json!(12);
        let parsed = AnyTransaction::from_json(&json).unwrap();
        assert_eq!(parsed, signed_anchor());
    }

    #[test]
    fn sender_key_type_defaults_to_ed25519() {
        let mut json = signed_anchor().to_json();
        json.as_object_mut().unwrap().remove("senderKeyType");
        let parsed = AnyTransaction::from_json(&json).unwrap();
        assert_eq!(parsed.sender().unwrap().public_key().key_type(), KeyType::Ed25519);
    }

    #[test]
    fn sender_must_match_public_key() {
        let mut json = signed_anchor().to_json();
        json["sender"] = json!(account("someone else").address().to_string());
        match AnyTransaction::from_json(&json) {
            Err(TransactionError::Malformed(_)) => {}
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn unknown_type_and_version() {
        let mut json = signed_anchor().to_json();
        json["type"] = json!(99);
        assert!(matches!(AnyTransaction::from_json(&json), Err(TransactionError::UnknownType(99))));

        let mut json = signed_anchor().to_json();
        json["version"] = json!(7);
        assert!(matches!(AnyTransaction::from_json(&json), Err(TransactionError::UnknownVersion(7))));

        let mut json = signed_anchor().to_json();
        json["version"] = json!(2);
        assert!(matches!(
            AnyTransaction::from_json(&json),
            Err(TransactionError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn anchor_count_must_be_one() {
        let mut json = signed_anchor().to_json();
        json["anchors"] = json!([base58_encode(b"a"), base58_encode(b"b")]);
        assert!(matches!(AnyTransaction::from_json(&json), Err(TransactionError::Malformed(_))));

        json["anchors"] = json!([]);
        assert!(matches!(AnyTransaction::from_json(&json), Err(TransactionError::Malformed(_))));
    }

    #[test]
    fn association_optional_fields() {
        let recipient = *account("recipient").address();
        let tx = Transaction::new(Association::new(recipient, 5, None, None).unwrap(), TxConfig::new())
            .unwrap()
            .sign_with(&account("sender"))
            .unwrap();
        let json = tx.to_json();
        assert!(json.get("hash").is_none());
        assert!(json.get("expires").is_none());
        assert_eq!(json["associationType"], 5);

        // A zero expiry and an empty hash both read back as absent.
        let mut json = json;
        json["expires"] = json!(0);
        json["hash"] = json!("");
        let parsed = AnyTransaction::from_json(&json).unwrap();
        assert_eq!(parsed.to_binary().unwrap(), tx.to_binary().unwrap());
    }

    #[test]
    fn set_script_uses_prefixed_base64() {
        let tx = Transaction::new(SetScript::new(b"script".to_vec()), TxConfig::new()).unwrap();
        assert_eq!(tx.to_json()["script"], "base64:c2NyaXB0");
    }

    #[test]
    fn sponsor_block_roundtrip() {
        let sponsor = account("sponsor");
        let tx = Transaction::new(Anchor::new(vec![9]), TxConfig::new())
            .unwrap()
            .sign_with(&account("sender"))
            .unwrap()
            .sponsor_with(&sponsor)
            .unwrap();
        let json = tx.to_json();
        assert_eq!(json["sponsor"], sponsor.address().to_string());
        assert_eq!(json["sponsorKeyType"], "ed25519");

        match AnyTransaction::from_json(&json).unwrap() {
            AnyTransaction::FullySigned(parsed) => assert_eq!(parsed, tx),
            other => panic!("expected FullySigned, got {:?}", other),
        }
    }

    #[test]
    fn not_an_object() {
        assert!(matches!(AnyTransaction::from_json(&json!([1])), Err(TransactionError::Malformed(_))));
        assert!(matches!(AnyTransaction::from_json_str("{"), Err(TransactionError::Json(_))));
    }
}
