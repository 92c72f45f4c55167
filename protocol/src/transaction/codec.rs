//! Binary encoding of transactions.
//!
//! The bytes produced here are what gets signed and what the transaction id
//! is hashed from, so they must match the node byte for byte. Each
//! `(kind, version)` pair has its own pure layout function; nothing is
//! inferred from which fields happen to be set.
//!
//! All integers are big-endian. Variable-length fields carry a `u16` length
//! prefix.

use super::error::TransactionError;
use super::kinds::{
    Anchor, Association, CancelLease, MassTransfer, RevokeAssociation, SetScript, TransactionBody,
    Transfer,
};
use super::types::Version;
use crate::crypto::keys::{KeyType, PublicKey};
use crate::identity::address::Address;

/// The envelope fields every layout needs, resolved before encoding.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Envelope<'a> {
    pub chain_id: u8,
    pub timestamp: u64,
    pub sender: &'a PublicKey,
    pub fee: u64,
}

// ---------------------------------------------------------------------------
// BinaryWriter
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct BinaryWriter {
    buf: Vec<u8>,
}

impl BinaryWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    fn u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    fn u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn i32(&mut self, value: i32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    fn address(&mut self, address: &Address) -> &mut Self {
        self.raw(address.as_bytes())
    }

    /// `u16` length followed by the bytes.
    fn sized(&mut self, field: &'static str, bytes: &[u8]) -> Result<&mut Self, TransactionError> {
        let len = u16::try_from(bytes.len())
            .map_err(|_| TransactionError::FieldTooLong { field, len: bytes.len() })?;
        Ok(self.u16(len).raw(bytes))
    }

    fn count(&mut self, field: &'static str, count: usize) -> Result<&mut Self, TransactionError> {
        let count = u16::try_from(count).map_err(|_| TransactionError::FieldTooLong { field, len: count })?;
        Ok(self.u16(count))
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Encode `body` with `version`, or fail with `UnsupportedVersion`.
pub(crate) fn encode(
    body: &TransactionBody,
    version: Version,
    envelope: &Envelope<'_>,
) -> Result<Vec<u8>, TransactionError> {
    let kind = body.kind();
    kind.check_version(version)?;
    body.check_layout(version)?;

    if version == Version::V3 {
        return encode_v3(body, envelope);
    }

    if envelope.sender.key_type() != KeyType::Ed25519 {
        return Err(TransactionError::UnsupportedKeyType {
            kind,
            version,
            key_type: envelope.sender.key_type(),
        });
    }

    let mut w = BinaryWriter::with_capacity(256);
    w.u8(kind.type_id()).u8(version.as_u8());

    match body {
        TransactionBody::Transfer(t) => legacy_transfer(&mut w, t, envelope)?,
        TransactionBody::Lease(l) => {
            w.u8(0)
                .raw(envelope.sender.as_bytes())
                .address(&l.recipient)
                .u64(l.amount)
                .u64(envelope.fee)
                .u64(envelope.timestamp);
        }
        TransactionBody::CancelLease(c) => {
            w.u8(envelope.chain_id)
                .raw(envelope.sender.as_bytes())
                .u64(envelope.fee)
                .u64(envelope.timestamp)
                .raw(&c.lease_id);
        }
        TransactionBody::MassTransfer(m) => legacy_mass_transfer(&mut w, m, envelope)?,
        TransactionBody::SetScript(s) => {
            w.u8(envelope.chain_id).raw(envelope.sender.as_bytes()).u8(1);
            w.sized("script", &s.script)?
                .u64(envelope.fee)
                .u64(envelope.timestamp);
        }
        TransactionBody::Anchor(a) => {
            w.raw(envelope.sender.as_bytes()).u16(1);
            w.sized("anchor", &a.anchor)?
                .u64(envelope.timestamp)
                .u64(envelope.fee);
        }
        TransactionBody::Association(a) => {
            legacy_association(&mut w, &a.recipient, a.association_type, a.hash.as_deref(), envelope)?
        }
        TransactionBody::RevokeAssociation(r) => {
            legacy_association(&mut w, &r.recipient, r.association_type, r.hash.as_deref(), envelope)?
        }
        TransactionBody::Sponsorship(s) => legacy_sponsorship(&mut w, &s.recipient, envelope),
        TransactionBody::CancelSponsorship(s) => legacy_sponsorship(&mut w, &s.recipient, envelope),
    }

    Ok(w.finish())
}

// ---------------------------------------------------------------------------
// v3
// ---------------------------------------------------------------------------

fn encode_v3(body: &TransactionBody, envelope: &Envelope<'_>) -> Result<Vec<u8>, TransactionError> {
    let kind = body.kind();
    let mut w = BinaryWriter::with_capacity(256);
    w.u8(kind.type_id())
        .u8(Version::V3.as_u8())
        .u8(envelope.chain_id)
        .u64(envelope.timestamp)
        .u8(envelope.sender.key_type().marker())
        .raw(envelope.sender.as_bytes())
        .u64(envelope.fee);

    match body {
        TransactionBody::Transfer(Transfer {
            recipient,
            amount,
            attachment,
        }) => {
            w.address(recipient).u64(*amount);
            w.sized("attachment", attachment)?;
        }
        TransactionBody::Lease(l) => {
            w.address(&l.recipient).u64(l.amount);
        }
        TransactionBody::CancelLease(CancelLease { lease_id }) => {
            w.raw(lease_id);
        }
        TransactionBody::MassTransfer(m) => {
            write_transfers(&mut w, m)?;
            w.sized("attachment", &m.attachment)?;
        }
        TransactionBody::SetScript(SetScript { script }) => {
            w.sized("script", script)?;
        }
        TransactionBody::Anchor(Anchor { anchor }) => {
            w.u16(1);
            w.sized("anchor", anchor)?;
        }
        TransactionBody::Association(Association {
            recipient,
            association_type,
            hash,
            expires,
        }) => {
            w.address(recipient)
                .i32(*association_type)
                .u64(expires.unwrap_or(0));
            w.sized("hash", hash.as_deref().unwrap_or_default())?;
        }
        TransactionBody::RevokeAssociation(RevokeAssociation {
            recipient,
            association_type,
            hash,
        }) => {
            w.address(recipient).i32(*association_type);
            w.sized("hash", hash.as_deref().unwrap_or_default())?;
        }
        TransactionBody::Sponsorship(s) => {
            w.address(&s.recipient);
        }
        TransactionBody::CancelSponsorship(s) => {
            w.address(&s.recipient);
        }
    }

    Ok(w.finish())
}

// ---------------------------------------------------------------------------
// Legacy layouts
// ---------------------------------------------------------------------------

fn write_transfers(w: &mut BinaryWriter, mass: &MassTransfer) -> Result<(), TransactionError> {
    w.count("transfers", mass.transfers.len())?;
    for entry in &mass.transfers {
        w.address(&entry.recipient).u64(entry.amount);
    }
    Ok(())
}

fn legacy_transfer(w: &mut BinaryWriter, t: &Transfer, envelope: &Envelope<'_>) -> Result<(), TransactionError> {
    w.raw(envelope.sender.as_bytes())
        .u64(envelope.timestamp)
        .u64(t.amount)
        .u64(envelope.fee)
        .address(&t.recipient);
    w.sized("attachment", &t.attachment)?;
    Ok(())
}

fn legacy_mass_transfer(
    w: &mut BinaryWriter,
    m: &MassTransfer,
    envelope: &Envelope<'_>,
) -> Result<(), TransactionError> {
    w.raw(envelope.sender.as_bytes());
    write_transfers(w, m)?;
    w.u64(envelope.timestamp).u64(envelope.fee);
    w.sized("attachment", &m.attachment)?;
    Ok(())
}

/// Association and RevokeAssociation share their v1 layout. The hash is
/// always present on the wire, with a zero length when absent.
fn legacy_association(
    w: &mut BinaryWriter,
    recipient: &Address,
    association_type: i32,
    hash: Option<&[u8]>,
    envelope: &Envelope<'_>,
) -> Result<(), TransactionError> {
    w.u8(envelope.chain_id)
        .raw(envelope.sender.as_bytes())
        .address(recipient)
        .i32(association_type)
        .u8(1);
    w.sized("hash", hash.unwrap_or_default())?
        .u64(envelope.timestamp)
        .u64(envelope.fee);
    Ok(())
}

fn legacy_sponsorship(w: &mut BinaryWriter, recipient: &Address, envelope: &Envelope<'_>) {
    w.u8(envelope.chain_id)
        .raw(envelope.sender.as_bytes())
        .address(recipient)
        .u64(envelope.timestamp)
        .u64(envelope.fee);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;
    use crate::transaction::kinds::{CancelSponsorship, Lease, Sponsorship, TransferEntry};
    use crate::transaction::types::TransactionType;

    const TIMESTAMP: [u8; 8] = 1_600_000_000_000u64.to_be_bytes();
    const FEE: [u8; 8] = 100_000_000u64.to_be_bytes();

    /// type, version, chain id, timestamp, key type, public key, fee
    fn v3_header_len(key_type: KeyType) -> usize {
        1 + 1 + 1 + 8 + 1 + key_type.public_key_length() + 8
    }

    fn key(key_type: KeyType) -> PublicKey {
        KeyPair::from_seed(key_type, &[9u8; 32]).public_key()
    }

    fn recipient() -> Address {
        Address::from_public_key(&key(KeyType::Ed25519), 'T').unwrap()
    }

    fn envelope(sender: &PublicKey) -> Envelope<'_> {
        Envelope {
            chain_id: b'T',
            timestamp: 1_600_000_000_000,
            sender,
            fee: 100_000_000,
        }
    }

    #[test]
    fn v3_header_layout() {
        let sender = key(KeyType::Secp256k1);
        let body = TransactionBody::from(Sponsorship::new(recipient()));
        let bytes = encode(&body, Version::V3, &envelope(&sender)).unwrap();

        assert_eq!(bytes[0], 18);
        assert_eq!(bytes[1], 3);
        assert_eq!(bytes[2], b'T');
        assert_eq!(&bytes[3..11], &1_600_000_000_000u64.to_be_bytes());
        assert_eq!(bytes[11], 2);
        assert_eq!(&bytes[12..76], sender.as_bytes());
        assert_eq!(&bytes[76..84], &100_000_000u64.to_be_bytes());
        assert_eq!(&bytes[84..], recipient().as_bytes());
        assert_eq!(v3_header_len(KeyType::Secp256k1), 84);
    }

    #[test]
    fn lease_v2_layout() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Lease::new(recipient(), 42).unwrap());
        let bytes = encode(&body, Version::V2, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..3], &[8, 2, 0]);
        assert_eq!(&bytes[3..35], sender.as_bytes());
        assert_eq!(&bytes[35..61], recipient().as_bytes());
        assert_eq!(&bytes[61..69], &42u64.to_be_bytes());
        assert_eq!(&bytes[69..77], &FEE);
        assert_eq!(&bytes[77..], &TIMESTAMP);
    }

    #[test]
    fn transfer_v2_layout() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Transfer::new(recipient(), 42, b"memo".to_vec()).unwrap());
        let bytes = encode(&body, Version::V2, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..2], &[4, 2]);
        assert_eq!(&bytes[2..34], sender.as_bytes());
        assert_eq!(&bytes[34..42], &TIMESTAMP);
        assert_eq!(&bytes[42..50], &42u64.to_be_bytes());
        assert_eq!(&bytes[50..58], &FEE);
        assert_eq!(&bytes[58..84], recipient().as_bytes());
        assert_eq!(&bytes[84..], &[0, 4, b'm', b'e', b'm', b'o']);
    }

    #[test]
    fn cancel_lease_v2_layout() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(CancelLease::from_bytes([7u8; 32]));
        let bytes = encode(&body, Version::V2, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..3], &[9, 2, b'T']);
        assert_eq!(&bytes[3..35], sender.as_bytes());
        assert_eq!(&bytes[35..43], &FEE);
        assert_eq!(&bytes[43..51], &TIMESTAMP);
        assert_eq!(&bytes[51..], &[7u8; 32]);
    }

    #[test]
    fn set_script_v1_layout() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(SetScript::new(vec![0xAA, 0xBB, 0xCC]));
        let bytes = encode(&body, Version::V1, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..3], &[13, 1, b'T']);
        assert_eq!(&bytes[3..35], sender.as_bytes());
        // script present flag, then the length-prefixed script
        assert_eq!(&bytes[35..41], &[1, 0, 3, 0xAA, 0xBB, 0xCC]);
        assert_eq!(&bytes[41..49], &FEE);
        assert_eq!(&bytes[49..], &TIMESTAMP);
    }

    #[test]
    fn anchor_v1_layout() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Anchor::new(vec![0xDE, 0xAD]));
        let bytes = encode(&body, Version::V1, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..2], &[15, 1]);
        assert_eq!(&bytes[2..34], sender.as_bytes());
        // anchor count, then the length-prefixed anchor
        assert_eq!(&bytes[34..40], &[0, 1, 0, 2, 0xDE, 0xAD]);
        assert_eq!(&bytes[40..48], &TIMESTAMP);
        assert_eq!(&bytes[48..], &FEE);
    }

    #[test]
    fn association_v1_layout_with_hash() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Association::new(recipient(), 0x0100, Some(vec![0x01, 0x02]), None).unwrap());
        let bytes = encode(&body, Version::V1, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..3], &[16, 1, b'T']);
        assert_eq!(&bytes[3..35], sender.as_bytes());
        assert_eq!(&bytes[35..61], recipient().as_bytes());
        assert_eq!(&bytes[61..65], &0x0100i32.to_be_bytes());
        assert_eq!(&bytes[65..70], &[1, 0, 2, 0x01, 0x02]);
        assert_eq!(&bytes[70..78], &TIMESTAMP);
        assert_eq!(&bytes[78..], &FEE);
    }

    #[test]
    fn sponsorship_v1_layouts() {
        let sender = key(KeyType::Ed25519);
        let bodies = [
            (18, TransactionBody::from(Sponsorship::new(recipient()))),
            (19, TransactionBody::from(CancelSponsorship::new(recipient()))),
        ];
        for (type_id, body) in bodies {
            let bytes = encode(&body, Version::V1, &envelope(&sender)).unwrap();

            assert_eq!(&bytes[..3], &[type_id, 1, b'T']);
            assert_eq!(&bytes[3..35], sender.as_bytes());
            assert_eq!(&bytes[35..61], recipient().as_bytes());
            assert_eq!(&bytes[61..69], &TIMESTAMP);
            assert_eq!(&bytes[69..], &FEE);
        }
    }

    #[test]
    fn legacy_association_rejects_expiry() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Association::unchecked(recipient(), 1, None, Some(5)));
        match encode(&body, Version::V1, &envelope(&sender)) {
            Err(TransactionError::ExpiryNotSupported { version: Version::V1, .. }) => {}
            other => panic!("expected ExpiryNotSupported, got {:?}", other),
        }
    }

    #[test]
    fn legacy_association_without_hash_keeps_flag() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(RevokeAssociation::new(recipient(), 7, None));
        let bytes = encode(&body, Version::V1, &envelope(&sender)).unwrap();

        // type, version, chain, pk, recipient, assoc type
        let offset = 1 + 1 + 1 + 32 + 26 + 4;
        assert_eq!(&bytes[offset - 4..offset], &7i32.to_be_bytes());
        assert_eq!(&bytes[offset..offset + 3], &[1, 0, 0]);
        assert_eq!(bytes.len(), offset + 3 + 16);
    }

    #[test]
    fn association_v3_writes_zero_expiry() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Association::new(recipient(), 1, Some(vec![0xAB]), None).unwrap());
        let bytes = encode(&body, Version::V3, &envelope(&sender)).unwrap();

        let tail = &bytes[v3_header_len(KeyType::Ed25519)..];
        assert_eq!(&tail[..26], recipient().as_bytes());
        assert_eq!(&tail[26..30], &1i32.to_be_bytes());
        assert_eq!(&tail[30..38], &[0u8; 8]);
        assert_eq!(&tail[38..], &[0, 1, 0xAB]);
    }

    #[test]
    fn mass_transfer_v1_layout() {
        let sender = key(KeyType::Ed25519);
        let mass = MassTransfer::new(vec![TransferEntry::new(recipient(), 5)], b"hi".to_vec()).unwrap();
        let bytes = encode(&mass.into(), Version::V1, &envelope(&sender)).unwrap();

        assert_eq!(&bytes[..2], &[11, 1]);
        assert_eq!(&bytes[34..36], &[0, 1]);
        assert_eq!(&bytes[36..62], recipient().as_bytes());
        assert_eq!(&bytes[62..70], &5u64.to_be_bytes());
        assert_eq!(&bytes[bytes.len() - 4..], &[0, 2, b'h', b'i']);
    }

    #[test]
    fn legacy_layout_rejects_ecdsa_sender() {
        let sender = key(KeyType::Secp256r1);
        let body = TransactionBody::from(Anchor::new(vec![1]));
        match encode(&body, Version::V1, &envelope(&sender)) {
            Err(TransactionError::UnsupportedKeyType {
                kind: TransactionType::Anchor,
                version: Version::V1,
                key_type: KeyType::Secp256r1,
            }) => {}
            other => panic!("expected UnsupportedKeyType, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_version_rejected() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Anchor::new(vec![1]));
        assert!(matches!(
            encode(&body, Version::V2, &envelope(&sender)),
            Err(TransactionError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn oversized_field_rejected() {
        let sender = key(KeyType::Ed25519);
        let body = TransactionBody::from(Anchor::new(vec![0u8; 70_000]));
        match encode(&body, Version::V3, &envelope(&sender)) {
            Err(TransactionError::FieldTooLong { field: "anchor", len: 70_000 }) => {}
            other => panic!("expected FieldTooLong, got {:?}", other),
        }
    }
}
