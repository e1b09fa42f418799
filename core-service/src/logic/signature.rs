//! Transaction Signature
//!
//! Content digest standing in for a signature: SHA-256 over the canonical
//! JSON form of the payload, rendered as lowercase hex.
//!
//! This proves payload identity, not who sent it. There is no key material.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Hex length of a SHA-256 digest
pub const SIGNATURE_HEX_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Transaction fields captured at submission.
///
/// Field order is the canonical order of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub sender: String,
    pub receiver: String,
    /// Decimal text exactly as entered
    pub amount: String,
    /// Milliseconds since epoch
    pub timestamp: i64,
}

impl TransactionPayload {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount: amount.into(),
            timestamp,
        }
    }

    /// Compact JSON, keys in declaration order
    pub fn canonical(&self) -> Result<String, SignatureError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Produces the signature attached to a verification run
pub trait PayloadSigner: Send + Sync {
    fn sign(&self, payload: &TransactionPayload) -> Result<String, SignatureError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Signer;

impl PayloadSigner for Sha256Signer {
    fn sign(&self, payload: &TransactionPayload) -> Result<String, SignatureError> {
        generate(payload)
    }
}

pub fn generate(payload: &TransactionPayload) -> Result<String, SignatureError> {
    let message = payload.canonical()?;
    let digest = Sha256::digest(message.as_bytes());
    Ok(hex::encode(digest))
}

/// 64 lowercase hex characters
pub fn is_well_formed(signature: &str) -> bool {
    signature.len() == SIGNATURE_HEX_LEN
        && signature.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(timestamp: i64) -> TransactionPayload {
        TransactionPayload::new("alice", "bob", "0.5", timestamp)
    }

    #[test]
    fn test_canonical_field_order() {
        assert_eq!(
            payload(1_700_000_000_000).canonical().unwrap(),
            r#"{"sender":"alice","receiver":"bob","amount":"0.5","timestamp":1700000000000}"#
        );
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            generate(&payload(1_700_000_000_000)).unwrap(),
            "c4ccca6d679f1a243235c381e611f7fdf980e768a5b254cdb34f392471eb2400"
        );
    }

    #[test]
    fn test_identical_payloads_identical_digest() {
        let a = generate(&payload(42)).unwrap();
        let b = Sha256Signer.sign(&payload(42)).unwrap();
        assert_eq!(a, b);
        assert!(is_well_formed(&a));
    }

    #[test]
    fn test_timestamp_changes_digest() {
        let a = generate(&payload(1_700_000_000_000)).unwrap();
        let b = generate(&payload(1_700_000_000_001)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fields_are_opaque_text() {
        let odd = TransactionPayload::new("Zoë \"Q\"", "", "not-a-number", 0);
        let signature = generate(&odd).unwrap();
        assert!(is_well_formed(&signature));
    }

    #[test]
    fn test_well_formed_check() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed(&"A".repeat(64)));
        assert!(!is_well_formed(&"a".repeat(63)));
        assert!(is_well_formed(&"0f".repeat(32)));
    }
}
