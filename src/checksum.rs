//! Checksum utilities for stored documents and backups

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::document::Document;
use crate::error::{EngineError, Result};

/// SHA256 checksum, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Checksum of a document's canonical JSON.
    ///
    /// Object keys serialize sorted, so equal documents hash equally
    /// regardless of the order their keys were inserted in.
    pub fn of_document(document: &Document) -> Result<Self> {
        let canonical = serde_json::to_vec(document)?;
        Ok(Self::from_bytes(&canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        Self::from_bytes(data) == *self
    }

    /// Fail with `ChecksumMismatch` unless `data` hashes to this checksum
    pub fn verify(&self, data: &[u8]) -> Result<()> {
        let actual = Self::from_bytes(data);
        if actual == *self {
            Ok(())
        } else {
            Err(EngineError::ChecksumMismatch {
                expected: self.0.clone(),
                actual: actual.0,
            })
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_checksum_consistency() {
        let a = Checksum::from_bytes(br#"{"tenant_id":"acme"}"#);
        let b = Checksum::from_bytes(br#"{"tenant_id":"acme"}"#);
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn test_document_checksum_ignores_insertion_order() {
        let mut first = Document::new();
        first.insert("version".into(), json!("1.0"));
        first.insert("tenant_id".into(), json!("acme"));
        let mut second = Document::new();
        second.insert("tenant_id".into(), json!("acme"));
        second.insert("version".into(), json!("1.0"));

        assert_eq!(Checksum::of_document(&first).unwrap(), Checksum::of_document(&second).unwrap());
    }

    #[test]
    fn test_checksum_verification() {
        let checksum = Checksum::from_bytes(b"content");
        assert!(checksum.verify(b"content").is_ok());
        assert!(checksum.matches(b"content"));
        assert!(matches!(
            checksum.verify(b"other"),
            Err(EngineError::ChecksumMismatch { .. })
        ));
    }
}
