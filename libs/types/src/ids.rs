//! Unique identifier types for ledger entities
//!
//! `SharedLedgerId` and `UserId` are opaque strings supplied by the caller
//! (user identifiers are address-like values minted by the hosting platform).
//! `Uti` is the Unique Trade Identifier, either caller-supplied or generated
//! at trade submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a shared ledger partition.
///
/// Either caller-supplied or randomly generated at creation. Uses UUID v7
/// for generated values so partitions sort by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedLedgerId(String);

impl SharedLedgerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random ledger identifier.
    pub fn random() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharedLedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SharedLedgerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Unique Trade Identifier.
///
/// Format for generated values: `SWIFT<rand>.TRADE<YYYYMMDD>SEQ<rand>`.
/// Callers may also supply an externally generated UTI at submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uti(String);

impl Uti {
    pub fn new(uti: impl Into<String>) -> Self {
        Self(uti.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes hashed when binding a capability token to this trade.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Uti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Uti {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a user (address-like opaque string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_ledger_id_random_unique() {
        let id1 = SharedLedgerId::random();
        let id2 = SharedLedgerId::random();
        assert_ne!(id1, id2, "random ledger ids should be unique");
    }

    #[test]
    fn test_uti_serialization_transparent() {
        let uti = Uti::new("SWIFTabcd.TRADE20230905SEQ1234");
        let json = serde_json::to_string(&uti).unwrap();
        assert_eq!(json, "\"SWIFTabcd.TRADE20230905SEQ1234\"");

        let restored: Uti = serde_json::from_str(&json).unwrap();
        assert_eq!(uti, restored);
    }

    #[test]
    fn test_user_id_display() {
        let user = UserId::new("0xabc123");
        assert_eq!(user.to_string(), "0xabc123");
        assert_eq!(user.as_str(), "0xabc123");
    }
}
