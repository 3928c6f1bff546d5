//! SharedLedger aggregate
//!
//! A named partition grouping users and trades under common membership and
//! lock state. The aggregate holds only identifiers: trade and user
//! records are independently addressable in the store and owned by the
//! partition that indexes them.

use serde::{Deserialize, Serialize};

use types::errors::LedgerError;
use types::ids::{SharedLedgerId, UserId, Uti};

/// One shared ledger partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLedger {
    pub id: SharedLedgerId,
    /// Member trades, insertion order kept, unique.
    pub trades: Vec<Uti>,
    /// Member users, insertion order kept, unique. The creator is
    /// auto-enrolled.
    pub users: Vec<UserId>,
    /// One-way lock; enforcement of the mutation block sits with the
    /// caller-facing layer.
    pub locked: bool,
}

impl SharedLedger {
    /// Create a partition, auto-enrolling its creator as a member.
    ///
    /// A random id is generated when the caller supplies none.
    pub fn new(id: Option<SharedLedgerId>, creator: UserId) -> Self {
        Self {
            id: id.unwrap_or_else(SharedLedgerId::random),
            trades: Vec::new(),
            users: vec![creator],
            locked: false,
        }
    }

    pub fn is_member(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }

    pub fn contains_trade(&self, uti: &Uti) -> bool {
        self.trades.contains(uti)
    }

    /// Index a trade. Duplicate UTIs are a conflict.
    pub fn add_trade(&mut self, uti: Uti) -> Result<(), LedgerError> {
        if self.contains_trade(&uti) {
            return Err(LedgerError::conflict(format!(
                "trade {uti} already exists in shared ledger {}",
                self.id
            )));
        }
        self.trades.push(uti);
        Ok(())
    }

    /// Drop a trade from the index. Returns false when it was not present.
    pub fn remove_trade(&mut self, uti: &Uti) -> bool {
        let before = self.trades.len();
        self.trades.retain(|t| t != uti);
        self.trades.len() != before
    }

    /// Add a member. Returns false (no-op) when already enrolled.
    pub fn add_member(&mut self, user: UserId) -> bool {
        if self.is_member(&user) {
            return false;
        }
        self.users.push(user);
        true
    }

    /// One-way lock.
    pub fn lock(&mut self) {
        self.locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> SharedLedger {
        SharedLedger::new(Some(SharedLedgerId::new("SL1")), UserId::new("0xcreator"))
    }

    #[test]
    fn test_creator_auto_enrolled() {
        let ledger = ledger();
        assert!(ledger.is_member(&UserId::new("0xcreator")));
        assert_eq!(ledger.users.len(), 1);
    }

    #[test]
    fn test_random_id_when_unspecified() {
        let a = SharedLedger::new(None, UserId::new("0xcreator"));
        let b = SharedLedger::new(None, UserId::new("0xcreator"));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_add_trade_rejects_duplicate() {
        let mut ledger = ledger();
        ledger.add_trade(Uti::new("T1")).unwrap();
        ledger.add_trade(Uti::new("T2")).unwrap();

        let err = ledger.add_trade(Uti::new("T1")).unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
        assert_eq!(ledger.trades.len(), 2);
    }

    #[test]
    fn test_trade_insertion_order_kept() {
        let mut ledger = ledger();
        for name in ["T3", "T1", "T2"] {
            ledger.add_trade(Uti::new(name)).unwrap();
        }
        let order: Vec<&str> = ledger.trades.iter().map(|t| t.as_str()).collect();
        assert_eq!(order, vec!["T3", "T1", "T2"]);
    }

    #[test]
    fn test_remove_trade() {
        let mut ledger = ledger();
        ledger.add_trade(Uti::new("T1")).unwrap();
        assert!(ledger.remove_trade(&Uti::new("T1")));
        assert!(!ledger.remove_trade(&Uti::new("T1")));
        assert!(ledger.trades.is_empty());
    }

    #[test]
    fn test_add_member_idempotent() {
        let mut ledger = ledger();
        assert!(ledger.add_member(UserId::new("0xalice")));
        assert!(!ledger.add_member(UserId::new("0xalice")));
        assert!(!ledger.add_member(UserId::new("0xcreator")));
        assert_eq!(ledger.users.len(), 2);
    }

    #[test]
    fn test_lock_is_one_way() {
        let mut ledger = ledger();
        assert!(!ledger.locked);
        ledger.lock();
        ledger.lock();
        assert!(ledger.locked);
    }
}
