//! User aggregate
//!
//! A user holds at most one active role per shared ledger. Assignments are
//! last-write-wins; the record is created on first assignment and deleted
//! by an explicit reset, which clears every role.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use types::ids::{SharedLedgerId, UserId};
use types::role::{JurisdictionType, RoleType};

/// One (role, jurisdiction) assignment within a shared ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub role: RoleType,
    pub jurisdiction: JurisdictionType,
}

/// A user and their per-ledger role assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// SharedLedger id -> active assignment. BTreeMap keeps the stored
    /// document deterministic.
    pub roles: BTreeMap<SharedLedgerId, RoleAssignment>,
}

impl User {
    /// Create a user with their first role assignment.
    pub fn new(id: UserId, ledger: SharedLedgerId, assignment: RoleAssignment) -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(ledger, assignment);
        Self { id, roles }
    }

    /// Assign or replace the role for one ledger (last-write-wins).
    pub fn assign_role(&mut self, ledger: SharedLedgerId, assignment: RoleAssignment) {
        self.roles.insert(ledger, assignment);
    }

    /// Active role for a ledger; `RoleType::None` when unassigned.
    pub fn role_for(&self, ledger: &SharedLedgerId) -> RoleType {
        self.roles.get(ledger).map_or(RoleType::None, |a| a.role)
    }

    /// Jurisdiction for a ledger; `JurisdictionType::None` when unassigned.
    pub fn jurisdiction_for(&self, ledger: &SharedLedgerId) -> JurisdictionType {
        self.roles
            .get(ledger)
            .map_or(JurisdictionType::None, |a| a.jurisdiction)
    }

    pub fn is_admin(&self, ledger: &SharedLedgerId) -> bool {
        self.role_for(ledger) == RoleType::Admin
    }

    /// Clear every assignment (explicit reset).
    pub fn clear_roles(&mut self) {
        self.roles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slid(s: &str) -> SharedLedgerId {
        SharedLedgerId::new(s)
    }

    #[test]
    fn test_first_assignment_creates_role() {
        let user = User::new(
            UserId::new("0xalice"),
            slid("SL1"),
            RoleAssignment {
                role: RoleType::Custodian,
                jurisdiction: JurisdictionType::Europe,
            },
        );
        assert_eq!(user.role_for(&slid("SL1")), RoleType::Custodian);
        assert_eq!(user.jurisdiction_for(&slid("SL1")), JurisdictionType::Europe);
    }

    #[test]
    fn test_unassigned_ledger_defaults_to_none() {
        let user = User::new(
            UserId::new("0xalice"),
            slid("SL1"),
            RoleAssignment {
                role: RoleType::Trader,
                jurisdiction: JurisdictionType::Global,
            },
        );
        assert_eq!(user.role_for(&slid("SL2")), RoleType::None);
        assert_eq!(user.jurisdiction_for(&slid("SL2")), JurisdictionType::None);
        assert!(!user.is_admin(&slid("SL2")));
    }

    #[test]
    fn test_reassignment_last_write_wins() {
        let mut user = User::new(
            UserId::new("0xalice"),
            slid("SL1"),
            RoleAssignment {
                role: RoleType::Trader,
                jurisdiction: JurisdictionType::Global,
            },
        );
        user.assign_role(
            slid("SL1"),
            RoleAssignment {
                role: RoleType::Regulator,
                jurisdiction: JurisdictionType::NorthAmerica,
            },
        );
        // One active role per ledger
        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.role_for(&slid("SL1")), RoleType::Regulator);
    }

    #[test]
    fn test_roles_independent_across_ledgers() {
        let mut user = User::new(
            UserId::new("0xalice"),
            slid("SL1"),
            RoleAssignment {
                role: RoleType::Admin,
                jurisdiction: JurisdictionType::Global,
            },
        );
        user.assign_role(
            slid("SL2"),
            RoleAssignment {
                role: RoleType::AmlSanction,
                jurisdiction: JurisdictionType::Africa,
            },
        );
        assert!(user.is_admin(&slid("SL1")));
        assert!(!user.is_admin(&slid("SL2")));
        assert_eq!(user.role_for(&slid("SL2")), RoleType::AmlSanction);
    }

    #[test]
    fn test_clear_roles() {
        let mut user = User::new(
            UserId::new("0xalice"),
            slid("SL1"),
            RoleAssignment {
                role: RoleType::Broker,
                jurisdiction: JurisdictionType::Oceania,
            },
        );
        user.clear_roles();
        assert!(user.roles.is_empty());
        assert_eq!(user.role_for(&slid("SL1")), RoleType::None);
    }

    #[test]
    fn test_user_serde_round_trip() {
        let user = User::new(
            UserId::new("0xalice"),
            slid("SL1"),
            RoleAssignment {
                role: RoleType::ClearingHouse,
                jurisdiction: JurisdictionType::AsiaPacific,
            },
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"clearingHouse\""));
        let restored: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user, restored);
    }
}
