//! Role and jurisdiction enumerations
//!
//! Both are closed sets with an explicit, total parse function that maps
//! unrecognized input to the `None` variant rather than failing. Wire
//! strings are camelCase, matching the stored document format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user within one shared ledger.
///
/// - Trader/Investor hold the tokenized assets and initiate trades.
/// - Broker/Dealer facilitate the trade and manage execution.
/// - Custodian safeguards the assets and confirms ownership transfers.
/// - ClearingHouse confirms, matches, and nets the money transfer.
/// - SettlementAgent manages final settlement of the trade details.
/// - AmlSanction screens counterparties for risk and sanctions.
/// - Regulator monitors trades for compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleType {
    None,
    Admin,
    Trader,
    Investor,
    Broker,
    Dealer,
    Custodian,
    ClearingHouse,
    SettlementAgent,
    Regulator,
    AmlSanction,
}

impl RoleType {
    /// Total parse: unrecognized input yields `RoleType::None`.
    pub fn parse(input: &str) -> Self {
        match input {
            "admin" => Self::Admin,
            "trader" => Self::Trader,
            "investor" => Self::Investor,
            "broker" => Self::Broker,
            "dealer" => Self::Dealer,
            "custodian" => Self::Custodian,
            "clearingHouse" => Self::ClearingHouse,
            "settlementAgent" => Self::SettlementAgent,
            "regulator" => Self::Regulator,
            "amlSanction" => Self::AmlSanction,
            _ => Self::None,
        }
    }

    /// Canonical wire string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Admin => "admin",
            Self::Trader => "trader",
            Self::Investor => "investor",
            Self::Broker => "broker",
            Self::Dealer => "dealer",
            Self::Custodian => "custodian",
            Self::ClearingHouse => "clearingHouse",
            Self::SettlementAgent => "settlementAgent",
            Self::Regulator => "regulator",
            Self::AmlSanction => "amlSanction",
        }
    }

    /// Roles that originate trades (and see only their own in listings).
    pub fn is_originator(&self) -> bool {
        matches!(
            self,
            Self::Trader | Self::Investor | Self::Broker | Self::Dealer
        )
    }

    /// Roles allowed to record reconciliation matches.
    pub fn is_reconciler(&self) -> bool {
        matches!(
            self,
            Self::SettlementAgent | Self::ClearingHouse | Self::Custodian | Self::AmlSanction
        )
    }
}

impl fmt::Display for RoleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Jurisdiction a role or trade is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JurisdictionType {
    None,
    Global,
    NorthAmerica,
    SouthAmerica,
    Europe,
    MiddleEast,
    Africa,
    CentralAsia,
    AsiaPacific,
    Oceania,
}

impl JurisdictionType {
    /// Total parse: unrecognized input yields `JurisdictionType::None`.
    pub fn parse(input: &str) -> Self {
        match input {
            "global" => Self::Global,
            "northAmerica" => Self::NorthAmerica,
            "southAmerica" => Self::SouthAmerica,
            "europe" => Self::Europe,
            "middleEast" => Self::MiddleEast,
            "africa" => Self::Africa,
            "centralAsia" => Self::CentralAsia,
            "asiaPacific" => Self::AsiaPacific,
            "oceania" => Self::Oceania,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Global => "global",
            Self::NorthAmerica => "northAmerica",
            Self::SouthAmerica => "southAmerica",
            Self::Europe => "europe",
            Self::MiddleEast => "middleEast",
            Self::Africa => "africa",
            Self::CentralAsia => "centralAsia",
            Self::AsiaPacific => "asiaPacific",
            Self::Oceania => "oceania",
        }
    }
}

impl fmt::Display for JurisdictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_role_parse_known() {
        assert_eq!(RoleType::parse("clearingHouse"), RoleType::ClearingHouse);
        assert_eq!(RoleType::parse("settlementAgent"), RoleType::SettlementAgent);
        assert_eq!(RoleType::parse("amlSanction"), RoleType::AmlSanction);
        assert_eq!(RoleType::parse("admin"), RoleType::Admin);
    }

    #[test]
    fn test_role_parse_unknown_is_none() {
        assert_eq!(RoleType::parse("superuser"), RoleType::None);
        assert_eq!(RoleType::parse(""), RoleType::None);
        // Case matters on the wire
        assert_eq!(RoleType::parse("Admin"), RoleType::None);
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in [
            RoleType::Admin,
            RoleType::Trader,
            RoleType::Investor,
            RoleType::Broker,
            RoleType::Dealer,
            RoleType::Custodian,
            RoleType::ClearingHouse,
            RoleType::SettlementAgent,
            RoleType::Regulator,
            RoleType::AmlSanction,
        ] {
            assert_eq!(RoleType::parse(role.as_str()), role);
        }
    }

    #[test]
    fn test_role_groupings() {
        assert!(RoleType::Trader.is_originator());
        assert!(RoleType::Dealer.is_originator());
        assert!(!RoleType::Custodian.is_originator());

        assert!(RoleType::SettlementAgent.is_reconciler());
        assert!(RoleType::AmlSanction.is_reconciler());
        assert!(!RoleType::Regulator.is_reconciler());
        assert!(!RoleType::None.is_reconciler());
    }

    #[test]
    fn test_jurisdiction_parse() {
        assert_eq!(JurisdictionType::parse("global"), JurisdictionType::Global);
        assert_eq!(
            JurisdictionType::parse("asiaPacific"),
            JurisdictionType::AsiaPacific
        );
        assert_eq!(JurisdictionType::parse("mars"), JurisdictionType::None);
    }

    #[test]
    fn test_role_serde_camel_case() {
        let json = serde_json::to_string(&RoleType::ClearingHouse).unwrap();
        assert_eq!(json, "\"clearingHouse\"");
        let restored: RoleType = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, RoleType::ClearingHouse);
    }

    proptest! {
        // Parsing never panics and always lands inside the closed set.
        #[test]
        fn prop_role_parse_total(input in ".{0,32}") {
            let _ = RoleType::parse(&input);
            let _ = JurisdictionType::parse(&input);
        }
    }
}
