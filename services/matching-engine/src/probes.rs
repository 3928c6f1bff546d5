//! Match probes: exact, boundary, and fuzzy comparisons
//!
//! Each function compares a submitted fact against the trade's immutable
//! creation data. Keys are the stored-document field names; an unknown key
//! never matches.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::trade::TradeInfo;

use crate::distance::levenshtein;

/// Field keys accepted by the match probes.
pub mod keys {
    pub const BUYER_NAME: &str = "buyerName";
    pub const BUYER_COUNTRY: &str = "buyerCountry";
    pub const SELLER_NAME: &str = "sellerName";
    pub const SELLER_COUNTRY: &str = "sellerCountry";
    pub const ASSET: &str = "asset";
    pub const QUANTITY: &str = "quantity";
    pub const PRICE: &str = "price";
    pub const TRADE_DATE: &str = "tradeDate";
    pub const UNDER_SANCTION: &str = "underSanction";
    pub const AML_RISK_RANK: &str = "amlRiskRank";
}

/// One match assertion submitted by a reconciling party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum MatchProbe {
    /// Byte-for-byte (or canonical numeric rendering) equality.
    #[serde(rename_all = "camelCase")]
    Exact { key: String, value: String },
    /// Strict `min < x < max` range check.
    #[serde(rename_all = "camelCase")]
    Boundary {
        key: String,
        min: Decimal,
        max: Decimal,
    },
    /// Edit-distance tolerance check.
    #[serde(rename_all = "camelCase")]
    Fuzzy {
        key: String,
        value: String,
        max_distance: u32,
    },
}

impl MatchProbe {
    /// The field key this probe targets.
    pub fn key(&self) -> &str {
        match self {
            MatchProbe::Exact { key, .. }
            | MatchProbe::Boundary { key, .. }
            | MatchProbe::Fuzzy { key, .. } => key,
        }
    }

    /// The value recorded in the match log when this probe succeeds.
    pub fn recorded_value(&self) -> String {
        match self {
            MatchProbe::Exact { value, .. } | MatchProbe::Fuzzy { value, .. } => value.clone(),
            MatchProbe::Boundary { min, max, .. } => format!("{min}< x <{max}"),
        }
    }

    /// Evaluate this probe against a trade's creation facts.
    pub fn matches(&self, info: &TradeInfo) -> bool {
        match self {
            MatchProbe::Exact { key, value } => exact_match(info, key, value),
            MatchProbe::Boundary { key, min, max } => boundary_match(info, key, *min, *max),
            MatchProbe::Fuzzy {
                key,
                value,
                max_distance,
            } => levenshtein_match(info, key, value).is_some_and(|d| d <= *max_distance),
        }
    }
}

/// Exact comparison of a submitted value against the trade's creation data.
///
/// String fields compare for equality; `quantity`, `price` and `tradeDate`
/// compare against their canonical numeric rendering. `underSanction` is an
/// assertion, not a comparison: it matches iff the submitter says "true".
pub fn exact_match(info: &TradeInfo, key: &str, value: &str) -> bool {
    match key {
        keys::BUYER_NAME => info.buyer_name == value,
        keys::BUYER_COUNTRY => info.buyer_country == value,
        keys::SELLER_NAME => info.seller_name == value,
        keys::SELLER_COUNTRY => info.seller_country == value,
        keys::ASSET => info.asset == value,
        keys::QUANTITY => info.quantity.to_string() == value,
        keys::PRICE => info.price.to_string() == value,
        keys::TRADE_DATE => info.trade_date.to_string() == value,
        keys::UNDER_SANCTION => value == "true",
        _ => false,
    }
}

/// Strict range comparison: true iff the trade's value lies strictly
/// between `min` and `max`.
///
/// `amlRiskRank` is the exception: it passes iff `max` is below the 0.05
/// risk ceiling, independent of any trade attribute.
pub fn boundary_match(info: &TradeInfo, key: &str, min: Decimal, max: Decimal) -> bool {
    match key {
        keys::QUANTITY => min < info.quantity && info.quantity < max,
        keys::PRICE => min < info.price && info.price < max,
        keys::TRADE_DATE => {
            let date = Decimal::from(info.trade_date);
            min < date && date < max
        }
        // Percentage of risk: the submitted ceiling must sit under 5%.
        keys::AML_RISK_RANK => max < Decimal::new(5, 2),
        _ => false,
    }
}

/// Edit distance between a submitted value and the trade's stored value.
///
/// Supported for the counterparty name/country fields and the asset;
/// `None` for any other key, which never satisfies a threshold.
pub fn levenshtein_match(info: &TradeInfo, key: &str, value: &str) -> Option<u32> {
    let stored = match key {
        keys::BUYER_NAME => &info.buyer_name,
        keys::BUYER_COUNTRY => &info.buyer_country,
        keys::SELLER_NAME => &info.seller_name,
        keys::SELLER_COUNTRY => &info.seller_country,
        keys::ASSET => &info.asset,
        _ => return None,
    };
    Some(levenshtein(stored, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::role::JurisdictionType;

    fn sample_info() -> TradeInfo {
        TradeInfo {
            buyer_name: "0xbuyer".to_string(),
            buyer_country: "France".to_string(),
            buyer_account_id: "ACC-B-1".to_string(),
            seller_name: "0xseller".to_string(),
            seller_country: "Germany".to_string(),
            seller_account_id: "ACC-S-1".to_string(),
            asset: "AAPL".to_string(),
            quantity: Decimal::from(100),
            price: Decimal::from(50),
            trade_date: 1_693_900_800_000,
            jurisdiction: JurisdictionType::Europe,
        }
    }

    #[test]
    fn test_exact_match_string_fields() {
        let info = sample_info();
        assert!(exact_match(&info, keys::BUYER_NAME, "0xbuyer"));
        assert!(exact_match(&info, keys::BUYER_COUNTRY, "France"));
        assert!(exact_match(&info, keys::SELLER_NAME, "0xseller"));
        assert!(exact_match(&info, keys::SELLER_COUNTRY, "Germany"));
        assert!(exact_match(&info, keys::ASSET, "AAPL"));

        assert!(!exact_match(&info, keys::BUYER_NAME, "0xBuyer"));
        assert!(!exact_match(&info, keys::ASSET, "MSFT"));
    }

    #[test]
    fn test_exact_match_numeric_fields() {
        let info = sample_info();
        assert!(exact_match(&info, keys::QUANTITY, "100"));
        assert!(exact_match(&info, keys::PRICE, "50"));
        assert!(exact_match(&info, keys::TRADE_DATE, "1693900800000"));

        // Canonical rendering: a different spelling of the same number
        // does not match.
        assert!(!exact_match(&info, keys::QUANTITY, "100.0"));
        assert!(!exact_match(&info, keys::PRICE, "49"));
    }

    #[test]
    fn test_exact_match_under_sanction_is_assertion() {
        let info = sample_info();
        assert!(exact_match(&info, keys::UNDER_SANCTION, "true"));
        assert!(!exact_match(&info, keys::UNDER_SANCTION, "false"));
        assert!(!exact_match(&info, keys::UNDER_SANCTION, "TRUE"));
    }

    #[test]
    fn test_exact_match_unknown_key_never_matches() {
        let info = sample_info();
        assert!(!exact_match(&info, "jurisdiction", "europe"));
        assert!(!exact_match(&info, "", ""));
    }

    #[test]
    fn test_boundary_match_strict_bounds() {
        let info = sample_info();
        assert!(boundary_match(
            &info,
            keys::QUANTITY,
            Decimal::from(99),
            Decimal::from(101)
        ));
        // Bounds are exclusive
        assert!(!boundary_match(
            &info,
            keys::QUANTITY,
            Decimal::from(100),
            Decimal::from(101)
        ));
        assert!(!boundary_match(
            &info,
            keys::QUANTITY,
            Decimal::from(99),
            Decimal::from(100)
        ));
        assert!(boundary_match(
            &info,
            keys::PRICE,
            Decimal::from(49),
            Decimal::from(51)
        ));
    }

    #[test]
    fn test_boundary_match_trade_date() {
        let info = sample_info();
        assert!(boundary_match(
            &info,
            keys::TRADE_DATE,
            Decimal::from(1_693_900_799_999i64),
            Decimal::from(1_693_900_800_001i64)
        ));
        assert!(!boundary_match(
            &info,
            keys::TRADE_DATE,
            Decimal::from(1_693_900_800_000i64),
            Decimal::from(1_693_900_800_001i64)
        ));
    }

    #[test]
    fn test_boundary_match_aml_risk_rank_fixed_ceiling() {
        let info = sample_info();
        // Passes purely on the submitted ceiling, never on trade data.
        assert!(boundary_match(
            &info,
            keys::AML_RISK_RANK,
            Decimal::ZERO,
            Decimal::new(4, 2)
        ));
        assert!(!boundary_match(
            &info,
            keys::AML_RISK_RANK,
            Decimal::ZERO,
            Decimal::new(5, 2)
        ));
        assert!(!boundary_match(
            &info,
            keys::AML_RISK_RANK,
            Decimal::ZERO,
            Decimal::ONE
        ));
        // min is ignored entirely for this key
        assert!(boundary_match(
            &info,
            keys::AML_RISK_RANK,
            Decimal::from(1000),
            Decimal::new(1, 2)
        ));
    }

    #[test]
    fn test_boundary_match_unknown_key() {
        let info = sample_info();
        assert!(!boundary_match(
            &info,
            keys::BUYER_NAME,
            Decimal::ZERO,
            Decimal::from(1000)
        ));
    }

    #[test]
    fn test_levenshtein_match_supported_keys() {
        let info = sample_info();
        assert_eq!(levenshtein_match(&info, keys::BUYER_NAME, "0xbuyer"), Some(0));
        assert_eq!(levenshtein_match(&info, keys::BUYER_COUNTRY, "Frane"), Some(1));
        assert_eq!(levenshtein_match(&info, keys::ASSET, "AAPL"), Some(0));
    }

    #[test]
    fn test_levenshtein_match_unsupported_key_is_none() {
        let info = sample_info();
        assert_eq!(levenshtein_match(&info, keys::QUANTITY, "100"), None);
        assert_eq!(levenshtein_match(&info, "unknown", "x"), None);
    }

    #[test]
    fn test_probe_matches_dispatch() {
        let info = sample_info();

        let exact = MatchProbe::Exact {
            key: keys::SELLER_NAME.to_string(),
            value: "0xseller".to_string(),
        };
        assert!(exact.matches(&info));

        let boundary = MatchProbe::Boundary {
            key: keys::PRICE.to_string(),
            min: Decimal::from(40),
            max: Decimal::from(60),
        };
        assert!(boundary.matches(&info));

        let fuzzy = MatchProbe::Fuzzy {
            key: keys::BUYER_COUNTRY.to_string(),
            value: "Frnce".to_string(),
            max_distance: 1,
        };
        assert!(fuzzy.matches(&info));

        let fuzzy_too_far = MatchProbe::Fuzzy {
            key: keys::BUYER_COUNTRY.to_string(),
            value: "Brazil".to_string(),
            max_distance: 1,
        };
        assert!(!fuzzy_too_far.matches(&info));

        // A fuzzy probe on an unsupported key never matches, whatever the
        // threshold.
        let fuzzy_unsupported = MatchProbe::Fuzzy {
            key: keys::PRICE.to_string(),
            value: "50".to_string(),
            max_distance: 100,
        };
        assert!(!fuzzy_unsupported.matches(&info));
    }

    #[test]
    fn test_recorded_value_formats() {
        let boundary = MatchProbe::Boundary {
            key: keys::QUANTITY.to_string(),
            min: Decimal::from(99),
            max: Decimal::from(101),
        };
        assert_eq!(boundary.recorded_value(), "99< x <101");

        let exact = MatchProbe::Exact {
            key: keys::ASSET.to_string(),
            value: "AAPL".to_string(),
        };
        assert_eq!(exact.recorded_value(), "AAPL");
    }

    #[test]
    fn test_probe_serde_shape() {
        let probe = MatchProbe::Fuzzy {
            key: keys::BUYER_NAME.to_string(),
            value: "0xbuyer".to_string(),
            max_distance: 2,
        };
        let json = serde_json::to_string(&probe).unwrap();
        assert!(json.contains("\"kind\":\"fuzzy\""));
        assert!(json.contains("\"maxDistance\":2"));

        let restored: MatchProbe = serde_json::from_str(&json).unwrap();
        assert_eq!(probe, restored);
    }
}
