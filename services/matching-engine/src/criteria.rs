//! Settlement criteria over recorded match logs
//!
//! Each reconciliation category is complete once every required key has at
//! least one recorded match. Repeats are harmless: the checks look for key
//! presence, not counts.

use types::trade::MatchLog;

use crate::probes::keys;

fn contains_key(logs: &[MatchLog], key: &str) -> bool {
    logs.iter().any(|log| log.matched_key == key)
}

/// Settlement-agent category: all four counterparty identity facts
/// confirmed. Gates `Executed -> Settling`.
pub fn trade_details_complete(logs: &[MatchLog]) -> bool {
    contains_key(logs, keys::BUYER_NAME)
        && contains_key(logs, keys::BUYER_COUNTRY)
        && contains_key(logs, keys::SELLER_NAME)
        && contains_key(logs, keys::SELLER_COUNTRY)
}

/// Custodian category: asset quantity confirmed.
pub fn asset_transfer_complete(logs: &[MatchLog]) -> bool {
    contains_key(logs, keys::QUANTITY)
}

/// Clearing-house category: price confirmed.
pub fn money_transfer_complete(logs: &[MatchLog]) -> bool {
    contains_key(logs, keys::PRICE)
}

/// AML category: risk rank and sanctions screening both confirmed.
pub fn aml_sanction_complete(logs: &[MatchLog]) -> bool {
    contains_key(logs, keys::AML_RISK_RANK) && contains_key(logs, keys::UNDER_SANCTION)
}
