//! Trade record structures
//!
//! Data carried by a trade through its reconciliation lifecycle: the
//! immutable creation facts, append-only comment sequences, and the
//! append-only status/audit/match logs. The entity itself (state machine
//! and matching behavior) lives in the ledger crate; these are the shared
//! wire-format records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{UserId, Uti};
use crate::role::{JurisdictionType, RoleType};
use crate::status::StatusType;

/// Immutable facts recorded at trade submission.
///
/// `trade_date` is the execution time in unix milliseconds; `quantity` and
/// `price` use fixed-point decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInfo {
    /// Address of the buyer
    pub buyer_name: String,
    /// Country of the buyer
    pub buyer_country: String,
    /// Account id of the buyer
    pub buyer_account_id: String,
    /// Address of the seller
    pub seller_name: String,
    /// Country of the seller
    pub seller_country: String,
    /// Account id of the seller
    pub seller_account_id: String,
    /// Asset being traded
    pub asset: String,
    /// Quantity of the asset
    pub quantity: Decimal,
    /// Trade price
    pub price: Decimal,
    /// Execution time, unix milliseconds
    pub trade_date: i64,
    /// Jurisdiction of the trade
    pub jurisdiction: JurisdictionType,
}

/// Creation envelope: who submitted the trade, when, and its facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCreation {
    pub added_by: UserId,
    pub created_at: DateTime<Utc>,
    pub info: TradeInfo,
}

/// One comment on a trade, tagged with the author's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeComment {
    pub added_by: UserId,
    pub role: RoleType,
    pub added_at: DateTime<Utc>,
    pub text: String,
}

/// Whether a comment lands in the public or the private sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentVisibility {
    Public,
    Private,
}

/// One recorded status transition (including the initial state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLog {
    pub at: DateTime<Utc>,
    pub status: StatusType,
}

/// One recorded read access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub performed_by: UserId,
    pub at: DateTime<Utc>,
}

/// One successful match assertion against the trade's creation facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLog {
    pub performed_by: UserId,
    pub at: DateTime<Utc>,
    pub matched_key: String,
    pub matched_value: String,
}

/// Handle returned by listings: enough to address one trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeIdentification {
    pub uti: Uti,
    pub token_b64: String,
}
