//! Trade entity and reconciliation state machine
//!
//! A trade starts `Executed`, moves to `Settling` once the settlement
//! agent has confirmed all four counterparty identity facts, and to
//! `Settled` once the custodian, clearing house, and AML screener have
//! each confirmed their category. Status never moves backwards and
//! `Settled` is terminal.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use matching_engine::{
    aml_sanction_complete, asset_transfer_complete, money_transfer_complete,
    trade_details_complete, MatchProbe,
};
use types::errors::LedgerError;
use types::ids::{UserId, Uti};
use types::role::RoleType;
use types::status::StatusType;
use types::trade::{
    AuditLog, CommentVisibility, MatchLog, StatusLog, TradeComment, TradeCreation, TradeInfo,
};

/// Result of applying a match probe to a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "result")]
pub enum MatchOutcome {
    /// The fact matched and was recorded; `status` is the (possibly
    /// advanced) status after the transition check.
    #[serde(rename_all = "camelCase")]
    Matched { status: StatusType },
    /// The fact did not match; nothing was recorded.
    NotMatched,
}

/// A multi-party trade record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub uti: Uti,
    /// Capability token, set once at creation, immutable thereafter.
    pub token_b64: String,

    pub creation: TradeCreation,
    pub public_comments: Vec<TradeComment>,
    pub private_comments: Vec<TradeComment>,

    /// Settlement-agent category (buyer/seller name and country)
    pub match_trade_details: Vec<MatchLog>,
    /// Clearing-house category (price)
    pub match_money_transfer: Vec<MatchLog>,
    /// Custodian category (quantity)
    pub match_asset_transfer: Vec<MatchLog>,
    /// AML category (amlRiskRank, underSanction)
    pub match_aml_sanction: Vec<MatchLog>,

    pub status: StatusType,
    pub status_history: Vec<StatusLog>,
    pub audit_history: Vec<AuditLog>,
}

impl Trade {
    /// Create a trade from its submission facts.
    ///
    /// Status starts at `Executed` with the matching initial history
    /// entry. When no UTI is supplied one is generated from the trade
    /// date and fresh randomness.
    pub fn new(uti: Option<Uti>, added_by: UserId, now: DateTime<Utc>, info: TradeInfo) -> Self {
        let uti = uti.unwrap_or_else(|| generate_uti(&info, now));
        let status = StatusType::Executed;
        Self {
            uti,
            token_b64: String::new(),
            creation: TradeCreation {
                added_by,
                created_at: now,
                info,
            },
            public_comments: Vec::new(),
            private_comments: Vec::new(),
            match_trade_details: Vec::new(),
            match_money_transfer: Vec::new(),
            match_asset_transfer: Vec::new(),
            match_aml_sanction: Vec::new(),
            status,
            status_history: vec![StatusLog { at: now, status }],
            audit_history: Vec::new(),
        }
    }

    /// Append a comment to the public or private sequence.
    pub fn add_comment(
        &mut self,
        visibility: CommentVisibility,
        added_by: UserId,
        role: RoleType,
        at: DateTime<Utc>,
        text: String,
    ) {
        let comment = TradeComment {
            added_by,
            role,
            added_at: at,
            text,
        };
        match visibility {
            CommentVisibility::Public => self.public_comments.push(comment),
            CommentVisibility::Private => self.private_comments.push(comment),
        }
    }

    /// Record one read access.
    pub fn add_audit(&mut self, performed_by: UserId, at: DateTime<Utc>) {
        self.audit_history.push(AuditLog { performed_by, at });
    }

    /// Evaluate a probe against the creation facts and, on success, record
    /// it in the category owned by `role` and run the transition check.
    ///
    /// A role outside the four reconciliation roles records nothing; a
    /// probe that fails its comparison performs no mutation at all.
    pub fn apply_probe(
        &mut self,
        role: RoleType,
        performed_by: UserId,
        at: DateTime<Utc>,
        probe: &MatchProbe,
    ) -> Result<MatchOutcome, LedgerError> {
        if !role.is_reconciler() {
            return Err(LedgerError::invalid_input("invalid role type"));
        }
        if !probe.matches(&self.creation.info) {
            return Ok(MatchOutcome::NotMatched);
        }

        let log = MatchLog {
            performed_by,
            at,
            matched_key: probe.key().to_string(),
            matched_value: probe.recorded_value(),
        };
        match role {
            RoleType::SettlementAgent => self.match_trade_details.push(log),
            RoleType::ClearingHouse => self.match_money_transfer.push(log),
            RoleType::Custodian => self.match_asset_transfer.push(log),
            RoleType::AmlSanction => self.match_aml_sanction.push(log),
            // is_reconciler() holds here
            _ => unreachable!("non-reconciler role past the gate"),
        }

        self.progress_status(at);
        Ok(MatchOutcome::Matched {
            status: self.status,
        })
    }

    /// Run the transition rules against the current match logs.
    ///
    /// Idempotent: once criteria for a later state are satisfied, calling
    /// again is a no-op. A single call may advance twice when every
    /// category is already complete.
    pub fn progress_status(&mut self, at: DateTime<Utc>) {
        if self.status == StatusType::Executed && trade_details_complete(&self.match_trade_details)
        {
            self.transition(StatusType::Settling, at);
        }
        if self.status == StatusType::Settling
            && asset_transfer_complete(&self.match_asset_transfer)
            && money_transfer_complete(&self.match_money_transfer)
            && aml_sanction_complete(&self.match_aml_sanction)
        {
            self.transition(StatusType::Settled, at);
        }
    }

    fn transition(&mut self, to: StatusType, at: DateTime<Utc>) {
        debug_assert!(self.status < to, "status is monotonic non-decreasing");
        self.status = to;
        self.status_history.push(StatusLog { at, status: to });
    }
}

/// Generate a UTI: `SWIFT<rand>.TRADE<YYYYMMDD>SEQ<rand>`.
///
/// The date component comes from the trade's execution date; `now` is the
/// fallback when that value is out of the representable range.
fn generate_uti(info: &TradeInfo, now: DateTime<Utc>) -> Uti {
    let date = DateTime::<Utc>::from_timestamp_millis(info.trade_date)
        .unwrap_or(now)
        .format("%Y%m%d");

    let mut rng = rand::thread_rng();
    let short: [u8; 4] = rng.gen();
    let long: [u8; 8] = rng.gen();

    Uti::new(format!(
        "SWIFT{}.TRADE{}SEQ{}",
        BASE64.encode(short),
        date,
        BASE64.encode(long)
    ))
}
