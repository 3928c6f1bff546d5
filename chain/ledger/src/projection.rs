//! Per-role projection — confidentiality by redaction
//!
//! A trade is filtered through a pure projection before being returned to
//! any caller, keyed by the caller's role for the partition. The function
//! is total over `RoleType`; roles with no projection row are denied.
//!
//! Audit history is cleared for every role, including Admin and Regulator.

use rust_decimal::Decimal;

use types::errors::LedgerError;
use types::ids::UserId;
use types::role::{JurisdictionType, RoleType};
use types::trade::{TradeComment, TradeCreation};

use crate::trade::Trade;

/// Direction of private-comment filtering.
///
/// The deployed policy removes entries tagged with the viewer's own role,
/// which is the inverse of what confidentiality would suggest; it is kept
/// as the default for compatibility, with the corrected direction
/// available alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentFilter {
    /// Remove private comments whose tag equals the viewer's role.
    #[default]
    ExcludeViewerRole,
    /// Keep only private comments whose tag equals the viewer's role.
    ExcludeOtherRoles,
}

/// Project a trade for one viewer role.
///
/// Idempotent for a fixed role: projecting an already-projected trade
/// yields the same result.
pub fn project_for_role(
    trade: &Trade,
    role: RoleType,
    filter: CommentFilter,
) -> Result<Trade, LedgerError> {
    let mut view = trade.clone();
    // No role sees the audit trail.
    view.audit_history.clear();

    match role {
        RoleType::Trader | RoleType::Investor | RoleType::Broker | RoleType::Dealer => {
            clear_match_logs(&mut view);
            filter_private_comments(&mut view.private_comments, role, filter);
        }
        RoleType::SettlementAgent => {
            clear_creation(&mut view.creation);
            filter_private_comments(&mut view.private_comments, role, filter);
        }
        RoleType::ClearingHouse => {
            redact_creation(&mut view.creation, Keep::Buyer);
            clear_match_logs(&mut view);
            filter_private_comments(&mut view.private_comments, role, filter);
        }
        RoleType::Custodian => {
            redact_creation(&mut view.creation, Keep::Seller);
            clear_match_logs(&mut view);
            filter_private_comments(&mut view.private_comments, role, filter);
        }
        RoleType::AmlSanction => {
            redact_creation(&mut view.creation, Keep::BothParties);
            clear_match_logs(&mut view);
            filter_private_comments(&mut view.private_comments, role, filter);
        }
        RoleType::Admin | RoleType::Regulator => {
            // Full view, unfiltered comments, match logs kept.
        }
        RoleType::None => {
            return Err(LedgerError::unauthorized(format!(
                "role {role} cannot view trade details"
            )));
        }
    }
    Ok(view)
}

/// Which party block survives a partial redaction. Asset is always kept.
enum Keep {
    Buyer,
    Seller,
    BothParties,
}

fn clear_match_logs(trade: &mut Trade) {
    trade.match_trade_details.clear();
    trade.match_money_transfer.clear();
    trade.match_asset_transfer.clear();
    trade.match_aml_sanction.clear();
}

fn filter_private_comments(
    comments: &mut Vec<TradeComment>,
    viewer: RoleType,
    filter: CommentFilter,
) {
    match filter {
        CommentFilter::ExcludeViewerRole => comments.retain(|c| c.role != viewer),
        CommentFilter::ExcludeOtherRoles => comments.retain(|c| c.role == viewer),
    }
}

fn clear_creation(creation: &mut TradeCreation) {
    creation.added_by = UserId::new("");
    let info = &mut creation.info;
    info.buyer_name.clear();
    info.buyer_country.clear();
    info.buyer_account_id.clear();
    info.seller_name.clear();
    info.seller_country.clear();
    info.seller_account_id.clear();
    info.asset.clear();
    info.quantity = Decimal::ZERO;
    info.price = Decimal::ZERO;
    info.trade_date = 0;
    info.jurisdiction = JurisdictionType::None;
}

fn redact_creation(creation: &mut TradeCreation, keep: Keep) {
    creation.added_by = UserId::new("");
    let info = &mut creation.info;
    if !matches!(keep, Keep::Buyer | Keep::BothParties) {
        info.buyer_name.clear();
        info.buyer_country.clear();
        info.buyer_account_id.clear();
    }
    if !matches!(keep, Keep::Seller | Keep::BothParties) {
        info.seller_name.clear();
        info.seller_country.clear();
        info.seller_account_id.clear();
    }
    info.quantity = Decimal::ZERO;
    info.price = Decimal::ZERO;
    info.trade_date = 0;
    info.jurisdiction = JurisdictionType::None;
}
