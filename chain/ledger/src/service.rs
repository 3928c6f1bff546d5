//! Caller-facing operation dispatch
//!
//! Every operation is one atomic load-modify-save unit against the
//! injected record store; the hosting platform serializes transactions,
//! so no interleaving is visible within an operation. The service owns
//! the membership gate, the bearer-token check, the locked-partition
//! check for trade-mutating operations, and the per-role projection of
//! returned views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use capability::{ServerIdentity, VerifyingKey};
use matching_engine::MatchProbe;
use types::errors::{Entity, LedgerError};
use types::ids::{SharedLedgerId, UserId, Uti};
use types::role::{JurisdictionType, RoleType};
use types::status::StatusType;
use types::trade::{CommentVisibility, TradeIdentification, TradeInfo};

use crate::projection::{project_for_role, CommentFilter};
use crate::shared_ledger::SharedLedger;
use crate::store::{load_record, save_record, tables, RecordStore};
use crate::trade::{MatchOutcome, Trade};
use crate::user::{RoleAssignment, User};

/// Per-invocation context supplied by the host: the authenticated caller
/// and a trusted timestamp.
#[derive(Debug, Clone)]
pub struct OpContext {
    pub sender: UserId,
    pub now: DateTime<Utc>,
}

impl OpContext {
    pub fn new(sender: UserId, now: DateTime<Utc>) -> Self {
        Self { sender, now }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerConfig {
    /// Direction of private-comment filtering in projections.
    pub comment_filter: CommentFilter,
}

/// Returned once to the submitter of a trade: the (possibly generated)
/// UTI and the bearer token granting access to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
    pub uti: Uti,
    pub token_b64: String,
}

/// The shared-ledger service: operation dispatch over an injected store
/// and an optional server signing identity.
pub struct LedgerService<S: RecordStore> {
    store: S,
    identity: Option<ServerIdentity>,
    config: LedgerConfig,
}

impl<S: RecordStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            identity: None,
            config: LedgerConfig::default(),
        }
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            identity: None,
            config,
        }
    }

    /// Install the server signing identity used to issue trade tokens.
    pub fn set_identity(&mut self, identity: ServerIdentity) {
        self.identity = Some(identity);
    }

    /// Generate and install a fresh signing identity.
    pub fn rotate_identity(&mut self) {
        info!("rotating server signing identity");
        self.identity = Some(ServerIdentity::generate());
    }

    /// Public half of the signing identity, for out-of-band token
    /// verification.
    pub fn verifying_key(&self) -> Option<VerifyingKey> {
        self.identity.as_ref().map(|i| i.verifying_key())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ───────────────────────── Partition lifecycle ─────────────────────────

    /// Create a shared ledger, auto-enrolling the sender as a member.
    pub fn create_shared_ledger(
        &mut self,
        ctx: &OpContext,
        id: Option<SharedLedgerId>,
    ) -> Result<SharedLedgerId, LedgerError> {
        if let Some(id) = &id {
            if self.store.get(tables::SHARED_LEDGERS, id.as_str()).is_some() {
                return Err(LedgerError::conflict(format!(
                    "shared ledger {id} already exists"
                )));
            }
        }
        let ledger = SharedLedger::new(id, ctx.sender.clone());
        let id = ledger.id.clone();
        self.save_ledger(&ledger);
        info!(ledger = %id, creator = %ctx.sender, "shared ledger created");
        Ok(id)
    }

    /// One-way lock. Later trade-mutating operations are refused.
    pub fn lock(&mut self, ctx: &OpContext, slid: &SharedLedgerId) -> Result<(), LedgerError> {
        let mut ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;
        ledger.lock();
        self.save_ledger(&ledger);
        info!(ledger = %slid, by = %ctx.sender, "shared ledger locked");
        Ok(())
    }

    /// Cascading delete: every member trade, then every member user, then
    /// the partition record itself. Idempotent on repeated calls.
    pub fn delete_shared_ledger(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
    ) -> Result<(), LedgerError> {
        let Some(ledger) = self.try_load_ledger(slid)? else {
            // Already gone; repeated delete is a no-op.
            return Ok(());
        };
        require_member(&ledger, &ctx.sender)?;

        for uti in &ledger.trades {
            self.store.unset(tables::TRADES, uti.as_str());
        }
        for user in &ledger.users {
            self.store.unset(tables::USERS, user.as_str());
        }
        self.store.unset(tables::SHARED_LEDGERS, slid.as_str());
        info!(
            ledger = %slid,
            trades = ledger.trades.len(),
            users = ledger.users.len(),
            "shared ledger deleted"
        );
        Ok(())
    }

    // ───────────────────────── Membership ─────────────────────────

    /// Enroll a user with a role and jurisdiction.
    ///
    /// Idempotent: returns `Ok(false)` without touching the role when the
    /// target is already a member, even if the payload differs.
    pub fn enroll(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
        user_id: UserId,
        role: RoleType,
        jurisdiction: JurisdictionType,
    ) -> Result<bool, LedgerError> {
        let mut ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;

        if ledger.is_member(&user_id) {
            debug!(ledger = %slid, user = %user_id, "enroll no-op: already a member");
            return Ok(false);
        }

        // Last-write-wins: one active role per ledger.
        let assignment = RoleAssignment { role, jurisdiction };
        let user = match self.try_load_user(&user_id)? {
            Some(mut user) => {
                user.assign_role(slid.clone(), assignment);
                user
            }
            None => User::new(user_id.clone(), slid.clone(), assignment),
        };
        self.save_user(&user);

        ledger.add_member(user_id.clone());
        self.save_ledger(&ledger);
        info!(ledger = %slid, user = %user_id, role = %role, "user enrolled");
        Ok(true)
    }

    /// Reset the sender's user record, clearing every role assignment.
    pub fn reset_user(&mut self, ctx: &OpContext) -> Result<(), LedgerError> {
        let mut user = self.load_user(&ctx.sender)?;
        user.clear_roles();
        self.store.unset(tables::USERS, ctx.sender.as_str());
        info!(user = %ctx.sender, "user record reset");
        Ok(())
    }

    // ───────────────────────── Trades ─────────────────────────

    /// Submit a trade to a partition.
    ///
    /// Requires membership, an unlocked partition, and a usable signing
    /// identity. Returns the UTI and the bearer token, the only time the
    /// token is handed out.
    pub fn submit_trade(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
        uti: Option<Uti>,
        info: TradeInfo,
    ) -> Result<TradeReceipt, LedgerError> {
        let mut ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;
        require_unlocked(&ledger)?;

        if let Some(uti) = &uti {
            if ledger.contains_trade(uti) {
                return Err(LedgerError::conflict(format!(
                    "trade {uti} already exists in shared ledger {slid}"
                )));
            }
        }
        let identity = self.identity.as_ref().ok_or(LedgerError::SigningUnavailable)?;

        let mut trade = Trade::new(uti, ctx.sender.clone(), ctx.now, info);
        trade.token_b64 = capability::issue_token(identity, &trade.uti);

        // Index before writing anything: a duplicate generated UTI leaves
        // the partition untouched.
        ledger.add_trade(trade.uti.clone())?;
        let receipt = TradeReceipt {
            uti: trade.uti.clone(),
            token_b64: trade.token_b64.clone(),
        };
        self.save_trade(&trade);
        self.save_ledger(&ledger);
        info!(ledger = %slid, uti = %receipt.uti, by = %ctx.sender, "trade submitted");
        Ok(receipt)
    }

    /// Append a comment to a trade, tagged with the caller's role.
    pub fn add_comment(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
        uti: &Uti,
        token_b64: &str,
        visibility: CommentVisibility,
        text: String,
    ) -> Result<(), LedgerError> {
        let ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;
        require_unlocked(&ledger)?;

        let mut trade = self.load_member_trade(&ledger, uti)?;
        require_token(&trade, token_b64)?;
        let role = self.load_user(&ctx.sender)?.role_for(slid);

        trade.add_comment(visibility, ctx.sender.clone(), role, ctx.now, text);
        self.save_trade(&trade);
        debug!(ledger = %slid, uti = %uti, role = %role, "comment added");
        Ok(())
    }

    /// Evaluate and record a match assertion against a trade.
    ///
    /// On success the match log is appended to the category owned by the
    /// caller's role and the transition check runs. A failed comparison
    /// mutates nothing and reports `NotMatched`.
    pub fn record_match(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
        uti: &Uti,
        token_b64: &str,
        probe: &MatchProbe,
    ) -> Result<MatchOutcome, LedgerError> {
        let ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;
        require_unlocked(&ledger)?;

        let mut trade = self.load_member_trade(&ledger, uti)?;
        require_token(&trade, token_b64)?;
        let role = self.load_user(&ctx.sender)?.role_for(slid);

        let outcome = trade.apply_probe(role, ctx.sender.clone(), ctx.now, probe)?;
        match outcome {
            MatchOutcome::Matched { status } => {
                self.save_trade(&trade);
                info!(
                    ledger = %slid,
                    uti = %uti,
                    role = %role,
                    key = probe.key(),
                    status = %status,
                    "match recorded"
                );
            }
            MatchOutcome::NotMatched => {
                debug!(ledger = %slid, uti = %uti, key = probe.key(), "match not found");
            }
        }
        Ok(outcome)
    }

    /// List the trades visible to the caller's role.
    ///
    /// Every member trade the listing touches gets an audit entry, visible
    /// or not.
    pub fn list_visible(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
    ) -> Result<Vec<TradeIdentification>, LedgerError> {
        let ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;
        let role = self.load_user(&ctx.sender)?.role_for(slid);

        let mut visible = Vec::new();
        for uti in &ledger.trades {
            let Some(mut trade) =
                load_record::<Trade, _>(&self.store, tables::TRADES, uti.as_str(), Entity::Trade)?
            else {
                continue;
            };
            trade.add_audit(ctx.sender.clone(), ctx.now);
            self.save_trade(&trade);

            if is_visible(&trade, role, &ctx.sender) {
                visible.push(TradeIdentification {
                    uti: trade.uti.clone(),
                    token_b64: trade.token_b64.clone(),
                });
            }
        }
        debug!(ledger = %slid, role = %role, count = visible.len(), "trades listed");
        Ok(visible)
    }

    /// Return one trade, projected for the caller's role.
    pub fn trade_detail(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
        uti: &Uti,
        token_b64: &str,
    ) -> Result<Trade, LedgerError> {
        let ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;

        let mut trade = self.load_member_trade(&ledger, uti)?;
        require_token(&trade, token_b64)?;
        let role = self.load_user(&ctx.sender)?.role_for(slid);

        trade.add_audit(ctx.sender.clone(), ctx.now);
        self.save_trade(&trade);

        project_for_role(&trade, role, self.config.comment_filter)
    }

    /// Remove a trade from the partition and the store. Admin-only.
    pub fn remove_trade(
        &mut self,
        ctx: &OpContext,
        slid: &SharedLedgerId,
        uti: &Uti,
    ) -> Result<(), LedgerError> {
        let mut ledger = self.load_ledger(slid)?;
        require_member(&ledger, &ctx.sender)?;
        require_unlocked(&ledger)?;

        if !ledger.contains_trade(uti) {
            return Err(LedgerError::not_found(Entity::Trade, uti));
        }
        if !self.load_user(&ctx.sender)?.is_admin(slid) {
            warn!(ledger = %slid, uti = %uti, by = %ctx.sender, "non-admin trade removal refused");
            return Err(LedgerError::unauthorized(
                "only an admin can remove trades from this shared ledger",
            ));
        }

        ledger.remove_trade(uti);
        self.save_ledger(&ledger);
        self.store.unset(tables::TRADES, uti.as_str());
        info!(ledger = %slid, uti = %uti, "trade removed");
        Ok(())
    }

    // ───────────────────────── Record plumbing ─────────────────────────

    fn try_load_ledger(
        &self,
        slid: &SharedLedgerId,
    ) -> Result<Option<SharedLedger>, LedgerError> {
        load_record(
            &self.store,
            tables::SHARED_LEDGERS,
            slid.as_str(),
            Entity::SharedLedger,
        )
    }

    fn load_ledger(&self, slid: &SharedLedgerId) -> Result<SharedLedger, LedgerError> {
        self.try_load_ledger(slid)?
            .ok_or_else(|| LedgerError::not_found(Entity::SharedLedger, slid))
    }

    fn save_ledger(&mut self, ledger: &SharedLedger) {
        save_record(&mut self.store, tables::SHARED_LEDGERS, ledger.id.as_str(), ledger);
    }

    /// Load a trade through the partition that indexes it.
    fn load_member_trade(
        &self,
        ledger: &SharedLedger,
        uti: &Uti,
    ) -> Result<Trade, LedgerError> {
        if !ledger.contains_trade(uti) {
            return Err(LedgerError::not_found(Entity::Trade, uti));
        }
        load_record(&self.store, tables::TRADES, uti.as_str(), Entity::Trade)?
            .ok_or_else(|| LedgerError::not_found(Entity::Trade, uti))
    }

    fn save_trade(&mut self, trade: &Trade) {
        save_record(&mut self.store, tables::TRADES, trade.uti.as_str(), trade);
    }

    fn try_load_user(&self, id: &UserId) -> Result<Option<User>, LedgerError> {
        load_record(&self.store, tables::USERS, id.as_str(), Entity::User)
    }

    fn load_user(&self, id: &UserId) -> Result<User, LedgerError> {
        self.try_load_user(id)?
            .ok_or_else(|| LedgerError::not_found(Entity::User, id))
    }

    fn save_user(&mut self, user: &User) {
        save_record(&mut self.store, tables::USERS, user.id.as_str(), user);
    }
}

// ───────────────────────── Gates ─────────────────────────

fn require_member(ledger: &SharedLedger, sender: &UserId) -> Result<(), LedgerError> {
    if !ledger.is_member(sender) {
        return Err(LedgerError::unauthorized(format!(
            "{sender} is not a member of shared ledger {}",
            ledger.id
        )));
    }
    Ok(())
}

fn require_unlocked(ledger: &SharedLedger) -> Result<(), LedgerError> {
    if ledger.locked {
        return Err(LedgerError::invalid_state(format!(
            "shared ledger {} is locked",
            ledger.id
        )));
    }
    Ok(())
}

/// Bearer check: the caller-supplied token must be byte-equal to the token
/// stored on the addressed trade. Full cryptographic re-verification is
/// available separately in the capability crate.
fn require_token(trade: &Trade, token_b64: &str) -> Result<(), LedgerError> {
    if trade.token_b64 != token_b64 {
        return Err(LedgerError::unauthorized(format!(
            "token does not grant access to trade {}",
            trade.uti
        )));
    }
    Ok(())
}

/// Role-based listing visibility.
fn is_visible(trade: &Trade, role: RoleType, viewer: &UserId) -> bool {
    match role {
        // Originators see only the trades they created.
        RoleType::Trader | RoleType::Investor | RoleType::Broker | RoleType::Dealer => {
            trade.creation.added_by == *viewer
        }
        // The settlement agent works every executed trade.
        RoleType::SettlementAgent => trade.status >= StatusType::Executed,
        // Downstream reconcilers only see trades past the detail match.
        RoleType::ClearingHouse | RoleType::Custodian | RoleType::AmlSanction => {
            matches!(trade.status, StatusType::Settling | StatusType::Settled)
        }
        RoleType::Admin | RoleType::Regulator => true,
        RoleType::None => false,
    }
}
