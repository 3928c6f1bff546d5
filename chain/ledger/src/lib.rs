//! Shared-Ledger Partition Logic
//!
//! Multi-party trade records on a permissioned ledger partition: several
//! organizational roles collaborate on the same trade object without all
//! seeing the same data, and a trade advances through reconciliation
//! stages only once independent parties confirm matching facts.
//!
//! # Modules
//! - `store`: injected keyed record store abstraction + in-memory impl
//! - `user`: user aggregate (per-ledger role assignments)
//! - `trade`: trade entity and its reconciliation state machine
//! - `shared_ledger`: ledger partition aggregate (membership, trade set)
//! - `projection`: per-role redaction of trade views
//! - `service`: caller-facing operation dispatch

pub mod projection;
pub mod service;
pub mod shared_ledger;
pub mod store;
pub mod trade;
pub mod user;

pub use projection::{project_for_role, CommentFilter};
pub use service::{LedgerConfig, LedgerService, OpContext, TradeReceipt};
pub use shared_ledger::SharedLedger;
pub use store::{MemoryStore, RecordStore};
pub use trade::{MatchOutcome, Trade};
pub use user::{RoleAssignment, User};
