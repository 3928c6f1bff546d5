//! Reconciliation Matching Engine
//!
//! Pure, stateless comparisons of submitted facts against a trade's
//! immutable creation data. Independent parties (settlement agent, clearing
//! house, custodian, AML screener) each assert the facts they can observe;
//! the ledger advances a trade's status only once every category of fact
//! has been independently confirmed.
//!
//! **Key Invariants:**
//! - Deterministic matching (same inputs → same outputs)
//! - No state: every function reads only its arguments
//! - Unknown keys never match
//! - Comparisons use fixed-point decimals, never floats

pub mod criteria;
pub mod distance;
pub mod probes;

pub use criteria::{
    aml_sanction_complete, asset_transfer_complete, money_transfer_complete,
    trade_details_complete,
};
pub use distance::levenshtein;
pub use probes::{boundary_match, exact_match, levenshtein_match, keys, MatchProbe};
