//! Trade status enumeration
//!
//! Settlement progresses `Executed -> Settling -> Settled` and never moves
//! backwards. `None` exists only for parsing and is never reached after
//! construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation status of a trade.
///
/// The derived `Ord` follows declaration order, so monotonic progression
/// can be asserted with plain comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum StatusType {
    None,
    Executed,
    Settling,
    Settled,
}

impl StatusType {
    /// Total parse: unrecognized input yields `StatusType::None`.
    pub fn parse(input: &str) -> Self {
        match input {
            "executed" => Self::Executed,
            "settling" => Self::Settling,
            "settled" => Self::Settled,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Executed => "executed",
            Self::Settling => "settling",
            Self::Settled => "settled",
        }
    }

    /// Terminal status: no further transition occurs.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled)
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
