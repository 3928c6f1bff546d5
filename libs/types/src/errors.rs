//! Error taxonomy for ledger operations
//!
//! Every failure is reported synchronously to the caller and no operation
//! leaves an aggregate half-updated. There is no fatal class: an aggregate
//! remains loadable after any of these.

use std::fmt;
use thiserror::Error;

/// Kind of record an operation failed to locate or decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    SharedLedger,
    Trade,
    User,
    Role,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::SharedLedger => "shared ledger",
            Entity::Trade => "trade",
            Entity::User => "user",
            Entity::Role => "role",
        };
        write!(f, "{name}")
    }
}

/// Top-level error for every ledger operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("server signing identity is not available")]
    SigningUnavailable,

    #[error("stored {entity} record {id} failed to decode")]
    Corrupt { entity: Entity, id: String },
}

impl LedgerError {
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict(reason.into())
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}
