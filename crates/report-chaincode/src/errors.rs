//! # Error Types
//!
//! All error types for the report chaincode.
//!
//! Outbound ports fail with [`LedgerError`] or [`IdentityError`]. The
//! contract never forwards those raw: each call site maps them into the
//! [`ContractError`] kind that describes what the caller was doing
//! (`StoreUnavailable` for state access, `HistoryUnavailable` for history
//! iteration, `IdentityUnavailable` for credential lookup).

use crate::domain::policy::Transition;
use thiserror::Error;

// =============================================================================
// CONTRACT ERRORS
// =============================================================================

/// Errors surfaced to the caller of a contract invocation.
///
/// Every variant is terminal for the invocation. Nothing is retried and no
/// partial state is committed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Caller credential does not permit the requested transition.
    #[error("caller is not authorized for {transition}")]
    NotAuthorized { transition: Transition },

    /// Create was requested for a key that already holds a report.
    #[error("report {report_id} already exists")]
    AlreadyExists { report_id: String },

    /// Mutation was requested for a key with no current report.
    #[error("report {report_id} does not exist")]
    NotFound { report_id: String },

    /// Stored bytes do not decode into a report.
    #[error("malformed record for {report_id}: {reason}")]
    MalformedRecord { report_id: String, reason: String },

    /// Caller attestation could not be read from the invocation context.
    #[error("caller identity unavailable: {0}")]
    IdentityUnavailable(String),

    /// Per-key history could not be opened or iterated.
    #[error("history unavailable for {report_id}: {reason}")]
    HistoryUnavailable { report_id: String, reason: String },

    /// Ledger state access failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Invocation arguments are missing, extra, or empty.
    #[error("invalid argument for {function}: {reason}")]
    InvalidArgument { function: String, reason: String },

    /// Invocation named a function the contract does not export.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A transition produced a record that breaks a field invariant.
    #[error("invariant violated by {transition}: {detail}")]
    InvariantViolation { transition: Transition, detail: String },
}

impl ContractError {
    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::MalformedRecord { .. } => "MALFORMED_RECORD",
            Self::IdentityUnavailable(_) => "IDENTITY_UNAVAILABLE",
            Self::HistoryUnavailable { .. } => "HISTORY_UNAVAILABLE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            Self::InvariantViolation { .. } => "INVARIANT_VIOLATION",
        }
    }

    /// Returns true if the failure came from the ledger substrate rather
    /// than from the request itself.
    #[must_use]
    pub fn is_substrate_failure(&self) -> bool {
        matches!(
            self,
            Self::IdentityUnavailable(_)
                | Self::HistoryUnavailable { .. }
                | Self::StoreUnavailable(_)
        )
    }
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from the ledger stub (state and history access).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Key rejected by the ledger.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Transaction id was already used by a committed transaction.
    #[error("duplicate transaction id: {0}")]
    DuplicateTxId(String),

    /// History cursor was used after being closed.
    #[error("history iterator already closed")]
    IteratorClosed,

    /// Ledger connection lost or backing store failed.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// IDENTITY ERRORS
// =============================================================================

/// Errors from the client identity port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Creator certificate missing from the signed proposal.
    #[error("no creator attestation in proposal")]
    MissingCreator,

    /// Creator attestation present but unreadable.
    #[error("creator attestation unreadable: {0}")]
    Unreadable(String),
}

impl From<IdentityError> for ContractError {
    fn from(err: IdentityError) -> Self {
        ContractError::IdentityUnavailable(err.to_string())
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors while loading [`crate::config::ContractConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Document is not valid JSON or has wrong field types.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required MSP id is empty.
    #[error("config field {0} must not be empty")]
    EmptyField(&'static str),
}

// =============================================================================
// TESTS
// =============================================================================
