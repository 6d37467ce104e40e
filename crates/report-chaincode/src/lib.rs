//! # Report Chaincode - Permissioned Report Lifecycle
//!
//! **Ledger:** permissioned, multi-organization, endorsement based
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Keeps citizen-submitted reports on a shared ledger. Each report moves
//! through a small lifecycle (submitted, assigned to an agency, then any
//! number of status updates) and every version stays queryable as an
//! audit trail.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Create never overwrites | `domain/invariants.rs` - `Overwrite`, `service.rs` - `AlreadyExists` |
//! | Mutations never fabricate a key | `domain/invariants.rs` - `FabricatedKey`, `service.rs` - `NotFound` |
//! | Description, reporter, evidence are write-once | `domain/invariants.rs` - `check_write_once_invariant()` |
//! | Assignee changes only on assignment | `domain/invariants.rs` - `check_assignment_invariant()` |
//! | History cursor always released | `adapters/record_store.rs` - `HistoryCursor` |
//!
//! ## Authorization Matrix
//!
//! | Transition | Required Credential | Enforcement |
//! |------------|---------------------|-------------|
//! | `CreateReport` | submitter MSP (default `Org1MSP`) | `service.rs` - `authorize()` |
//! | `AssignAgency` | coordinator MSP (default `Org2MSP`) | `service.rs` - `authorize()` |
//! | `UpdateStatus` | none, or coordinator MSP when configured | `domain/policy.rs` |
//! | `ReportExists` | none | - |
//! | `GetHistory` | none | - |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `LedgerStub` | Keyed state, per-key history, transaction id and timestamp |
//! | `ClientIdentity` | MSP id of the invoking client |
//!
//! ## Usage Example
//!
//! ```ignore
//! use report_chaincode::prelude::*;
//!
//! let contract = ReportContract::new(ContractConfig::from_json(config_json)?);
//! let payload = invoke(&contract, &ctx, "CreateReport", &args)?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod history;
pub mod invocation;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        HistoryEntry, KeyModification, LedgerTimestamp, Report, STATUS_ASSIGNED, STATUS_SUBMITTED,
    };

    // Codec
    pub use crate::domain::codec::{decode_report, encode_report};

    // Policy
    pub use crate::domain::policy::{msp_ids, AccessPolicy, Decision, StatusUpdatePolicy, Transition};

    // Invariants
    pub use crate::domain::invariants::{check_all_invariants, InvariantCheckResult, InvariantViolation};

    // Ports
    pub use crate::ports::inbound::ReportLedgerApi;
    pub use crate::ports::outbound::{
        ClientIdentity, HistoryQueryIterator, LedgerStub, TransactionContext,
    };

    // Errors
    pub use crate::errors::{ConfigError, ContractError, IdentityError, LedgerError};

    // Adapters
    pub use crate::adapters::{HistoryCursor, InMemoryLedger, LedgerFault, RecordStore, TxProposal};

    // Service
    pub use crate::config::ContractConfig;
    pub use crate::history::{history_to_json, reconstruct_history};
    pub use crate::invocation::{dispatch, invoke, Invocation};
    pub use crate::service::ReportContract;
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Contract name registered with the ledger runtime.
pub const CONTRACT_NAME: &str = "report";

// =============================================================================
// TESTS
// =============================================================================
