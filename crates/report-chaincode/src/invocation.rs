//! # Invocation Surface
//!
//! The hosting runtime calls the chaincode with a function name and a list
//! of string arguments. This module turns that pair into a typed
//! [`Invocation`] and runs it against a [`ReportLedgerApi`].
//!
//! ## Exported Functions
//!
//! | Function | Arguments | Response |
//! |----------|-----------|----------|
//! | `CreateReport` | reportID, description, reporter, evidenceHash | empty |
//! | `AssignAgency` | reportID, agency | empty |
//! | `UpdateStatus` | reportID, newStatus | empty |
//! | `ReportExists` | reportID | JSON `true` / `false` |
//! | `GetHistory` | reportID | JSON array of history entries |

use crate::domain::policy::Transition;
use crate::errors::ContractError;
use crate::history::history_to_json;
use crate::ports::inbound::ReportLedgerApi;
use crate::ports::outbound::TransactionContext;
use tracing::debug;

/// A parsed contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Submit a new report.
    CreateReport {
        /// Primary key.
        report_id: String,
        /// Free-text description.
        description: String,
        /// Reporter label.
        reporter: String,
        /// Digest of off-ledger evidence.
        evidence_hash: String,
    },
    /// Assign a responsible agency.
    AssignAgency {
        /// Primary key.
        report_id: String,
        /// Agency label.
        agency: String,
    },
    /// Replace the status label.
    UpdateStatus {
        /// Primary key.
        report_id: String,
        /// New status label, stored verbatim.
        new_status: String,
    },
    /// Existence probe.
    ReportExists {
        /// Primary key.
        report_id: String,
    },
    /// Audit trail query.
    GetHistory {
        /// Primary key.
        report_id: String,
    },
}

impl Invocation {
    /// Map a function name and its arguments to a typed call.
    ///
    /// # Errors
    ///
    /// * `UnknownFunction` - `function` is not exported
    /// * `InvalidArgument` - wrong number of arguments
    pub fn parse(function: &str, args: &[String]) -> Result<Self, ContractError> {
        let invocation = match function {
            "CreateReport" => {
                let [report_id, description, reporter, evidence_hash] = take(function, args)?;
                Self::CreateReport {
                    report_id,
                    description,
                    reporter,
                    evidence_hash,
                }
            }
            "AssignAgency" => {
                let [report_id, agency] = take(function, args)?;
                Self::AssignAgency { report_id, agency }
            }
            "UpdateStatus" => {
                let [report_id, new_status] = take(function, args)?;
                Self::UpdateStatus {
                    report_id,
                    new_status,
                }
            }
            "ReportExists" => {
                let [report_id] = take(function, args)?;
                Self::ReportExists { report_id }
            }
            "GetHistory" => {
                let [report_id] = take(function, args)?;
                Self::GetHistory { report_id }
            }
            other => return Err(ContractError::UnknownFunction(other.to_string())),
        };
        Ok(invocation)
    }

    /// The transition this call requests.
    #[must_use]
    pub fn transition(&self) -> Transition {
        match self {
            Self::CreateReport { .. } => Transition::CreateReport,
            Self::AssignAgency { .. } => Transition::AssignAgency,
            Self::UpdateStatus { .. } => Transition::UpdateStatus,
            Self::ReportExists { .. } => Transition::ReportExists,
            Self::GetHistory { .. } => Transition::GetHistory,
        }
    }

    /// Exported function name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateReport { .. } => "CreateReport",
            Self::AssignAgency { .. } => "AssignAgency",
            Self::UpdateStatus { .. } => "UpdateStatus",
            Self::ReportExists { .. } => "ReportExists",
            Self::GetHistory { .. } => "GetHistory",
        }
    }

    /// True for queries that never write.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        !self.transition().is_mutation()
    }

    /// Report the call targets.
    #[must_use]
    pub fn report_id(&self) -> &str {
        match self {
            Self::CreateReport { report_id, .. }
            | Self::AssignAgency { report_id, .. }
            | Self::UpdateStatus { report_id, .. }
            | Self::ReportExists { report_id }
            | Self::GetHistory { report_id } => report_id,
        }
    }
}

fn take<const N: usize>(function: &str, args: &[String]) -> Result<[String; N], ContractError> {
    <[String; N]>::try_from(args.to_vec()).map_err(|given| ContractError::InvalidArgument {
        function: function.to_string(),
        reason: format!("expected {N} arguments, got {}", given.len()),
    })
}

/// Run `invocation` and render its response payload.
///
/// # Errors
///
/// Whatever the underlying operation returns.
pub fn dispatch<A, C>(api: &A, ctx: &C, invocation: &Invocation) -> Result<Vec<u8>, ContractError>
where
    A: ReportLedgerApi,
    C: TransactionContext,
{
    debug!(function = invocation.name(), report_id = invocation.report_id(), "Dispatching");

    match invocation {
        Invocation::CreateReport {
            report_id,
            description,
            reporter,
            evidence_hash,
        } => api
            .create_report(ctx, report_id, description, reporter, evidence_hash)
            .map(|()| Vec::new()),
        Invocation::AssignAgency { report_id, agency } => api
            .assign_agency(ctx, report_id, agency)
            .map(|()| Vec::new()),
        Invocation::UpdateStatus {
            report_id,
            new_status,
        } => api
            .update_status(ctx, report_id, new_status)
            .map(|()| Vec::new()),
        Invocation::ReportExists { report_id } => {
            let exists = api.report_exists(ctx, report_id)?;
            Ok(if exists { b"true".to_vec() } else { b"false".to_vec() })
        }
        Invocation::GetHistory { report_id } => {
            let entries = api.get_history(ctx, report_id)?;
            history_to_json(report_id, &entries)
        }
    }
}

/// Parse and run a raw call.
///
/// # Errors
///
/// Parse errors, then whatever the underlying operation returns.
pub fn invoke<A, C>(api: &A, ctx: &C, function: &str, args: &[String]) -> Result<Vec<u8>, ContractError>
where
    A: ReportLedgerApi,
    C: TransactionContext,
{
    let invocation = Invocation::parse(function, args)?;
    dispatch(api, ctx, &invocation)
}

// =============================================================================
// TESTS
// =============================================================================
