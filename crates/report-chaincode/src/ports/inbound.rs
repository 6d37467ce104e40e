//! # Driving Ports (API - Inbound)
//!
//! The operations the report contract exposes to the hosting ledger
//! runtime. Each call receives the transaction context of the invocation
//! it runs in; nothing is carried over between calls.

use crate::domain::entities::HistoryEntry;
use crate::errors::ContractError;
use crate::ports::outbound::TransactionContext;

// =============================================================================
// REPORT LEDGER API (Primary Driving Port)
// =============================================================================

/// Primary API for the report lifecycle.
///
/// ## Usage
///
/// ```ignore
/// contract.create_report(&ctx, "R1", "pothole", "alice", "hash123")?;
/// let trail = contract.get_history(&ctx, "R1")?;
/// ```
pub trait ReportLedgerApi {
    /// Submit a new report (`Nonexistent -> Submitted`).
    ///
    /// # Errors
    ///
    /// * `NotAuthorized` - caller is not the submitter organization
    /// * `AlreadyExists` - a report is already stored under `report_id`
    fn create_report<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
        description: &str,
        reporter: &str,
        evidence_hash: &str,
    ) -> Result<(), ContractError>;

    /// Assign a responsible agency (`* -> Assigned`).
    ///
    /// # Errors
    ///
    /// * `NotAuthorized` - caller is not the coordinator organization
    /// * `NotFound` - no report under `report_id`
    fn assign_agency<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
        agency: &str,
    ) -> Result<(), ContractError>;

    /// Replace the status label verbatim.
    ///
    /// # Errors
    ///
    /// * `NotFound` - no report under `report_id`
    /// * `NotAuthorized` - only when status updates are coordinator-only
    fn update_status<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
        new_status: &str,
    ) -> Result<(), ContractError>;

    /// Whether a report is stored under `report_id`.
    fn report_exists<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
    ) -> Result<bool, ContractError>;

    /// Full change history of `report_id`, oldest first as the ledger
    /// returns it. Empty for a key that was never written.
    fn get_history<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
    ) -> Result<Vec<HistoryEntry>, ContractError>;
}
