//! # Report Contract Service
//!
//! The lifecycle state machine:
//!
//! ```text
//! Nonexistent ──create──▶ Submitted ──assign──▶ Assigned ──update──▶ <status>*
//!                              └────────────update───────────────────▶ <status>*
//! ```
//!
//! Every transition is one read-modify-write against the invocation's
//! ledger stub. Ordering and conflict detection belong to the ledger; the
//! contract neither locks nor retries. A failed transition returns before
//! its write, and the platform discards the write set of any invocation
//! that returns an error.
//!
//! ## Security
//!
//! - Caller credential is resolved from the transaction context on every
//!   call that needs one, never cached
//! - Denials report only the transition, never the credentials involved

use crate::adapters::record_store::RecordStore;
use crate::config::ContractConfig;
use crate::domain::entities::{HistoryEntry, Report};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::policy::{AccessPolicy, Transition};
use crate::errors::ContractError;
use crate::history::reconstruct_history;
use crate::ports::inbound::ReportLedgerApi;
use crate::ports::outbound::{ClientIdentity, LedgerStub, TransactionContext};

use tracing::{debug, error, info, instrument, warn};

/// The report lifecycle contract.
#[derive(Debug, Clone, Default)]
pub struct ReportContract {
    /// Contract configuration.
    config: ContractConfig,
    /// Authorization matrix derived from `config`.
    policy: AccessPolicy,
}

impl ReportContract {
    /// Create a contract with the given configuration.
    #[must_use]
    pub fn new(config: ContractConfig) -> Self {
        let policy = config.access_policy();
        Self { config, policy }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Active authorization matrix.
    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Enforce the policy for `transition` against the invoking client.
    ///
    /// Transitions open to everyone never touch the identity port.
    fn authorize<C: TransactionContext>(
        &self,
        ctx: &C,
        transition: Transition,
    ) -> Result<(), ContractError> {
        if self.policy.required_credential(transition).is_none() {
            return Ok(());
        }

        let caller = ctx.client_identity().msp_id()?;
        if self.policy.authorize(&caller, transition).is_allowed() {
            return Ok(());
        }

        warn!(
            caller_msp = %caller,
            %transition,
            tx_id = ctx.stub().tx_id(),
            "Transition denied"
        );
        Err(ContractError::NotAuthorized { transition })
    }

    /// Check invariants on (before, after) and write `after`.
    fn write_checked<S: LedgerStub>(
        store: &RecordStore<'_, S>,
        before: Option<&Report>,
        after: &Report,
        transition: Transition,
    ) -> Result<(), ContractError> {
        if let InvariantCheckResult::Invalid(violations) =
            check_all_invariants(before, after, transition)
        {
            let detail = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            error!(report_id = %after.report_id, %transition, %detail, "Invariant violated");
            return Err(ContractError::InvariantViolation { transition, detail });
        }
        store.store_report(after)
    }

    /// Load an existing report or fail with `NotFound`.
    fn load_existing<S: LedgerStub>(
        store: &RecordStore<'_, S>,
        report_id: &str,
    ) -> Result<Report, ContractError> {
        store
            .load_report(report_id)?
            .ok_or_else(|| ContractError::NotFound {
                report_id: report_id.to_string(),
            })
    }
}

fn require_report_id(transition: Transition, report_id: &str) -> Result<(), ContractError> {
    if report_id.is_empty() {
        return Err(ContractError::InvalidArgument {
            function: transition.to_string(),
            reason: "reportID must not be empty".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// ReportLedgerApi Implementation
// =============================================================================

impl ReportLedgerApi for ReportContract {
    #[instrument(skip(self, ctx, description, evidence_hash), fields(tx_id = ctx.stub().tx_id()))]
    fn create_report<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
        description: &str,
        reporter: &str,
        evidence_hash: &str,
    ) -> Result<(), ContractError> {
        let transition = Transition::CreateReport;
        debug!(report_id, "Creating report");
        require_report_id(transition, report_id)?;
        self.authorize(ctx, transition)?;

        let store = RecordStore::new(ctx.stub());
        if store.exists(report_id)? {
            debug!(report_id, "Report already exists");
            return Err(ContractError::AlreadyExists {
                report_id: report_id.to_string(),
            });
        }

        let report = Report::submitted(report_id, description, reporter, evidence_hash);
        Self::write_checked(&store, None, &report, transition)?;

        info!(
            report_id,
            status = %report.status,
            at = %ctx.stub().tx_timestamp(),
            "Report created"
        );
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = ctx.stub().tx_id()))]
    fn assign_agency<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
        agency: &str,
    ) -> Result<(), ContractError> {
        let transition = Transition::AssignAgency;
        debug!(report_id, "Assigning agency");
        require_report_id(transition, report_id)?;
        self.authorize(ctx, transition)?;

        let store = RecordStore::new(ctx.stub());
        let before = Self::load_existing(&store, report_id)?;
        let after = before.assigned(agency);
        Self::write_checked(&store, Some(&before), &after, transition)?;

        info!(report_id, agency, status = %after.status, "Agency assigned");
        Ok(())
    }

    #[instrument(skip(self, ctx), fields(tx_id = ctx.stub().tx_id()))]
    fn update_status<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
        new_status: &str,
    ) -> Result<(), ContractError> {
        let transition = Transition::UpdateStatus;
        debug!(report_id, "Updating status");
        require_report_id(transition, report_id)?;
        self.authorize(ctx, transition)?;

        let store = RecordStore::new(ctx.stub());
        let before = Self::load_existing(&store, report_id)?;
        let after = before.with_status(new_status);
        Self::write_checked(&store, Some(&before), &after, transition)?;

        info!(
            report_id,
            from = %before.status,
            to = %after.status,
            "Status updated"
        );
        Ok(())
    }

    fn report_exists<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
    ) -> Result<bool, ContractError> {
        self.authorize(ctx, Transition::ReportExists)?;
        RecordStore::new(ctx.stub()).exists(report_id)
    }

    #[instrument(skip(self, ctx), fields(tx_id = ctx.stub().tx_id()))]
    fn get_history<C: TransactionContext>(
        &self,
        ctx: &C,
        report_id: &str,
    ) -> Result<Vec<HistoryEntry>, ContractError> {
        self.authorize(ctx, Transition::GetHistory)?;
        reconstruct_history(&RecordStore::new(ctx.stub()), report_id)
    }
}

// =============================================================================
// TESTS
// =============================================================================
