//! # Domain Invariants
//!
//! Field-level rules every transition must respect. Checked by the state
//! machine on the (before, after) pair right before the write.
//!
//! - `reportID`, `description`, `reporter`, `evidenceHash` are write-once.
//! - `assignedTo` changes only through `AssignAgency`.
//! - A created report starts `Submitted` with no assignee.

use crate::domain::entities::{Report, STATUS_ASSIGNED, STATUS_SUBMITTED};
use crate::domain::policy::Transition;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Write-once fields are unchanged between `before` and `after`.
#[must_use]
pub fn check_write_once_invariant(before: &Report, after: &Report) -> bool {
    before.report_id == after.report_id
        && before.description == after.description
        && before.reporter == after.reporter
        && before.evidence_hash == after.evidence_hash
}

/// `assignedTo` moved only if the transition is `AssignAgency`.
#[must_use]
pub fn check_assignment_invariant(before: &Report, after: &Report, transition: Transition) -> bool {
    transition == Transition::AssignAgency || before.assigned_to == after.assigned_to
}

/// A freshly created report is `Submitted` and unassigned.
#[must_use]
pub fn check_initial_state_invariant(created: &Report) -> bool {
    created.status == STATUS_SUBMITTED && created.assigned_to.is_empty()
}

/// An assigned report carries status `Assigned`.
#[must_use]
pub fn check_assigned_state_invariant(after: &Report, transition: Transition) -> bool {
    transition != Transition::AssignAgency || after.status == STATUS_ASSIGNED
}

/// Check all invariants for a transition.
///
/// `before` is `None` only for `CreateReport`.
#[must_use]
pub fn check_all_invariants(
    before: Option<&Report>,
    after: &Report,
    transition: Transition,
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    match before {
        None => {
            if transition != Transition::CreateReport {
                violations.push(InvariantViolation::FabricatedKey {
                    report_id: after.report_id.clone(),
                });
            }
            if !check_initial_state_invariant(after) {
                violations.push(InvariantViolation::BadInitialState);
            }
        }
        Some(before) => {
            if transition == Transition::CreateReport {
                violations.push(InvariantViolation::Overwrite {
                    report_id: before.report_id.clone(),
                });
            }
            if !check_write_once_invariant(before, after) {
                violations.push(InvariantViolation::WriteOnceFieldChanged);
            }
            if !check_assignment_invariant(before, after, transition) {
                violations.push(InvariantViolation::AssigneeChanged { transition });
            }
        }
    }

    if !check_assigned_state_invariant(after, transition) {
        violations.push(InvariantViolation::BadAssignedState);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A non-create transition produced a report with no prior version.
    FabricatedKey { report_id: String },
    /// Create would replace an existing report.
    Overwrite { report_id: String },
    /// A write-once field differs from the stored value.
    WriteOnceFieldChanged,
    /// `assignedTo` changed outside `AssignAgency`.
    AssigneeChanged { transition: Transition },
    /// Created report is not `Submitted` and unassigned.
    BadInitialState,
    /// Assignment did not set status `Assigned`.
    BadAssignedState,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FabricatedKey { report_id } => {
                write!(f, "transition fabricated report {report_id}")
            }
            Self::Overwrite { report_id } => write!(f, "create would overwrite {report_id}"),
            Self::WriteOnceFieldChanged => write!(f, "write-once field changed"),
            Self::AssigneeChanged { transition } => {
                write!(f, "assignedTo changed by {transition}")
            }
            Self::BadInitialState => write!(f, "created report not in Submitted state"),
            Self::BadAssignedState => write!(f, "assigned report not in Assigned state"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
