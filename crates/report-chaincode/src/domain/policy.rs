//! # Authorization Policy
//!
//! Pure mapping from (caller credential, transition) to allow/deny.
//!
//! ## Authorization Matrix
//!
//! | Transition | Required credential |
//! |------------|---------------------|
//! | `CreateReport` | submitter org (`Org1MSP`) |
//! | `AssignAgency` | coordinator org (`Org2MSP`) |
//! | `UpdateStatus` | none, or coordinator org under `CoordinatorOnly` |
//! | `ReportExists` | none |
//! | `GetHistory` | none |
//!
//! No ledger access, no identity lookup: callers resolve the credential and
//! pass it in.

use serde::{Deserialize, Serialize};

/// Default MSP ids of the two participating organizations.
pub mod msp_ids {
    /// Citizens' organization; submits reports.
    pub const SUBMITTER: &str = "Org1MSP";

    /// Ministry; assigns agencies to reports.
    pub const COORDINATOR: &str = "Org2MSP";
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Operation kinds recognized by the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// `Nonexistent -> Submitted`.
    CreateReport,
    /// `* -> Assigned`.
    AssignAgency,
    /// `* -> <caller-supplied status>`.
    UpdateStatus,
    /// Existence probe.
    ReportExists,
    /// Audit trail read.
    GetHistory,
}

impl Transition {
    /// Returns true if the transition writes ledger state.
    #[must_use]
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::CreateReport | Self::AssignAgency | Self::UpdateStatus
        )
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreateReport => "CreateReport",
            Self::AssignAgency => "AssignAgency",
            Self::UpdateStatus => "UpdateStatus",
            Self::ReportExists => "ReportExists",
            Self::GetHistory => "GetHistory",
        };
        f.write_str(s)
    }
}

// =============================================================================
// POLICY
// =============================================================================

/// Who may update a report's status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusUpdatePolicy {
    /// Any caller, including agencies outside both organizations.
    #[default]
    Unrestricted,
    /// Only the coordinator organization.
    CoordinatorOnly,
}

/// Outcome of an authorization check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Transition permitted.
    Allow,
    /// Transition refused.
    Deny,
}

impl Decision {
    /// Returns true for [`Decision::Allow`].
    #[must_use]
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Role assignments for the report lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// MSP id allowed to create reports.
    pub submitter_msp: String,
    /// MSP id allowed to assign agencies.
    pub coordinator_msp: String,
    /// Rule for status updates.
    pub status_updates: StatusUpdatePolicy,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            submitter_msp: msp_ids::SUBMITTER.to_string(),
            coordinator_msp: msp_ids::COORDINATOR.to_string(),
            status_updates: StatusUpdatePolicy::default(),
        }
    }
}

impl AccessPolicy {
    /// The credential a transition requires, or `None` if it is open to
    /// every caller.
    #[must_use]
    pub fn required_credential(&self, transition: Transition) -> Option<&str> {
        match transition {
            Transition::CreateReport => Some(&self.submitter_msp),
            Transition::AssignAgency => Some(&self.coordinator_msp),
            Transition::UpdateStatus => match self.status_updates {
                StatusUpdatePolicy::Unrestricted => None,
                StatusUpdatePolicy::CoordinatorOnly => Some(&self.coordinator_msp),
            },
            Transition::ReportExists | Transition::GetHistory => None,
        }
    }

    /// Decides whether `caller_msp` may perform `transition`.
    #[must_use]
    pub fn authorize(&self, caller_msp: &str, transition: Transition) -> Decision {
        match self.required_credential(transition) {
            None => Decision::Allow,
            Some(required) if required == caller_msp => Decision::Allow,
            Some(_) => Decision::Deny,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
