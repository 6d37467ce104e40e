//! # Core Domain Entities
//!
//! The report record, the ledger's native timestamp, and the typed history
//! entry produced by audit queries.

use serde::{Deserialize, Serialize};

// =============================================================================
// STATUS LABELS
// =============================================================================

/// Status written by `CreateReport`.
pub const STATUS_SUBMITTED: &str = "Submitted";

/// Status written by `AssignAgency`.
pub const STATUS_ASSIGNED: &str = "Assigned";

// =============================================================================
// REPORT
// =============================================================================

/// A citizen report tracked on the ledger.
///
/// Field declaration order is the encoding order; do not reorder.
/// `status` is a free string: after assignment any agency-supplied label
/// is stored verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Primary key. Immutable.
    #[serde(rename = "reportID")]
    pub report_id: String,
    /// Free-text description. Write-once.
    pub description: String,
    /// Current lifecycle label.
    pub status: String,
    /// Submitting party. Write-once.
    pub reporter: String,
    /// Responsible agency, empty until assignment.
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
    /// Content hash of off-ledger evidence. Write-once.
    #[serde(rename = "evidenceHash")]
    pub evidence_hash: String,
}

impl Report {
    /// Creates a freshly submitted report.
    #[must_use]
    pub fn submitted(
        report_id: impl Into<String>,
        description: impl Into<String>,
        reporter: impl Into<String>,
        evidence_hash: impl Into<String>,
    ) -> Self {
        Self {
            report_id: report_id.into(),
            description: description.into(),
            status: STATUS_SUBMITTED.to_string(),
            reporter: reporter.into(),
            assigned_to: String::new(),
            evidence_hash: evidence_hash.into(),
        }
    }

    /// Returns true once an agency has been assigned.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        !self.assigned_to.is_empty()
    }

    /// Returns a copy assigned to `agency` with status `Assigned`.
    #[must_use]
    pub fn assigned(&self, agency: impl Into<String>) -> Self {
        Self {
            assigned_to: agency.into(),
            status: STATUS_ASSIGNED.to_string(),
            ..self.clone()
        }
    }

    /// Returns a copy with `status` replaced verbatim.
    #[must_use]
    pub fn with_status(&self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self.clone()
        }
    }
}

// =============================================================================
// LEDGER TIMESTAMP
// =============================================================================

/// Commit timestamp as carried by the ledger (protobuf `Timestamp` shape).
///
/// Supplied by the transaction context; the contract never reads a clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: i32,
}

impl LedgerTimestamp {
    /// Creates a timestamp.
    #[must_use]
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }
}

impl std::fmt::Display for LedgerTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

// =============================================================================
// KEY MODIFICATION
// =============================================================================

/// One committed version of a key, as returned by the ledger history API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyModification {
    /// Transaction that wrote this version.
    pub tx_id: String,
    /// Commit timestamp of that transaction.
    pub timestamp: LedgerTimestamp,
    /// Encoded value, `None` for a tombstone.
    pub value: Option<Vec<u8>>,
}

impl KeyModification {
    /// Returns true if this version deleted the key.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.value.is_none()
    }
}

// =============================================================================
// HISTORY ENTRY
// =============================================================================

/// Marker object rendered for a tombstone version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedMarker {
    /// Always `true`.
    #[serde(rename = "Deleted")]
    pub deleted: bool,
}

/// Value half of a history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryValue {
    /// The decoded report as of this version.
    Record(Report),
    /// The key was deleted in this version.
    Deleted(DeletedMarker),
}

/// One entry of an audit trail.
///
/// Serializes as a flat JSON object: the report fields (or
/// `"Deleted": true`) followed by `TxId` and `Timestamp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Report fields or the deletion marker.
    #[serde(flatten)]
    pub value: HistoryValue,
    /// Originating transaction.
    #[serde(rename = "TxId")]
    pub tx_id: String,
    /// Commit timestamp.
    #[serde(rename = "Timestamp")]
    pub timestamp: LedgerTimestamp,
}

impl HistoryEntry {
    /// Builds an entry for a live version.
    #[must_use]
    pub fn record(report: Report, tx_id: impl Into<String>, timestamp: LedgerTimestamp) -> Self {
        Self {
            value: HistoryValue::Record(report),
            tx_id: tx_id.into(),
            timestamp,
        }
    }

    /// Builds an entry for a tombstone version.
    #[must_use]
    pub fn deleted(tx_id: impl Into<String>, timestamp: LedgerTimestamp) -> Self {
        Self {
            value: HistoryValue::Deleted(DeletedMarker { deleted: true }),
            tx_id: tx_id.into(),
            timestamp,
        }
    }

    /// Returns true for a tombstone entry.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self.value, HistoryValue::Deleted(_))
    }

    /// The report as of this entry, if not a tombstone.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        match &self.value {
            HistoryValue::Record(report) => Some(report),
            HistoryValue::Deleted(_) => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
