//! # History Reconstructor
//!
//! Replays the per-key version log into typed [`HistoryEntry`] values.
//! Read-only; order is exactly the order the ledger yields.

use crate::adapters::record_store::RecordStore;
use crate::domain::codec::decode_report;
use crate::domain::entities::HistoryEntry;
use crate::errors::ContractError;
use crate::ports::outbound::LedgerStub;
use tracing::debug;

/// Rebuild the audit trail of `report_id`.
///
/// A key that was never written yields an empty trail. The cursor is
/// closed on every return path.
///
/// # Errors
///
/// * `HistoryUnavailable` - cursor could not be opened, iterated, or closed
/// * `MalformedRecord` - a live version does not decode into a report
pub fn reconstruct_history<S: LedgerStub>(
    store: &RecordStore<'_, S>,
    report_id: &str,
) -> Result<Vec<HistoryEntry>, ContractError> {
    let mut cursor = store.history_of(report_id)?;
    let mut entries = Vec::new();

    for version in cursor.by_ref() {
        let version = version?;
        let entry = match version.value {
            Some(bytes) => HistoryEntry::record(
                decode_report(report_id, &bytes)?,
                version.tx_id,
                version.timestamp,
            ),
            None => HistoryEntry::deleted(version.tx_id, version.timestamp),
        };
        entries.push(entry);
    }
    cursor.close()?;

    debug!(report_id, versions = entries.len(), "History reconstructed");
    Ok(entries)
}

/// Render an audit trail as the JSON array returned to callers.
///
/// # Errors
///
/// `MalformedRecord` if serialization fails.
pub fn history_to_json(report_id: &str, entries: &[HistoryEntry]) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(entries).map_err(|e| ContractError::MalformedRecord {
        report_id: report_id.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
