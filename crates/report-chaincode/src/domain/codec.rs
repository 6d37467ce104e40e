//! # Report Codec
//!
//! Canonical byte encoding of [`Report`] for ledger storage.
//!
//! Every endorsing peer re-executes the same invocation, so two peers given
//! identical field values must write byte-identical state. The encoding is
//! compact JSON with the field order fixed by the struct declaration; the
//! report holds only strings, so no number or locale formatting is involved.
//!
//! Callers handle absent values and tombstones before decoding. The codec
//! only ever sees bytes that the ledger reports as a live version.

use crate::domain::entities::Report;
use crate::errors::ContractError;

/// Encodes a report into its canonical ledger bytes.
///
/// # Errors
///
/// Returns `MalformedRecord` if serialization fails.
pub fn encode_report(report: &Report) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(report).map_err(|e| ContractError::MalformedRecord {
        report_id: report.report_id.clone(),
        reason: e.to_string(),
    })
}

/// Decodes ledger bytes stored under `key` into a report.
///
/// Unknown extra fields are ignored; a missing field or a field of the
/// wrong type is an error. There is no fallback to an empty report.
///
/// # Errors
///
/// Returns `MalformedRecord` naming `key` if the bytes are not a report.
pub fn decode_report(key: &str, bytes: &[u8]) -> Result<Report, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::MalformedRecord {
        report_id: key.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
