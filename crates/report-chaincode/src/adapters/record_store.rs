//! # Record Store Adapter
//!
//! Thin deterministic wrapper over a [`LedgerStub`]: existence checks,
//! reads, writes, and history cursors keyed by report id, with ledger
//! failures mapped to contract error kinds.
//!
//! History cursors are wrapped in [`HistoryCursor`], which closes the
//! underlying iterator when dropped. Early returns and `?` therefore
//! cannot leak a cursor.

use crate::domain::codec::{decode_report, encode_report};
use crate::domain::entities::{KeyModification, Report};
use crate::errors::{ContractError, LedgerError};
use crate::ports::outbound::{HistoryQueryIterator, LedgerStub};
use tracing::warn;

// =============================================================================
// RECORD STORE
// =============================================================================

/// Keyed record access for one invocation.
pub struct RecordStore<'a, S: LedgerStub> {
    stub: &'a S,
}

impl<'a, S: LedgerStub> RecordStore<'a, S> {
    /// Wrap the invocation's ledger stub.
    #[must_use]
    pub fn new(stub: &'a S) -> Self {
        Self { stub }
    }

    /// True iff a current version exists for `key`.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the ledger read fails. Absence is not an error.
    pub fn exists(&self, key: &str) -> Result<bool, ContractError> {
        Ok(self.get(key)?.is_some())
    }

    /// Latest encoding stored under `key`.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the ledger read fails.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ContractError> {
        self.stub.get_state(key).map_err(store_unavailable)
    }

    /// Replace the latest version of `key`.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` if the ledger rejects the write.
    pub fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), ContractError> {
        self.stub.put_state(key, bytes).map_err(store_unavailable)
    }

    /// Read and decode the report stored under `key`.
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` on read failure, `MalformedRecord` if the stored
    /// bytes are not a report.
    pub fn load_report(&self, key: &str) -> Result<Option<Report>, ContractError> {
        match self.get(key)? {
            Some(bytes) => decode_report(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Encode and write `report` under its own id.
    ///
    /// # Errors
    ///
    /// `MalformedRecord` on encode failure, `StoreUnavailable` on write failure.
    pub fn store_report(&self, report: &Report) -> Result<(), ContractError> {
        let bytes = encode_report(report)?;
        self.put(&report.report_id, bytes)
    }

    /// Open the version history of `key`.
    ///
    /// # Errors
    ///
    /// `HistoryUnavailable` if the ledger cannot open a cursor.
    pub fn history_of(&self, key: &str) -> Result<HistoryCursor<S::History>, ContractError> {
        let inner = self
            .stub
            .get_history_for_key(key)
            .map_err(|e| history_unavailable(key, &e))?;
        Ok(HistoryCursor {
            inner,
            key: key.to_string(),
            closed: false,
        })
    }
}

fn store_unavailable(err: LedgerError) -> ContractError {
    ContractError::StoreUnavailable(err.to_string())
}

fn history_unavailable(key: &str, err: &LedgerError) -> ContractError {
    ContractError::HistoryUnavailable {
        report_id: key.to_string(),
        reason: err.to_string(),
    }
}

// =============================================================================
// HISTORY CURSOR
// =============================================================================

/// Scoped history cursor. Closes the ledger iterator on drop.
pub struct HistoryCursor<I: HistoryQueryIterator> {
    inner: I,
    key: String,
    closed: bool,
}

impl<I: HistoryQueryIterator> HistoryCursor<I> {
    /// Close the cursor, reporting any failure to release it.
    ///
    /// # Errors
    ///
    /// `HistoryUnavailable` if the ledger fails to close the iterator.
    pub fn close(mut self) -> Result<(), ContractError> {
        self.closed = true;
        self.inner
            .close()
            .map_err(|e| history_unavailable(&self.key, &e))
    }
}

impl<I: HistoryQueryIterator> Iterator for HistoryCursor<I> {
    type Item = Result<KeyModification, ContractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.inner
            .next()
            .map(|item| item.map_err(|e| history_unavailable(&self.key, &e)))
    }
}

impl<I: HistoryQueryIterator> Drop for HistoryCursor<I> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.inner.close() {
            warn!(key = %self.key, error = %e, "Failed to close history cursor");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
