//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the report contract depends on. The hosting ledger platform
//! implements them:
//! - Ledger stub (world state + per-key history)
//! - Client identity (caller's organization attestation)
//! - Transaction context (bundles both for one invocation)
//!
//! Ordering, conflict detection, and commit are the platform's job. A stub
//! only has to give read-your-writes within one invocation.

use crate::domain::entities::{KeyModification, LedgerTimestamp};
use crate::errors::{IdentityError, LedgerError};

// =============================================================================
// HISTORY ITERATOR
// =============================================================================

/// Cursor over the committed versions of one key.
///
/// Yields versions in platform order. Finite and not restartable. Must be
/// closed once the caller is done, whether or not it was fully consumed.
pub trait HistoryQueryIterator: Iterator<Item = Result<KeyModification, LedgerError>> {
    /// Release the underlying cursor.
    ///
    /// Closing twice is a no-op.
    fn close(&mut self) -> Result<(), LedgerError>;
}

// =============================================================================
// LEDGER STUB
// =============================================================================

/// World-state access for a single invocation.
pub trait LedgerStub {
    /// History cursor type.
    type History: HistoryQueryIterator;

    /// Id of the transaction being executed.
    fn tx_id(&self) -> &str;

    /// Timestamp of the transaction proposal.
    fn tx_timestamp(&self) -> LedgerTimestamp;

    /// Latest value for `key`.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - Value written earlier in this invocation, or the
    ///   latest committed value
    /// * `None` - Key absent
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Queue `value` as the new version of `key`.
    ///
    /// Applied when the platform commits the transaction.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Open a history cursor for `key`.
    fn get_history_for_key(&self, key: &str) -> Result<Self::History, LedgerError>;
}

// =============================================================================
// CLIENT IDENTITY
// =============================================================================

/// The attested identity of the invoking client.
pub trait ClientIdentity {
    /// MSP id of the client's organization.
    fn msp_id(&self) -> Result<String, IdentityError>;
}

// =============================================================================
// TRANSACTION CONTEXT
// =============================================================================

/// Everything the contract may touch during one invocation.
pub trait TransactionContext {
    /// Ledger stub type.
    type Stub: LedgerStub;
    /// Client identity type.
    type Identity: ClientIdentity;

    /// World-state access.
    fn stub(&self) -> &Self::Stub;

    /// Invoking client.
    fn client_identity(&self) -> &Self::Identity;
}

// =============================================================================
// TESTS
// =============================================================================
