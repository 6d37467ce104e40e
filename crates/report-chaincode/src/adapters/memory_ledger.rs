//! # In-Memory Ledger
//!
//! Ledger implementation for testing. Production deployments are served by
//! the hosting ledger platform, which implements the outbound ports itself.
//!
//! Models the parts of the platform the contract relies on:
//! - Per-invocation write set with read-your-writes, applied only on commit
//! - Per-key version history with transaction id and timestamp
//! - Unique transaction ids
//! - Client identity from the proposal creator
//!
//! Faults can be injected to exercise `StoreUnavailable` and
//! `HistoryUnavailable` paths, and open history cursors are counted so tests
//! can assert that every cursor gets closed.

use crate::domain::entities::{KeyModification, LedgerTimestamp};
use crate::errors::{ContractError, IdentityError, LedgerError};
use crate::ports::outbound::{ClientIdentity, HistoryQueryIterator, LedgerStub, TransactionContext};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

// =============================================================================
// PROPOSALS AND FAULTS
// =============================================================================

/// Header of a simulated transaction proposal.
#[derive(Clone, Debug)]
pub struct TxProposal {
    /// Transaction id assigned by the client SDK.
    pub tx_id: String,
    /// Proposal timestamp.
    pub timestamp: LedgerTimestamp,
    /// MSP id of the signing client, `None` if the creator is missing.
    pub creator_msp: Option<String>,
}

impl TxProposal {
    /// Proposal with no creator attestation.
    #[must_use]
    pub fn new(tx_id: impl Into<String>, timestamp: LedgerTimestamp) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            creator_msp: None,
        }
    }

    /// Set the signing client's MSP id.
    #[must_use]
    pub fn with_creator(mut self, msp_id: impl Into<String>) -> Self {
        self.creator_msp = Some(msp_id.into());
        self
    }
}

/// Failure to inject into subsequent ledger calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerFault {
    /// `get_state` fails.
    GetState,
    /// `put_state` fails.
    PutState,
    /// `get_history_for_key` fails to open a cursor.
    HistoryOpen,
    /// History cursors fail after yielding this many versions.
    HistoryNext { after: usize },
}

// =============================================================================
// LEDGER
// =============================================================================

/// In-memory ledger for testing.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    /// Latest committed value per key.
    state: RwLock<BTreeMap<String, Vec<u8>>>,
    /// Committed versions per key, in commit order.
    history: RwLock<BTreeMap<String, Vec<KeyModification>>>,
    /// Ids of committed transactions.
    committed_tx_ids: RwLock<HashSet<String>>,
    /// Currently open history cursors.
    open_cursors: Arc<AtomicUsize>,
    /// Injected failure, if any.
    fault: RwLock<Option<LedgerFault>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the injected fault.
    pub fn inject_fault(&self, fault: Option<LedgerFault>) {
        if let Ok(mut slot) = self.fault.write() {
            *slot = fault;
        }
    }

    /// Number of history cursors opened and not yet closed.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Number of committed versions of `key`.
    #[must_use]
    pub fn version_count(&self, key: &str) -> usize {
        self.history
            .read()
            .map(|h| h.get(key).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Latest committed value of `key`.
    pub fn committed(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.state.read().map_err(poisoned)?.get(key).cloned())
    }

    /// Start executing a proposal.
    ///
    /// # Errors
    ///
    /// `DuplicateTxId` if a transaction with the same id was committed.
    pub fn begin(&self, proposal: TxProposal) -> Result<MemoryTxContext<'_>, LedgerError> {
        if self
            .committed_tx_ids
            .read()
            .map_err(poisoned)?
            .contains(&proposal.tx_id)
        {
            return Err(LedgerError::DuplicateTxId(proposal.tx_id));
        }
        Ok(MemoryTxContext {
            stub: MemoryStub {
                ledger: self,
                tx_id: proposal.tx_id,
                timestamp: proposal.timestamp,
                writes: RefCell::new(BTreeMap::new()),
            },
            identity: ProposalIdentity {
                msp_id: proposal.creator_msp,
            },
        })
    }

    /// Apply a context's write set as one committed transaction.
    pub fn commit(&self, ctx: MemoryTxContext<'_>) -> Result<(), LedgerError> {
        let MemoryStub {
            tx_id,
            timestamp,
            writes,
            ..
        } = ctx.stub;
        self.apply(&tx_id, timestamp, writes.into_inner())
    }

    /// Execute `f` in a fresh context and commit its writes if it succeeds.
    ///
    /// On error nothing is committed.
    pub fn submit<T, F>(&self, proposal: TxProposal, f: F) -> Result<T, ContractError>
    where
        F: FnOnce(&MemoryTxContext<'_>) -> Result<T, ContractError>,
    {
        let ctx = self.begin(proposal).map_err(commit_failed)?;
        let output = f(&ctx)?;
        self.commit(ctx).map_err(commit_failed)?;
        Ok(output)
    }

    /// Execute `f` in a fresh context and discard its writes.
    pub fn evaluate<T, F>(&self, proposal: TxProposal, f: F) -> Result<T, ContractError>
    where
        F: FnOnce(&MemoryTxContext<'_>) -> Result<T, ContractError>,
    {
        let ctx = self.begin(proposal).map_err(commit_failed)?;
        f(&ctx)
    }

    /// Commit a raw value for `key`, bypassing any contract.
    pub fn seed(&self, key: &str, value: Vec<u8>, proposal: TxProposal) -> Result<(), LedgerError> {
        let mut writes = BTreeMap::new();
        writes.insert(key.to_string(), Some(value));
        self.apply(&proposal.tx_id, proposal.timestamp, writes)
    }

    /// Commit a deletion of `key`, bypassing any contract.
    pub fn delete(&self, key: &str, proposal: TxProposal) -> Result<(), LedgerError> {
        let mut writes = BTreeMap::new();
        writes.insert(key.to_string(), None);
        self.apply(&proposal.tx_id, proposal.timestamp, writes)
    }

    fn apply(
        &self,
        tx_id: &str,
        timestamp: LedgerTimestamp,
        writes: BTreeMap<String, Option<Vec<u8>>>,
    ) -> Result<(), LedgerError> {
        let mut tx_ids = self.committed_tx_ids.write().map_err(poisoned)?;
        if !tx_ids.insert(tx_id.to_string()) {
            return Err(LedgerError::DuplicateTxId(tx_id.to_string()));
        }

        let mut state = self.state.write().map_err(poisoned)?;
        let mut history = self.history.write().map_err(poisoned)?;
        for (key, value) in writes {
            match &value {
                Some(bytes) => {
                    state.insert(key.clone(), bytes.clone());
                }
                None => {
                    state.remove(&key);
                }
            }
            history.entry(key).or_default().push(KeyModification {
                tx_id: tx_id.to_string(),
                timestamp,
                value,
            });
        }
        Ok(())
    }

    fn check_fault(&self, op: LedgerFault) -> Result<(), LedgerError> {
        match *self.fault.read().map_err(poisoned)? {
            Some(fault) if fault == op => Err(LedgerError::Unavailable(format!(
                "injected fault: {op:?}"
            ))),
            _ => Ok(()),
        }
    }

    fn history_fault(&self) -> Result<Option<usize>, LedgerError> {
        match *self.fault.read().map_err(poisoned)? {
            Some(LedgerFault::HistoryNext { after }) => Ok(Some(after)),
            _ => Ok(None),
        }
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Unavailable("lock poisoned".to_string())
}

fn commit_failed(err: LedgerError) -> ContractError {
    ContractError::StoreUnavailable(err.to_string())
}

// =============================================================================
// STUB
// =============================================================================

/// Ledger stub bound to one in-flight transaction.
#[derive(Debug)]
pub struct MemoryStub<'a> {
    ledger: &'a InMemoryLedger,
    tx_id: String,
    timestamp: LedgerTimestamp,
    /// Pending writes; `None` marks a delete.
    writes: RefCell<BTreeMap<String, Option<Vec<u8>>>>,
}

impl MemoryStub<'_> {
    /// Number of keys written so far in this transaction.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl LedgerStub for MemoryStub<'_> {
    type History = MemoryHistory;

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> LedgerTimestamp {
        self.timestamp
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.ledger.check_fault(LedgerFault::GetState)?;
        if let Some(pending) = self.writes.borrow().get(key) {
            return Ok(pending.clone());
        }
        self.ledger.committed(key)
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.ledger.check_fault(LedgerFault::PutState)?;
        if key.is_empty() {
            return Err(LedgerError::InvalidKey(key.to_string()));
        }
        self.writes.borrow_mut().insert(key.to_string(), Some(value));
        Ok(())
    }

    fn get_history_for_key(&self, key: &str) -> Result<Self::History, LedgerError> {
        self.ledger.check_fault(LedgerFault::HistoryOpen)?;
        let versions = self
            .ledger
            .history
            .read()
            .map_err(poisoned)?
            .get(key)
            .cloned()
            .unwrap_or_default();
        let fail_after = self.ledger.history_fault()?;

        self.ledger.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryHistory {
            versions: versions.into_iter(),
            yielded: 0,
            fail_after,
            closed: false,
            open_cursors: Arc::clone(&self.ledger.open_cursors),
        })
    }
}

// =============================================================================
// HISTORY CURSOR
// =============================================================================

/// Snapshot cursor over committed versions of one key.
///
/// Not closed on drop, so a leaked cursor stays visible in
/// [`InMemoryLedger::open_cursors`].
#[derive(Debug)]
pub struct MemoryHistory {
    versions: std::vec::IntoIter<KeyModification>,
    yielded: usize,
    fail_after: Option<usize>,
    closed: bool,
    open_cursors: Arc<AtomicUsize>,
}

impl Iterator for MemoryHistory {
    type Item = Result<KeyModification, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return Some(Err(LedgerError::IteratorClosed));
        }
        if self.fail_after == Some(self.yielded) {
            return Some(Err(LedgerError::Unavailable(
                "history stream interrupted".to_string(),
            )));
        }
        let version = self.versions.next()?;
        self.yielded += 1;
        Some(Ok(version))
    }
}

impl HistoryQueryIterator for MemoryHistory {
    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// =============================================================================
// IDENTITY AND CONTEXT
// =============================================================================

/// Client identity taken from the proposal creator.
#[derive(Clone, Debug)]
pub struct ProposalIdentity {
    msp_id: Option<String>,
}

impl ClientIdentity for ProposalIdentity {
    fn msp_id(&self) -> Result<String, IdentityError> {
        self.msp_id.clone().ok_or(IdentityError::MissingCreator)
    }
}

/// Transaction context for one in-memory invocation.
#[derive(Debug)]
pub struct MemoryTxContext<'a> {
    stub: MemoryStub<'a>,
    identity: ProposalIdentity,
}

impl<'a> TransactionContext for MemoryTxContext<'a> {
    type Stub = MemoryStub<'a>;
    type Identity = ProposalIdentity;

    fn stub(&self) -> &Self::Stub {
        &self.stub
    }

    fn client_identity(&self) -> &Self::Identity {
        &self.identity
    }
}

// =============================================================================
// TESTS
// =============================================================================
