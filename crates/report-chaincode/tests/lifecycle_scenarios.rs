//! # Lifecycle Scenarios for the Report Chaincode
//!
//! End-to-end runs through the raw invocation surface against the
//! in-memory ledger.
//!
//! ## Test Categories
//!
//! 1. **Happy Path** - full lifecycle and audit trail
//! 2. **Authorization Attacks** - wrong organization, missing attestation
//! 3. **Atomicity** - failed transitions leave no trace
//! 4. **History Cursor Hygiene** - cursors released on every path

use report_chaincode::prelude::*;
use std::cell::Cell;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Network {
    ledger: InMemoryLedger,
    contract: ReportContract,
    clock: Cell<i64>,
}

impl Network {
    fn new() -> Self {
        Self::with_config(ContractConfig::default())
    }

    fn with_config(config: ContractConfig) -> Self {
        init_tracing();
        Self {
            ledger: InMemoryLedger::new(),
            contract: ReportContract::new(config),
            clock: Cell::new(0),
        }
    }

    fn proposal(&self, msp: Option<&str>) -> TxProposal {
        let tick = self.clock.get() + 1;
        self.clock.set(tick);
        let proposal = TxProposal::new(format!("tx-{tick:04}"), LedgerTimestamp::new(1_700_000_000 + tick, 500));
        match msp {
            Some(msp) => proposal.with_creator(msp),
            None => proposal,
        }
    }

    fn submit(&self, msp: Option<&str>, function: &str, args: &[&str]) -> Result<Vec<u8>, ContractError> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        self.ledger
            .submit(self.proposal(msp), |ctx| invoke(&self.contract, ctx, function, &args))
    }

    fn query(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, ContractError> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        self.ledger
            .evaluate(self.proposal(None), |ctx| invoke(&self.contract, ctx, function, &args))
    }

    fn exists(&self, id: &str) -> bool {
        self.query("ReportExists", &[id]).unwrap() == b"true"
    }

    fn history(&self, id: &str) -> Vec<serde_json::Value> {
        let bytes = self.query("GetHistory", &[id]).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn current(&self, id: &str) -> Report {
        let bytes = self.ledger.committed(id).unwrap().unwrap();
        decode_report(id, &bytes).unwrap()
    }
}

const SUBMITTER: Option<&str> = Some(msp_ids::SUBMITTER);
const COORDINATOR: Option<&str> = Some(msp_ids::COORDINATOR);
const OUTSIDER: Option<&str> = Some("Org3MSP");

// =============================================================================
// HAPPY PATH
// =============================================================================

#[test]
fn test_full_lifecycle_r1() {
    let net = Network::new();

    net.submit(SUBMITTER, "CreateReport", &["R1", "pothole on Main St", "alice", "hash123"])
        .unwrap();
    let report = net.current("R1");
    assert_eq!(report.status, STATUS_SUBMITTED);
    assert_eq!(report.assigned_to, "");

    net.submit(COORDINATOR, "AssignAgency", &["R1", "RoadDept"]).unwrap();
    let report = net.current("R1");
    assert_eq!(report.status, STATUS_ASSIGNED);
    assert_eq!(report.assigned_to, "RoadDept");

    net.submit(OUTSIDER, "UpdateStatus", &["R1", "Resolved"]).unwrap();
    let report = net.current("R1");
    assert_eq!(report.status, "Resolved");
    assert_eq!(report.assigned_to, "RoadDept");
    assert_eq!(report.description, "pothole on Main St");
    assert_eq!(report.reporter, "alice");
    assert_eq!(report.evidence_hash, "hash123");

    let history = net.history("R1");
    assert_eq!(history.len(), 3);
    let statuses: Vec<_> = history.iter().map(|e| e["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, ["Submitted", "Assigned", "Resolved"]);
    assert_eq!(history[0]["TxId"], "tx-0001");
    assert_eq!(history[2]["TxId"], "tx-0003");
    assert_eq!(history[0]["Timestamp"]["seconds"], 1_700_000_001_i64);
    assert_eq!(history[0]["Timestamp"]["nanos"], 500);
    assert_eq!(net.ledger.open_cursors(), 0);
}

#[test]
fn test_history_entries_carry_distinct_tx_ids() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();
    for i in 0..5 {
        let status = format!("step-{i}");
        net.submit(None, "UpdateStatus", &["R1", status.as_str()])
            .unwrap();
    }

    let history = net.history("R1");
    assert_eq!(history.len(), 6);
    let mut tx_ids: Vec<_> = history.iter().map(|e| e["TxId"].as_str().unwrap()).collect();
    let ordered = tx_ids.clone();
    tx_ids.dedup();
    assert_eq!(tx_ids.len(), 6);
    assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(history[5]["status"], "step-4");
}

#[test]
fn test_unknown_key_has_empty_history() {
    let net = Network::new();
    assert_eq!(net.query("GetHistory", &["ghost"]).unwrap(), b"[]".to_vec());
    assert!(!net.exists("ghost"));
}

#[test]
fn test_status_may_repeat_and_regress() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();
    net.submit(None, "UpdateStatus", &["R1", "Submitted"]).unwrap();
    net.submit(None, "UpdateStatus", &["R1", "Submitted"]).unwrap();
    assert_eq!(net.history("R1").len(), 3);
    assert_eq!(net.current("R1").assigned_to, "");
}

// =============================================================================
// AUTHORIZATION ATTACKS
// =============================================================================

#[test]
fn test_create_from_wrong_org_r2() {
    let net = Network::new();

    let err = net
        .submit(COORDINATOR, "CreateReport", &["R2", "d", "r", "e"])
        .unwrap_err();
    assert_eq!(err.code(), "NOT_AUTHORIZED");
    assert!(!net.exists("R2"));
    assert!(net.history("R2").is_empty());
}

#[test]
fn test_unauthorized_create_does_not_reveal_or_touch_existing() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "alice", "e"]).unwrap();

    let err = net
        .submit(OUTSIDER, "CreateReport", &["R1", "forged", "mallory", "x"])
        .unwrap_err();
    assert!(matches!(err, ContractError::NotAuthorized { .. }));
    assert_eq!(net.current("R1").reporter, "alice");
    assert_eq!(net.ledger.version_count("R1"), 1);
}

#[test]
fn test_submitter_cannot_assign() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();

    let err = net.submit(SUBMITTER, "AssignAgency", &["R1", "Self"]).unwrap_err();
    assert_eq!(
        err,
        ContractError::NotAuthorized {
            transition: Transition::AssignAgency
        }
    );
    assert_eq!(net.current("R1").assigned_to, "");
}

#[test]
fn test_missing_attestation_on_gated_transition() {
    let net = Network::new();
    let err = net.submit(None, "CreateReport", &["R1", "d", "r", "e"]).unwrap_err();
    assert!(matches!(err, ContractError::IdentityUnavailable(_)));
    assert!(err.is_substrate_failure());
}

#[test]
fn test_coordinator_only_status_updates() {
    let config = ContractConfig::from_json(r#"{"status_update_policy":"coordinator_only"}"#).unwrap();
    let net = Network::with_config(config);
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();

    let err = net.submit(SUBMITTER, "UpdateStatus", &["R1", "Closed"]).unwrap_err();
    assert_eq!(err.code(), "NOT_AUTHORIZED");
    let err = net.submit(None, "UpdateStatus", &["R1", "Closed"]).unwrap_err();
    assert_eq!(err.code(), "IDENTITY_UNAVAILABLE");

    net.submit(COORDINATOR, "UpdateStatus", &["R1", "Closed"]).unwrap();
    assert_eq!(net.current("R1").status, "Closed");
}

#[test]
fn test_custom_organizations() {
    let config = ContractConfig::from_json(
        r#"{"submitter_msp":"CitizenMSP","coordinator_msp":"CityHallMSP"}"#,
    )
    .unwrap();
    let net = Network::with_config(config);

    assert!(net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).is_err());
    net.submit(Some("CitizenMSP"), "CreateReport", &["R1", "d", "r", "e"])
        .unwrap();
    net.submit(Some("CityHallMSP"), "AssignAgency", &["R1", "Parks"])
        .unwrap();
    assert_eq!(net.current("R1").assigned_to, "Parks");
}

// =============================================================================
// ATOMICITY
// =============================================================================

#[test]
fn test_duplicate_create() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "first", "r", "e"]).unwrap();

    let err = net
        .submit(SUBMITTER, "CreateReport", &["R1", "second", "r", "e"])
        .unwrap_err();
    assert_eq!(err.code(), "ALREADY_EXISTS");
    assert_eq!(net.current("R1").description, "first");
    assert_eq!(net.history("R1").len(), 1);
}

#[test]
fn test_mutations_on_missing_key_leave_no_history() {
    let net = Network::new();

    let err = net.submit(COORDINATOR, "AssignAgency", &["R9", "RoadDept"]).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
    let err = net.submit(None, "UpdateStatus", &["R9", "Resolved"]).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");

    assert!(!net.exists("R9"));
    assert_eq!(net.ledger.version_count("R9"), 0);
}

#[test]
fn test_store_outage_commits_nothing() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();

    net.ledger.inject_fault(Some(LedgerFault::GetState));
    let err = net.submit(COORDINATOR, "AssignAgency", &["R1", "RoadDept"]).unwrap_err();
    assert_eq!(err.code(), "STORE_UNAVAILABLE");
    net.ledger.inject_fault(None);

    assert_eq!(net.current("R1").status, STATUS_SUBMITTED);
    assert_eq!(net.ledger.version_count("R1"), 1);
}

#[test]
fn test_corrupted_record_is_reported_not_repaired() {
    let net = Network::new();
    net.ledger
        .seed("R1", b"not json".to_vec(), TxProposal::new("seed", LedgerTimestamp::new(1, 0)))
        .unwrap();

    let err = net.submit(None, "UpdateStatus", &["R1", "Resolved"]).unwrap_err();
    assert_eq!(err.code(), "MALFORMED_RECORD");
    assert_eq!(net.ledger.committed("R1").unwrap(), Some(b"not json".to_vec()));

    let err = net.query("GetHistory", &["R1"]).unwrap_err();
    assert_eq!(err.code(), "MALFORMED_RECORD");
    assert_eq!(net.ledger.open_cursors(), 0);
}

#[test]
fn test_bad_invocations() {
    let net = Network::new();
    let err = net.submit(SUBMITTER, "DeleteReport", &["R1"]).unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_FUNCTION");
    let err = net.submit(SUBMITTER, "CreateReport", &["R1", "d"]).unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
    let err = net.submit(SUBMITTER, "CreateReport", &["", "d", "r", "e"]).unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGUMENT");
    assert_eq!(net.ledger.version_count(""), 0);
}

// =============================================================================
// HISTORY CURSOR HYGIENE
// =============================================================================

#[test]
fn test_history_survives_tombstone() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();
    net.ledger
        .delete("R1", TxProposal::new("purge", LedgerTimestamp::new(2_000_000_000, 0)))
        .unwrap();

    assert!(!net.exists("R1"));
    let history = net.history("R1");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["Deleted"], true);
    assert_eq!(history[1]["TxId"], "purge");
    assert_eq!(net.ledger.open_cursors(), 0);
}

#[test]
fn test_history_outage_releases_cursor() {
    let net = Network::new();
    net.submit(SUBMITTER, "CreateReport", &["R1", "d", "r", "e"]).unwrap();
    net.submit(COORDINATOR, "AssignAgency", &["R1", "RoadDept"]).unwrap();

    net.ledger.inject_fault(Some(LedgerFault::HistoryNext { after: 1 }));
    let err = net.query("GetHistory", &["R1"]).unwrap_err();
    assert_eq!(err.code(), "HISTORY_UNAVAILABLE");
    assert_eq!(net.ledger.open_cursors(), 0);

    net.ledger.inject_fault(Some(LedgerFault::HistoryOpen));
    let err = net.query("GetHistory", &["R1"]).unwrap_err();
    assert_eq!(err.code(), "HISTORY_UNAVAILABLE");
    assert_eq!(net.ledger.open_cursors(), 0);
}
