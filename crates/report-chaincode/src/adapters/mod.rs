//! # Adapters Layer (Outer Hexagon)
//!
//! - `record_store`: keyed report access over any [`LedgerStub`](crate::ports::LedgerStub)
//! - `memory_ledger`: in-process ledger implementing the outbound ports

pub mod memory_ledger;
pub mod record_store;

pub use memory_ledger::*;
pub use record_store::*;
