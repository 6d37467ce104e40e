//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the report contract.
//!
//! - **Driving Ports (Inbound)**: `ReportLedgerApi`
//! - **Driven Ports (Outbound)**: `LedgerStub`, `ClientIdentity`, `TransactionContext`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
