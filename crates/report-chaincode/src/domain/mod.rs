//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the report lifecycle.
//! NO I/O, NO ledger access, NO clock.
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod codec;
pub mod entities;
pub mod invariants;
pub mod policy;

pub use codec::*;
pub use entities::*;
pub use invariants::*;
pub use policy::*;
