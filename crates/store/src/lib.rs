//! Transactional store and posting engine orchestration for Tally.
//!
//! This crate wires the pure logic from `tally-core` to a transactional
//! in-memory store. Every mutating operation runs inside one atomic unit
//! of work: status flips, sequence assignment, balance updates and audit
//! records commit together or not at all.
//!
//! # Modules
//!
//! - `memory` - The in-memory store with staged, serialized transactions
//! - `ledger` - The mutating operation surface (`Ledger`)
//! - `query` - The read-only query facade (`LedgerQueries`)
//! - `authorize` - The authorization port consumed before every mutation
//! - `error` - The aggregated error taxonomy

pub mod authorize;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod query;

pub use authorize::{AllowAll, Authorizer, DenyAll, LedgerAction};
pub use error::LedgerError;
pub use ledger::Ledger;
pub use memory::MemoryStore;
pub use query::LedgerQueries;
