//! Immutable audit trail records.
//!
//! Every mutation in the registry, state machine and balance engine is
//! captured as an append-only record in the same atomic unit of work as
//! the mutation itself. Records are never updated or deleted.

pub mod types;

pub use types::{AuditAction, AuditChange, AuditFilter, AuditRecord, EntityType};
