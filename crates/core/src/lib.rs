//! Core posting engine logic for Tally.
//!
//! This crate contains pure business logic with ZERO storage dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `registry` - Chart of accounts and account hierarchy rules
//! - `journal` - Journal entries and double-entry validation
//! - `posting` - Entry lifecycle state machine and reversals
//! - `balance` - Account balance deltas and reconciliation
//! - `audit` - Immutable audit trail records

pub mod audit;
pub mod balance;
pub mod journal;
pub mod posting;
pub mod registry;
