//! Account balance calculations.
//!
//! This module implements the pure half of the balance engine:
//! - Sign-adjusted balance deltas per normal side
//! - Per-entry delta merging in deterministic account order
//! - Recomputation from posted lines for reconciliation

pub mod delta;
pub mod error;
pub mod types;

#[cfg(test)]
mod delta_props;

pub use delta::{entry_deltas, line_delta, recompute_balance};
pub use error::BalanceError;
pub use types::{AccountBalance, Discrepancy, TrialBalance, TrialBalanceRow};
