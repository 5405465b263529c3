//! Posting lifecycle state machine.
//!
//! This module drives journal entries through
//! Draft → Approved → Posted (or Draft/Approved → Voided), enforcing
//! transition legality and segregation of duties, and builds reversal
//! drafts for posted entries.

pub mod error;
pub mod reversal;
pub mod service;

#[cfg(test)]
mod service_props;

pub use error::StateError;
pub use reversal::ReversalService;
pub use service::{PostingService, Transition};
