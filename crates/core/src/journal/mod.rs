//! Journal entries and double-entry validation.
//!
//! This module implements the journal side of the posting engine:
//! - Journal entry and line domain types
//! - Entry lifecycle status
//! - The pure double-entry validator run before Draft, Approve and Post

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::ValidationError;
pub use types::{EntryStatus, JournalEntry, JournalLine, NewJournalEntry, NewJournalLine};
pub use validation::validate_lines;
