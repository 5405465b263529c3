//! Balance engine error types.

use tally_shared::types::{CompanyId, EntryId};
use thiserror::Error;

/// Errors that can occur while applying postings to balances.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The posting sequence has already been applied.
    #[error("Posting sequence {sequence} for entry {entry_id} was already applied")]
    AlreadyApplied {
        /// The entry.
        entry_id: EntryId,
        /// Its posting sequence.
        sequence: u64,
    },

    /// The posting sequence does not extend the company's high-water mark.
    /// Retryable: another posting won the race.
    #[error("Sequence conflict for company {company_id}: expected {expected}, got {actual}")]
    SequenceConflict {
        /// The company.
        company_id: CompanyId,
        /// The expected next sequence.
        expected: u64,
        /// The sequence actually presented.
        actual: u64,
    },

    /// The entry carries no posting sequence. Posted entries always carry
    /// one; seeing this means the stored data is corrupt.
    #[error("Entry {0} has no posting sequence")]
    MissingSequence(EntryId),
}

impl BalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyApplied { .. } => "ALREADY_APPLIED",
            Self::SequenceConflict { .. } => "SEQUENCE_CONFLICT",
            Self::MissingSequence(_) => "MISSING_SEQUENCE",
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SequenceConflict { .. })
    }
}
