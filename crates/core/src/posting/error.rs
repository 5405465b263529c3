//! State machine error types for the posting lifecycle.

use tally_shared::types::{ActorId, EntryId};
use thiserror::Error;

use crate::journal::{EntryStatus, ValidationError};

/// Errors that can occur during posting lifecycle transitions.
#[derive(Debug, Error)]
pub enum StateError {
    /// Entry is not in Draft status.
    #[error("Entry {entry_id} is {status}, expected draft")]
    NotDraft {
        /// The entry.
        entry_id: EntryId,
        /// Its current status.
        status: EntryStatus,
    },

    /// Entry is not in Approved status.
    #[error("Entry {entry_id} is {status}, expected approved")]
    NotApproved {
        /// The entry.
        entry_id: EntryId,
        /// Its current status.
        status: EntryStatus,
    },

    /// Entry is neither Draft nor Approved.
    #[error("Entry {entry_id} is {status}, only draft or approved entries can be voided")]
    NotDraftOrApproved {
        /// The entry.
        entry_id: EntryId,
        /// Its current status.
        status: EntryStatus,
    },

    /// Entry is not Posted (reversal requires a posted entry).
    #[error("Entry {entry_id} is {status}, only posted entries can be reversed")]
    NotPosted {
        /// The entry.
        entry_id: EntryId,
        /// Its current status.
        status: EntryStatus,
    },

    /// The creator of an entry may not approve it.
    #[error("Actor {actor} created entry {entry_id} and cannot approve it")]
    SelfApproval {
        /// The entry.
        entry_id: EntryId,
        /// The actor attempting the approval.
        actor: ActorId,
    },

    /// Re-validation failed against current account state.
    #[error("Entry {entry_id} no longer validates: {source}")]
    StaleValidation {
        /// The entry.
        entry_id: EntryId,
        /// The underlying validation failure.
        #[source]
        source: ValidationError,
    },
}

impl StateError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotDraft { .. } => "NOT_DRAFT",
            Self::NotApproved { .. } => "NOT_APPROVED",
            Self::NotDraftOrApproved { .. } => "NOT_DRAFT_OR_APPROVED",
            Self::NotPosted { .. } => "NOT_POSTED",
            Self::SelfApproval { .. } => "SELF_APPROVAL",
            Self::StaleValidation { .. } => "STALE_VALIDATION",
        }
    }
}
