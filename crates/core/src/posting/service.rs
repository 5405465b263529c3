//! Posting state machine transitions.
//!
//! All transitions are pure: they take the current entry by reference and
//! return the updated entry, leaving persistence and audit emission to the
//! caller. Retrying a transition whose target status has already been
//! reached yields [`Transition::AlreadyDone`], so at-least-once retries
//! never mutate twice.

use chrono::{DateTime, Utc};
use tally_shared::types::ActorId;

use super::error::StateError;
use crate::journal::{EntryStatus, JournalEntry};

/// Outcome of a transition attempt.
#[derive(Debug, Clone)]
pub enum Transition {
    /// The transition applies: persist this updated entry.
    Applied(JournalEntry),
    /// The entry already reached the target status; nothing to persist.
    AlreadyDone,
}

/// Stateless service for posting lifecycle transitions.
///
/// The state machine is the only component that may change
/// `JournalEntry.status`; it never regresses a status.
pub struct PostingService;

impl PostingService {
    /// Approve a draft entry.
    ///
    /// Requires `actor != entry.created_by` (segregation of duties).
    ///
    /// # Errors
    ///
    /// Returns `StateError::SelfApproval` if the creator approves their own
    /// entry, or `StateError::NotDraft` if the entry cannot be approved.
    pub fn approve(
        entry: &JournalEntry,
        actor: ActorId,
        now: DateTime<Utc>,
    ) -> Result<Transition, StateError> {
        match entry.status {
            EntryStatus::Draft => {
                if actor == entry.created_by {
                    return Err(StateError::SelfApproval {
                        entry_id: entry.id,
                        actor,
                    });
                }
                let mut updated = entry.clone();
                updated.status = EntryStatus::Approved;
                updated.approved_by = Some(actor);
                updated.approved_at = Some(now);
                Ok(Transition::Applied(updated))
            }
            // Approval already happened; idempotent under retry.
            EntryStatus::Approved | EntryStatus::Posted => Ok(Transition::AlreadyDone),
            EntryStatus::Voided => Err(StateError::NotDraft {
                entry_id: entry.id,
                status: entry.status,
            }),
        }
    }

    /// Post an approved entry, stamping the assigned posting sequence.
    ///
    /// The caller assigns `posting_sequence` (next gap-free value for the
    /// company) and must apply the balance delta in the same atomic unit.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotApproved` if the entry is not approved.
    pub fn post(
        entry: &JournalEntry,
        actor: ActorId,
        posting_sequence: u64,
        now: DateTime<Utc>,
    ) -> Result<Transition, StateError> {
        match entry.status {
            EntryStatus::Approved => {
                let mut updated = entry.clone();
                updated.status = EntryStatus::Posted;
                updated.posted_by = Some(actor);
                updated.posted_at = Some(now);
                updated.posting_sequence = Some(posting_sequence);
                Ok(Transition::Applied(updated))
            }
            EntryStatus::Posted => Ok(Transition::AlreadyDone),
            EntryStatus::Draft | EntryStatus::Voided => Err(StateError::NotApproved {
                entry_id: entry.id,
                status: entry.status,
            }),
        }
    }

    /// Void a draft or approved entry.
    ///
    /// Posting is terminal: a posted entry can only be undone via a
    /// reversal entry, never voided.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotDraftOrApproved` if the entry is posted.
    pub fn void(
        entry: &JournalEntry,
        now: DateTime<Utc>,
    ) -> Result<Transition, StateError> {
        match entry.status {
            EntryStatus::Draft | EntryStatus::Approved => {
                let mut updated = entry.clone();
                updated.status = EntryStatus::Voided;
                updated.voided_at = Some(now);
                Ok(Transition::Applied(updated))
            }
            EntryStatus::Voided => Ok(Transition::AlreadyDone),
            EntryStatus::Posted => Err(StateError::NotDraftOrApproved {
                entry_id: entry.id,
                status: entry.status,
            }),
        }
    }

    /// Check if a status transition is legal.
    ///
    /// Legal transitions:
    /// - Draft → Approved (approve)
    /// - Approved → Posted (post)
    /// - Draft → Voided, Approved → Voided (void)
    #[must_use]
    pub fn is_valid_transition(from: EntryStatus, to: EntryStatus) -> bool {
        matches!(
            (from, to),
            (EntryStatus::Draft, EntryStatus::Approved | EntryStatus::Voided)
                | (EntryStatus::Approved, EntryStatus::Posted | EntryStatus::Voided)
        )
    }
}
