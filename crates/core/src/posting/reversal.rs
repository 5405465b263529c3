//! Reversal drafts for posted entries.
//!
//! A posted entry is never mutated. To undo its effect, a new draft entry
//! is created with every line's debit and credit swapped; it then walks the
//! normal Draft → Approved → Posted path.

use chrono::{DateTime, NaiveDate, Utc};
use tally_shared::types::{ActorId, EntryId};

use super::error::StateError;
use crate::journal::{EntryStatus, JournalEntry, JournalLine};

/// Stateless service for building reversal drafts.
pub struct ReversalService;

impl ReversalService {
    /// Build a reversal draft for a posted entry.
    ///
    /// The draft carries swapped lines, `reverses_entry_id` pointing at the
    /// original, and the original's `correlation_id` so the audit trail of
    /// both entries is tied together.
    ///
    /// # Errors
    ///
    /// Returns `StateError::NotPosted` if the original is not posted.
    pub fn build(
        original: &JournalEntry,
        actor: ActorId,
        entry_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, StateError> {
        if original.status != EntryStatus::Posted {
            return Err(StateError::NotPosted {
                entry_id: original.id,
                status: original.status,
            });
        }

        let lines: Vec<JournalLine> = original.lines.iter().map(JournalLine::swapped).collect();

        Ok(JournalEntry {
            id: EntryId::new(),
            company_id: original.company_id,
            entry_date,
            description: format!("Reversal of {}", original.description),
            status: EntryStatus::Draft,
            lines,
            created_by: actor,
            approved_by: None,
            posted_by: None,
            posting_sequence: None,
            reverses_entry_id: Some(original.id),
            correlation_id: original.correlation_id,
            created_at: now,
            approved_at: None,
            posted_at: None,
            voided_at: None,
        })
    }
}
