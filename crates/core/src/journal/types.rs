//! Journal entry domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, ActorId, CompanyId, CorrelationId, EntryId};

/// Journal entry status in the posting lifecycle.
///
/// Entries progress monotonically: Draft → Approved → Posted, with
/// Draft/Approved → Voided as the only other legal exits. Posted is
/// terminal; corrections happen via reversal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted.
    Draft,
    /// Entry has been approved and is ready for posting.
    Approved,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry was discarded before posting (immutable).
    Voided,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Posted => "posted",
            Self::Voided => "voided",
        }
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Posted | Self::Voided)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line in a journal entry.
///
/// Exactly one of `debit` and `credit` is strictly positive; the other is
/// zero. The currency code is carried per line (no translation applied).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Debit amount (zero if this is a credit line).
    pub debit: Decimal,
    /// Credit amount (zero if this is a debit line).
    pub credit: Decimal,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Optional description for this line.
    pub description: Option<String>,
}

impl JournalLine {
    /// Returns the raw signed amount of this line (debit minus credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns a copy of this line with debit and credit swapped.
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
            currency: self.currency.clone(),
            description: self.description.clone(),
        }
    }
}

/// A journal entry: a balanced set of lines moving through the posting
/// lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Company this entry belongs to.
    pub company_id: CompanyId,
    /// Effective date of the entry.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Current lifecycle status.
    pub status: EntryStatus,
    /// The entry lines (at least 2).
    pub lines: Vec<JournalLine>,
    /// Actor who created the entry.
    pub created_by: ActorId,
    /// Actor who approved the entry, once approved.
    pub approved_by: Option<ActorId>,
    /// Actor who posted the entry, once posted.
    pub posted_by: Option<ActorId>,
    /// Per-company posting sequence, assigned only on Post.
    pub posting_sequence: Option<u64>,
    /// The posted entry this entry reverses, if it is a reversal.
    pub reverses_entry_id: Option<EntryId>,
    /// Correlation ID shared by an entry and its reversals.
    pub correlation_id: CorrelationId,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// When the entry was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debits() == self.total_credits()
    }
}

/// Input for a single line of a new journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (zero if credit line).
    pub debit: Decimal,
    /// Credit amount (zero if debit line).
    pub credit: Decimal,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Optional line description.
    pub description: Option<String>,
}

/// Input for creating a new journal entry draft.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Company the entry belongs to.
    pub company_id: CompanyId,
    /// Effective date of the entry.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// The entry lines (must have at least 2).
    pub lines: Vec<NewJournalLine>,
}
