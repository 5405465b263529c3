//! Validation error types for journal entries.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use thiserror::Error;

/// Errors produced by the journal validator.
///
/// The validator is a gate, not a mutator: none of these errors leave any
/// state behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines, got {0}")]
    TooFewLines(usize),

    /// Entry is not balanced (debits != credits).
    #[error("Entry is not balanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// A line must carry exactly one strictly positive side.
    #[error("Line {line} must have exactly one of debit or credit set")]
    ZeroOrDualSidedLine {
        /// Zero-based index of the offending line.
        line: usize,
    },

    /// Line amounts cannot be negative.
    #[error("Line {line} has a negative amount")]
    NegativeAmount {
        /// Zero-based index of the offending line.
        line: usize,
    },

    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Referenced account is inactive.
    #[error("Account {0} is inactive")]
    InactiveAccount(AccountId),

    /// Referenced account does not accept direct postings.
    #[error("Account {0} is not postable")]
    NonPostableAccount(AccountId),

    /// Referenced account belongs to a different company.
    #[error("Account {0} belongs to a different company")]
    CompanyMismatch(AccountId),
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TooFewLines(_) => "TOO_FEW_LINES",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::ZeroOrDualSidedLine { .. } => "ZERO_OR_DUAL_SIDED_LINE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::InactiveAccount(_) => "INACTIVE_ACCOUNT",
            Self::NonPostableAccount(_) => "NON_POSTABLE_ACCOUNT",
            Self::CompanyMismatch(_) => "COMPANY_MISMATCH",
        }
    }
}
