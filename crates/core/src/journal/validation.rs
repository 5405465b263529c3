//! Double-entry validation for journal entries.
//!
//! `validate_lines` is a pure gate with no side effects. It runs before a
//! draft is admitted and again immediately before Approve and before Post,
//! so stale account state (an account deactivated after drafting) is caught
//! at every step.

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CompanyId};

use super::error::ValidationError;
use super::types::JournalLine;
use crate::registry::Account;

/// Minimum number of lines in a journal entry.
pub const MIN_LINES: usize = 2;

/// Validates a set of journal lines against double-entry and account
/// eligibility rules.
///
/// Checks performed, in order:
/// 1. At least [`MIN_LINES`] lines
/// 2. Per line: no negative amounts, exactly one strictly positive side
/// 3. Per line: account exists, belongs to `company_id`, is active and
///    postable
/// 4. Total debits equal total credits
///
/// # Errors
///
/// Returns the first `ValidationError` encountered.
pub fn validate_lines<L>(
    company_id: CompanyId,
    lines: &[JournalLine],
    account_lookup: L,
) -> Result<(), ValidationError>
where
    L: Fn(AccountId) -> Option<Account>,
{
    if lines.len() < MIN_LINES {
        return Err(ValidationError::TooFewLines(lines.len()));
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;

    for (index, line) in lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount { line: index });
        }

        let debit_set = line.debit > Decimal::ZERO;
        let credit_set = line.credit > Decimal::ZERO;
        if debit_set == credit_set {
            return Err(ValidationError::ZeroOrDualSidedLine { line: index });
        }

        let account = account_lookup(line.account_id)
            .ok_or(ValidationError::AccountNotFound(line.account_id))?;
        if account.company_id != company_id {
            return Err(ValidationError::CompanyMismatch(line.account_id));
        }
        if !account.is_active {
            return Err(ValidationError::InactiveAccount(line.account_id));
        }
        if !account.is_postable {
            return Err(ValidationError::NonPostableAccount(line.account_id));
        }

        total_debits += line.debit;
        total_credits += line.credit;
    }

    if total_debits != total_credits {
        return Err(ValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}
