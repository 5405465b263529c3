//! Balance delta calculations.
//!
//! Deltas are signed per the account's normal side:
//! - Debit-normal (Asset, Expense): delta = debit - credit
//! - Credit-normal (Liability, Equity, Revenue): delta = credit - debit

use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use crate::journal::{JournalEntry, JournalLine};
use crate::registry::NormalSide;

/// Calculates the balance change a single line causes on its account.
#[must_use]
pub fn line_delta(normal_side: NormalSide, line: &JournalLine) -> Decimal {
    match normal_side {
        NormalSide::Debit => line.debit - line.credit,
        NormalSide::Credit => line.credit - line.debit,
    }
}

/// Merges an entry's lines into one delta per account.
///
/// The result is sorted by account id so callers acquire per-account locks
/// in a deterministic order.
#[must_use]
pub fn entry_deltas<F>(entry: &JournalEntry, normal_side_of: F) -> Vec<(AccountId, Decimal)>
where
    F: Fn(AccountId) -> NormalSide,
{
    let mut merged: Vec<(AccountId, Decimal)> = Vec::new();

    for line in &entry.lines {
        let delta = line_delta(normal_side_of(line.account_id), line);
        match merged.iter_mut().find(|(id, _)| *id == line.account_id) {
            Some((_, total)) => *total += delta,
            None => merged.push((line.account_id, delta)),
        }
    }

    merged.sort_by_key(|(id, _)| *id);
    merged
}

/// Recomputes an account's balance from scratch over posted lines.
///
/// Used by reconciliation only; normal reads come from stored balances.
#[must_use]
pub fn recompute_balance<'a, I>(normal_side: NormalSide, lines: I) -> Decimal
where
    I: IntoIterator<Item = &'a JournalLine>,
{
    lines
        .into_iter()
        .map(|line| line_delta(normal_side, line))
        .sum()
}
