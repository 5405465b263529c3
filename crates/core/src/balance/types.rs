//! Balance domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use crate::registry::NormalSide;

/// An account balance as of a date.
///
/// Owned exclusively by the balance engine. Rebuildable by replaying
/// posted entries; never hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// The date this balance row covers.
    pub as_of_date: NaiveDate,
    /// The balance, signed per the account's normal side.
    pub balance: Decimal,
    /// The posting sequence of the last entry applied to this row.
    pub last_applied_sequence: u64,
}

/// A single row of a trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// The account's normal side.
    pub normal_side: NormalSide,
    /// The balance, signed per normal side.
    pub balance: Decimal,
}

impl TrialBalanceRow {
    /// Returns this row's contribution in raw debit-minus-credit terms.
    #[must_use]
    pub fn raw_amount(&self) -> Decimal {
        match self.normal_side {
            NormalSide::Debit => self.balance,
            NormalSide::Credit => -self.balance,
        }
    }
}

/// A trial balance: every postable account's balance as of a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// The as-of date.
    pub as_of_date: NaiveDate,
    /// One row per postable account, ordered by account code.
    pub rows: Vec<TrialBalanceRow>,
}

impl TrialBalance {
    /// Total of all debit-normal column amounts.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.rows
            .iter()
            .map(TrialBalanceRow::raw_amount)
            .filter(|a| *a > Decimal::ZERO)
            .sum()
    }

    /// Total of all credit-normal column amounts (as a positive number).
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        -self
            .rows
            .iter()
            .map(TrialBalanceRow::raw_amount)
            .filter(|a| *a < Decimal::ZERO)
            .sum::<Decimal>()
    }

    /// Net of all rows in raw debit-minus-credit terms.
    ///
    /// A consistent ledger always nets to zero.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.rows.iter().map(TrialBalanceRow::raw_amount).sum()
    }
}

/// A reconciliation mismatch between the stored balance and the balance
/// recomputed from posted lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discrepancy {
    /// The account.
    pub account_id: AccountId,
    /// The stored balance.
    pub stored: Decimal,
    /// The balance recomputed from scratch.
    pub computed: Decimal,
}

impl Discrepancy {
    /// The difference between stored and computed balances.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.stored - self.computed
    }
}
