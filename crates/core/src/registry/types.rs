//! Account domain types for the chart of accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CompanyId};

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, inventory).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    ///
    /// Asset and Expense accounts are debit-normal; Liability, Equity and
    /// Revenue accounts are credit-normal.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalSide::Credit,
        }
    }

    /// Returns the string representation of the account type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

/// The side on which an account's balance normally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

/// An account in the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Company this account belongs to.
    pub company_id: CompanyId,
    /// Account code, unique per company (e.g. "1000").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Parent account, if any. Resolved by id, never an object graph.
    pub parent_id: Option<AccountId>,
    /// Whether the account accepts new activity.
    pub is_active: bool,
    /// Whether journal lines may post directly to this account.
    /// Only leaf accounts are postable; acquiring a child clears this.
    pub is_postable: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns the normal balance side for this account.
    #[must_use]
    pub const fn normal_side(&self) -> NormalSide {
        self.account_type.normal_side()
    }
}

/// Input for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Company the account belongs to.
    pub company_id: CompanyId,
    /// Account code, unique per company.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Filter by postable flag.
    pub is_postable: Option<bool>,
    /// Filter by parent account.
    pub parent_id: Option<AccountId>,
}

impl AccountFilter {
    /// Returns true if the account matches every set filter field.
    #[must_use]
    pub fn matches(&self, account: &Account) -> bool {
        self.account_type
            .is_none_or(|t| account.account_type == t)
            && self.is_active.is_none_or(|a| account.is_active == a)
            && self.is_postable.is_none_or(|p| account.is_postable == p)
            && self
                .parent_id
                .is_none_or(|p| account.parent_id == Some(p))
    }
}
