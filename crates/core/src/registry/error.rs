//! Registry error types for chart of accounts operations.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use thiserror::Error;

use super::types::AccountType;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Account code already exists for this company.
    #[error("Account code {0} already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Parent account belongs to a different company.
    #[error("Parent account {0} belongs to a different company")]
    ParentCompanyMismatch(AccountId),

    /// Parent account is inactive.
    #[error("Parent account {0} is inactive")]
    ParentInactive(AccountId),

    /// Parent account has a different account type.
    #[error("Parent account {parent_id} is {parent_type:?}, child must match")]
    InvalidParentType {
        /// The parent account.
        parent_id: AccountId,
        /// The parent's account type.
        parent_type: AccountType,
        /// The child's account type.
        child_type: AccountType,
    },

    /// The parent chain contains a cycle.
    #[error("Account hierarchy contains a cycle at {0}")]
    CyclicHierarchy(AccountId),

    /// Parent account already carries posted balances and cannot be
    /// turned into a summary account.
    #[error("Parent account {0} has posted balances and cannot become a summary account")]
    ParentHasPostings(AccountId),

    /// Account has unposted drafts referencing it.
    #[error("Account {account_id} is referenced by {count} unposted entries")]
    HasOpenDrafts {
        /// The account.
        account_id: AccountId,
        /// Number of Draft/Approved entries referencing it.
        count: usize,
    },

    /// Account balance is not zero.
    #[error("Account {account_id} has nonzero balance {balance}")]
    NonZeroBalance {
        /// The account.
        account_id: AccountId,
        /// The current balance.
        balance: Decimal,
    },
}

impl RegistryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentCompanyMismatch(_) => "PARENT_COMPANY_MISMATCH",
            Self::ParentInactive(_) => "PARENT_INACTIVE",
            Self::InvalidParentType { .. } => "INVALID_PARENT_TYPE",
            Self::CyclicHierarchy(_) => "CYCLIC_HIERARCHY",
            Self::ParentHasPostings(_) => "PARENT_HAS_POSTINGS",
            Self::HasOpenDrafts { .. } => "HAS_OPEN_DRAFTS",
            Self::NonZeroBalance { .. } => "NON_ZERO_BALANCE",
        }
    }
}
