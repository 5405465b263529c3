//! Registry service for chart of accounts rules.
//!
//! This service contains pure business logic with no storage dependencies.
//! The storage layer resolves accounts by id and passes them (or lookup
//! closures) in; no in-memory object graph is ever built.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;

use super::error::RegistryError;
use super::types::{Account, NewAccount};

/// Upper bound on parent chain walks. The hierarchy is validated to be
/// acyclic, so hitting this limit means the stored data is corrupt.
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Registry service for account creation and deactivation rules.
pub struct RegistryService;

impl RegistryService {
    /// Validate a new account against its prospective parent.
    ///
    /// The parent must belong to the same company, be active, and carry the
    /// same account type as the child.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if any parent rule is violated.
    pub fn validate_parent(input: &NewAccount, parent: &Account) -> Result<(), RegistryError> {
        if parent.company_id != input.company_id {
            return Err(RegistryError::ParentCompanyMismatch(parent.id));
        }
        if !parent.is_active {
            return Err(RegistryError::ParentInactive(parent.id));
        }
        if parent.account_type != input.account_type {
            return Err(RegistryError::InvalidParentType {
                parent_id: parent.id,
                parent_type: parent.account_type,
                child_type: input.account_type,
            });
        }
        Ok(())
    }

    /// Walk the parent chain starting from `parent_id` and verify it is
    /// acyclic and of finite depth.
    ///
    /// `parent_of` resolves an account id to its parent id, or `None` for a
    /// root account.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::CyclicHierarchy` if the walk revisits an
    /// account or exceeds the depth bound.
    pub fn ensure_acyclic<F>(parent_id: AccountId, parent_of: F) -> Result<(), RegistryError>
    where
        F: Fn(AccountId) -> Option<AccountId>,
    {
        let mut seen = vec![parent_id];
        let mut current = parent_id;

        for _ in 0..MAX_HIERARCHY_DEPTH {
            match parent_of(current) {
                None => return Ok(()),
                Some(next) => {
                    if seen.contains(&next) {
                        return Err(RegistryError::CyclicHierarchy(next));
                    }
                    seen.push(next);
                    current = next;
                }
            }
        }

        Err(RegistryError::CyclicHierarchy(current))
    }

    /// Validate that an account may be deactivated.
    ///
    /// An account with a nonzero balance or with unposted entries
    /// referencing it cannot be deactivated.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if a deactivation guard trips.
    pub fn validate_deactivate(
        account: &Account,
        current_balance: Decimal,
        open_entry_count: usize,
    ) -> Result<(), RegistryError> {
        if current_balance != Decimal::ZERO {
            return Err(RegistryError::NonZeroBalance {
                account_id: account.id,
                balance: current_balance,
            });
        }
        if open_entry_count > 0 {
            return Err(RegistryError::HasOpenDrafts {
                account_id: account.id,
                count: open_entry_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::types::AccountType;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use tally_shared::types::CompanyId;

    fn make_account(company_id: CompanyId, account_type: AccountType) -> Account {
        Account {
            id: AccountId::new(),
            company_id,
            code: "1000".to_string(),
            name: "Cash".to_string(),
            account_type,
            parent_id: None,
            is_active: true,
            is_postable: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_input(company_id: CompanyId, account_type: AccountType) -> NewAccount {
        NewAccount {
            company_id,
            code: "1010".to_string(),
            name: "Petty cash".to_string(),
            account_type,
            parent_id: None,
        }
    }

    #[test]
    fn test_validate_parent_ok() {
        let company = CompanyId::new();
        let parent = make_account(company, AccountType::Asset);
        let input = make_input(company, AccountType::Asset);
        assert!(RegistryService::validate_parent(&input, &parent).is_ok());
    }

    #[test]
    fn test_validate_parent_company_mismatch() {
        let parent = make_account(CompanyId::new(), AccountType::Asset);
        let input = make_input(CompanyId::new(), AccountType::Asset);
        assert!(matches!(
            RegistryService::validate_parent(&input, &parent),
            Err(RegistryError::ParentCompanyMismatch(_))
        ));
    }

    #[test]
    fn test_validate_parent_type_mismatch() {
        let company = CompanyId::new();
        let parent = make_account(company, AccountType::Revenue);
        let input = make_input(company, AccountType::Asset);
        assert!(matches!(
            RegistryService::validate_parent(&input, &parent),
            Err(RegistryError::InvalidParentType { .. })
        ));
    }

    #[test]
    fn test_validate_parent_inactive() {
        let company = CompanyId::new();
        let mut parent = make_account(company, AccountType::Asset);
        parent.is_active = false;
        let input = make_input(company, AccountType::Asset);
        assert!(matches!(
            RegistryService::validate_parent(&input, &parent),
            Err(RegistryError::ParentInactive(_))
        ));
    }

    #[test]
    fn test_ensure_acyclic_chain() {
        let a = AccountId::new();
        let b = AccountId::new();
        let c = AccountId::new();
        let mut parents = HashMap::new();
        parents.insert(a, b);
        parents.insert(b, c);

        assert!(RegistryService::ensure_acyclic(a, |id| parents.get(&id).copied()).is_ok());
    }

    #[test]
    fn test_ensure_acyclic_detects_cycle() {
        let a = AccountId::new();
        let b = AccountId::new();
        let mut parents = HashMap::new();
        parents.insert(a, b);
        parents.insert(b, a);

        assert!(matches!(
            RegistryService::ensure_acyclic(a, |id| parents.get(&id).copied()),
            Err(RegistryError::CyclicHierarchy(_))
        ));
    }

    #[test]
    fn test_ensure_acyclic_self_parent() {
        let a = AccountId::new();
        assert!(matches!(
            RegistryService::ensure_acyclic(a, |id| Some(id)),
            Err(RegistryError::CyclicHierarchy(_))
        ));
    }

    #[test]
    fn test_validate_deactivate_ok() {
        let account = make_account(CompanyId::new(), AccountType::Asset);
        assert!(RegistryService::validate_deactivate(&account, Decimal::ZERO, 0).is_ok());
    }

    #[test]
    fn test_validate_deactivate_nonzero_balance() {
        let account = make_account(CompanyId::new(), AccountType::Asset);
        assert!(matches!(
            RegistryService::validate_deactivate(&account, dec!(100.00), 0),
            Err(RegistryError::NonZeroBalance { .. })
        ));
    }

    #[test]
    fn test_validate_deactivate_open_drafts() {
        let account = make_account(CompanyId::new(), AccountType::Asset);
        assert!(matches!(
            RegistryService::validate_deactivate(&account, Decimal::ZERO, 2),
            Err(RegistryError::HasOpenDrafts { count: 2, .. })
        ));
    }
}
