//! Read-only query facade over the store.
//!
//! Reads never block behind an in-flight unit of work for longer than the
//! coarse lock; long scans (trial balance, audit queries) accept an
//! optional [`Deadline`] and abort cleanly when it expires instead of
//! returning partial results.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use tally_core::audit::{AuditFilter, AuditRecord};
use tally_core::balance::{recompute_balance, Discrepancy, TrialBalance, TrialBalanceRow};
use tally_core::journal::{EntryStatus, JournalEntry};
use tally_core::registry::{Account, AccountFilter};
use tally_shared::types::{AccountId, CompanyId, Deadline, EntryId, PageRequest, PageResponse};

use crate::error::LedgerError;
use crate::memory::MemoryStore;

/// Read-only access to accounts, entries, balances and the audit trail.
#[derive(Clone)]
pub struct LedgerQueries {
    store: Arc<MemoryStore>,
}

impl LedgerQueries {
    /// Creates a query facade over the given store.
    #[must_use]
    pub(crate) fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Fetches an account by id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if no such account exists.
    pub fn get_account(&self, account_id: AccountId) -> Result<Account, LedgerError> {
        self.store.read(|state| {
            state
                .accounts
                .get(&account_id)
                .cloned()
                .ok_or(LedgerError::AccountNotFound(account_id))
        })?
    }

    /// Lists a company's accounts matching the filter, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StorePoisoned` if the store lock is poisoned.
    pub fn list_accounts(
        &self,
        company_id: CompanyId,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, LedgerError> {
        self.store.read(|state| {
            let mut accounts: Vec<Account> = state
                .accounts
                .values()
                .filter(|a| a.company_id == company_id && filter.matches(a))
                .cloned()
                .collect();
            accounts.sort_by(|a, b| a.code.cmp(&b.code));
            accounts
        })
    }

    /// Fetches a journal entry by id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EntryNotFound` if no such entry exists.
    pub fn get_entry(&self, entry_id: EntryId) -> Result<JournalEntry, LedgerError> {
        self.store.read(|state| {
            state
                .entries
                .get(&entry_id)
                .cloned()
                .ok_or(LedgerError::EntryNotFound(entry_id))
        })?
    }

    /// Lists a company's journal entries, optionally filtered by status,
    /// ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StorePoisoned` if the store lock is poisoned.
    pub fn list_entries(
        &self,
        company_id: CompanyId,
        status: Option<EntryStatus>,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        self.store.read(|state| {
            let mut entries: Vec<JournalEntry> = state
                .entries
                .values()
                .filter(|e| e.company_id == company_id && status.is_none_or(|s| e.status == s))
                .cloned()
                .collect();
            entries.sort_by_key(|e| (e.created_at, e.id));
            entries
        })
    }

    /// Returns an account's balance as of a date.
    ///
    /// The balance is the most recent stored row at or before the date,
    /// signed per the account's normal side; zero if nothing has been
    /// posted yet.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if no such account exists.
    pub fn balance_as_of(
        &self,
        account_id: AccountId,
        as_of_date: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        self.store.read(|state| {
            if !state.accounts.contains_key(&account_id) {
                return Err(LedgerError::AccountNotFound(account_id));
            }
            Ok(state
                .balances
                .get(&account_id)
                .and_then(|rows| rows.range(..=as_of_date).next_back())
                .map_or(Decimal::ZERO, |(_, row)| row.balance))
        })?
    }

    /// Builds a trial balance: every postable account's balance as of the
    /// date, ordered by account code.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DeadlineExceeded` if the deadline expires
    /// mid-scan.
    pub fn trial_balance(
        &self,
        company_id: CompanyId,
        as_of_date: NaiveDate,
        deadline: Option<Deadline>,
    ) -> Result<TrialBalance, LedgerError> {
        self.store.read(|state| {
            let mut accounts: Vec<&Account> = state
                .accounts
                .values()
                .filter(|a| a.company_id == company_id && a.is_postable)
                .collect();
            accounts.sort_by(|a, b| a.code.cmp(&b.code));

            let mut rows = Vec::with_capacity(accounts.len());
            for account in accounts {
                if deadline.is_some_and(|d| d.expired()) {
                    debug!(%company_id, rows = rows.len(), "trial balance deadline expired");
                    return Err(LedgerError::DeadlineExceeded);
                }
                let balance = state
                    .balances
                    .get(&account.id)
                    .and_then(|r| r.range(..=as_of_date).next_back())
                    .map_or(Decimal::ZERO, |(_, row)| row.balance);
                rows.push(TrialBalanceRow {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    normal_side: account.normal_side(),
                    balance,
                });
            }

            Ok(TrialBalance { as_of_date, rows })
        })?
    }

    /// Checks an account's stored balance against a recomputation from
    /// its posted lines.
    ///
    /// Returns `None` when they agree, or the discrepancy when they do
    /// not.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` if no such account exists.
    pub fn reconcile(&self, account_id: AccountId) -> Result<Option<Discrepancy>, LedgerError> {
        self.store.read(|state| {
            let account = state
                .accounts
                .get(&account_id)
                .ok_or(LedgerError::AccountNotFound(account_id))?;

            let stored = state
                .balances
                .get(&account_id)
                .and_then(|rows| rows.values().next_back())
                .map_or(Decimal::ZERO, |row| row.balance);

            let posted_lines = state
                .entries
                .values()
                .filter(|e| e.status == EntryStatus::Posted)
                .flat_map(|e| e.lines.iter())
                .filter(|line| line.account_id == account_id);
            let computed = recompute_balance(account.normal_side(), posted_lines);

            if stored == computed {
                Ok(None)
            } else {
                Ok(Some(Discrepancy {
                    account_id,
                    stored,
                    computed,
                }))
            }
        })?
    }

    /// Queries the audit trail for a company, filtered and paginated.
    ///
    /// Records are ordered by timestamp, then by record id for ties.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DeadlineExceeded` if the deadline expires
    /// mid-scan.
    pub fn query_audit(
        &self,
        company_id: CompanyId,
        filter: &AuditFilter,
        page: &PageRequest,
        deadline: Option<Deadline>,
    ) -> Result<PageResponse<AuditRecord>, LedgerError> {
        self.store.read(|state| {
            let mut matched: Vec<&AuditRecord> = Vec::new();
            for record in &state.audit {
                if deadline.is_some_and(|d| d.expired()) {
                    debug!(%company_id, "audit query deadline expired");
                    return Err(LedgerError::DeadlineExceeded);
                }
                if record.company_id == company_id && filter.matches(record) {
                    matched.push(record);
                }
            }
            matched.sort_by_key(|r| r.sort_key());

            let total = matched.len() as u64;
            let data: Vec<AuditRecord> = matched
                .into_iter()
                .skip(page.offset())
                .take(page.limit())
                .cloned()
                .collect();

            Ok(PageResponse::new(data, page.page, page.per_page, total))
        })?
    }
}
