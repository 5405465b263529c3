//! In-memory store with staged, serialized transactions.
//!
//! A single coarse mutex serializes every unit of work, which gives the
//! ledger serializable isolation without per-row locking. A [`Txn`] holds
//! the guard plus staging buffers; reads see staged writes first, and
//! nothing reaches the shared state until [`Txn::commit`]. Dropping a
//! transaction without committing discards the staged writes, so a failed
//! operation leaves no trace.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::audit::AuditRecord;
use tally_core::balance::AccountBalance;
use tally_core::journal::{EntryStatus, JournalEntry};
use tally_core::registry::Account;
use tally_shared::types::{AccountId, CompanyId, EntryId};

use crate::error::LedgerError;

/// The shared state behind the store mutex.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    /// Accounts by id.
    pub(crate) accounts: HashMap<AccountId, Account>,
    /// Account code index, unique per company.
    pub(crate) codes: HashMap<(CompanyId, String), AccountId>,
    /// Journal entries by id.
    pub(crate) entries: HashMap<EntryId, JournalEntry>,
    /// Balance rows per account, keyed by as-of date.
    pub(crate) balances: HashMap<AccountId, BTreeMap<NaiveDate, AccountBalance>>,
    /// Highest posting sequence applied per company.
    pub(crate) applied_sequences: HashMap<CompanyId, u64>,
    /// Append-only audit trail.
    pub(crate) audit: Vec<AuditRecord>,
}

/// The in-memory transactional store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a read-only closure against the committed state.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StorePoisoned` if a writer panicked while
    /// holding the lock.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T, LedgerError> {
        let state = self.state.lock().map_err(|_| LedgerError::StorePoisoned)?;
        Ok(f(&state))
    }

    /// Opens a transaction, taking the store lock until commit or drop.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StorePoisoned` if a writer panicked while
    /// holding the lock.
    pub(crate) fn begin(&self) -> Result<Txn<'_>, LedgerError> {
        let state = self.state.lock().map_err(|_| LedgerError::StorePoisoned)?;
        Ok(Txn {
            state,
            staged_accounts: HashMap::new(),
            staged_codes: Vec::new(),
            staged_entries: HashMap::new(),
            staged_balances: HashMap::new(),
            staged_sequences: HashMap::new(),
            staged_audit: Vec::new(),
        })
    }
}

/// One atomic unit of work against the store.
///
/// Reads resolve staged writes first, then the committed state, so an
/// operation observes its own uncommitted changes.
pub(crate) struct Txn<'a> {
    state: MutexGuard<'a, StoreState>,
    staged_accounts: HashMap<AccountId, Account>,
    staged_codes: Vec<(CompanyId, String, AccountId)>,
    staged_entries: HashMap<EntryId, JournalEntry>,
    staged_balances: HashMap<AccountId, BTreeMap<NaiveDate, AccountBalance>>,
    staged_sequences: HashMap<CompanyId, u64>,
    staged_audit: Vec<AuditRecord>,
}

impl Txn<'_> {
    /// Resolves an account by id.
    pub(crate) fn account(&self, id: AccountId) -> Option<&Account> {
        self.staged_accounts.get(&id).or_else(|| self.state.accounts.get(&id))
    }

    /// Resolves an account id by company and code.
    pub(crate) fn account_by_code(&self, company_id: CompanyId, code: &str) -> Option<AccountId> {
        self.staged_codes
            .iter()
            .find(|(c, staged_code, _)| *c == company_id && staged_code == code)
            .map(|(_, _, id)| *id)
            .or_else(|| {
                self.state
                    .codes
                    .get(&(company_id, code.to_string()))
                    .copied()
            })
    }

    /// Resolves a journal entry by id.
    pub(crate) fn entry(&self, id: EntryId) -> Option<&JournalEntry> {
        self.staged_entries.get(&id).or_else(|| self.state.entries.get(&id))
    }

    /// Returns the merged balance rows for an account, staged rows
    /// overriding committed ones.
    pub(crate) fn balance_rows(&self, account_id: AccountId) -> BTreeMap<NaiveDate, AccountBalance> {
        let mut rows = self
            .state
            .balances
            .get(&account_id)
            .cloned()
            .unwrap_or_default();
        if let Some(staged) = self.staged_balances.get(&account_id) {
            for (date, row) in staged {
                rows.insert(*date, row.clone());
            }
        }
        rows
    }

    /// Returns the account's most recent stored balance across all dates.
    pub(crate) fn latest_balance(&self, account_id: AccountId) -> Decimal {
        self.balance_rows(account_id)
            .values()
            .next_back()
            .map_or(Decimal::ZERO, |row| row.balance)
    }

    /// Whether any balance row exists for the account, staged or
    /// committed. Rows exist exactly when a posted entry touched it.
    pub(crate) fn has_postings(&self, account_id: AccountId) -> bool {
        self.state
            .balances
            .get(&account_id)
            .is_some_and(|rows| !rows.is_empty())
            || self
                .staged_balances
                .get(&account_id)
                .is_some_and(|rows| !rows.is_empty())
    }

    /// Returns the highest posting sequence applied for a company.
    pub(crate) fn applied_sequence(&self, company_id: CompanyId) -> u64 {
        self.staged_sequences
            .get(&company_id)
            .or_else(|| self.state.applied_sequences.get(&company_id))
            .copied()
            .unwrap_or(0)
    }

    /// Counts Draft and Approved entries with a line on the account.
    pub(crate) fn open_entry_count(&self, account_id: AccountId) -> usize {
        let committed = self
            .state
            .entries
            .iter()
            .filter(|(id, _)| !self.staged_entries.contains_key(*id))
            .map(|(_, entry)| entry);
        committed
            .chain(self.staged_entries.values())
            .filter(|entry| {
                matches!(entry.status, EntryStatus::Draft | EntryStatus::Approved)
                    && entry.lines.iter().any(|line| line.account_id == account_id)
            })
            .count()
    }

    /// Stages an account upsert.
    pub(crate) fn stage_account(&mut self, account: Account) {
        self.staged_accounts.insert(account.id, account);
    }

    /// Stages a code claim for the company's code index.
    pub(crate) fn claim_code(&mut self, company_id: CompanyId, code: String, id: AccountId) {
        self.staged_codes.push((company_id, code, id));
    }

    /// Stages a journal entry upsert.
    pub(crate) fn stage_entry(&mut self, entry: JournalEntry) {
        self.staged_entries.insert(entry.id, entry);
    }

    /// Stages a balance row upsert.
    pub(crate) fn stage_balance(&mut self, row: AccountBalance) {
        self.staged_balances
            .entry(row.account_id)
            .or_default()
            .insert(row.as_of_date, row);
    }

    /// Stages the company's new applied-sequence high-water mark.
    pub(crate) fn stage_sequence(&mut self, company_id: CompanyId, sequence: u64) {
        self.staged_sequences.insert(company_id, sequence);
    }

    /// Appends an audit record to this unit of work.
    pub(crate) fn record(&mut self, record: AuditRecord) {
        self.staged_audit.push(record);
    }

    /// Applies every staged write to the shared state.
    pub(crate) fn commit(mut self) {
        for (company_id, code, id) in self.staged_codes.drain(..) {
            self.state.codes.insert((company_id, code), id);
        }
        for (id, account) in self.staged_accounts.drain() {
            self.state.accounts.insert(id, account);
        }
        for (id, entry) in self.staged_entries.drain() {
            self.state.entries.insert(id, entry);
        }
        for (account_id, rows) in self.staged_balances.drain() {
            let target = self.state.balances.entry(account_id).or_default();
            for (date, row) in rows {
                target.insert(date, row);
            }
        }
        for (company_id, sequence) in self.staged_sequences.drain() {
            self.state.applied_sequences.insert(company_id, sequence);
        }
        self.state.audit.append(&mut self.staged_audit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_core::registry::AccountType;

    fn make_account(company_id: CompanyId, code: &str) -> Account {
        Account {
            id: AccountId::new(),
            company_id,
            code: code.to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            parent_id: None,
            is_active: true,
            is_postable: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_commit_makes_writes_visible() {
        let store = MemoryStore::new();
        let company = CompanyId::new();
        let account = make_account(company, "1000");
        let id = account.id;

        let mut txn = store.begin().unwrap();
        txn.claim_code(company, "1000".to_string(), id);
        txn.stage_account(account);
        txn.commit();

        let txn = store.begin().unwrap();
        assert!(txn.account(id).is_some());
        assert_eq!(txn.account_by_code(company, "1000"), Some(id));
    }

    #[test]
    fn test_drop_discards_staged_writes() {
        let store = MemoryStore::new();
        let company = CompanyId::new();
        let account = make_account(company, "1000");
        let id = account.id;

        {
            let mut txn = store.begin().unwrap();
            txn.stage_account(account);
            txn.claim_code(company, "1000".to_string(), id);
            // no commit
        }

        let txn = store.begin().unwrap();
        assert!(txn.account(id).is_none());
        assert!(txn.account_by_code(company, "1000").is_none());
    }

    #[test]
    fn test_txn_sees_its_own_staged_writes() {
        let store = MemoryStore::new();
        let company = CompanyId::new();
        let account = make_account(company, "2000");
        let id = account.id;

        let mut txn = store.begin().unwrap();
        txn.stage_account(account);
        assert!(txn.account(id).is_some());
    }

    #[test]
    fn test_staged_balance_overrides_committed() {
        let store = MemoryStore::new();
        let account_id = AccountId::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();

        let mut txn = store.begin().unwrap();
        txn.stage_balance(AccountBalance {
            account_id,
            as_of_date: date,
            balance: dec!(100.00),
            last_applied_sequence: 1,
        });
        txn.commit();

        let mut txn = store.begin().unwrap();
        txn.stage_balance(AccountBalance {
            account_id,
            as_of_date: date,
            balance: dec!(250.00),
            last_applied_sequence: 2,
        });
        let rows = txn.balance_rows(account_id);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[&date].balance, dec!(250.00));
        assert_eq!(txn.latest_balance(account_id), dec!(250.00));
    }

    #[test]
    fn test_applied_sequence_defaults_to_zero() {
        let store = MemoryStore::new();
        let company = CompanyId::new();

        let mut txn = store.begin().unwrap();
        assert_eq!(txn.applied_sequence(company), 0);
        txn.stage_sequence(company, 1);
        assert_eq!(txn.applied_sequence(company), 1);
        txn.commit();

        let txn = store.begin().unwrap();
        assert_eq!(txn.applied_sequence(company), 1);
    }

    #[test]
    fn test_latest_balance_empty_is_zero() {
        let store = MemoryStore::new();
        let txn = store.begin().unwrap();
        assert_eq!(txn.latest_balance(AccountId::new()), Decimal::ZERO);
    }
}
