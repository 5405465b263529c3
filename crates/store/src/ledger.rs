//! The mutating operation surface of the posting engine.
//!
//! Every operation follows the same shape: authorize the actor, open a
//! transaction, run the pure core services against the transaction's view
//! of the data, stage the resulting writes together with their audit
//! records, and commit. An error anywhere before commit discards the
//! whole unit of work.

use std::collections::HashMap;
use std::ops::Bound;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use tally_core::audit::{AuditChange, AuditRecord};
use tally_core::balance::{entry_deltas, AccountBalance, BalanceError};
use tally_core::journal::{
    validate_lines, EntryStatus, JournalEntry, JournalLine, NewJournalEntry, ValidationError,
};
use tally_core::posting::{PostingService, ReversalService, StateError, Transition};
use tally_core::registry::{Account, NewAccount, NormalSide, RegistryError, RegistryService};
use tally_shared::types::{AccountId, ActorId, CompanyId, CorrelationId, EntryId};

use crate::authorize::{AllowAll, Authorizer, LedgerAction};
use crate::error::LedgerError;
use crate::memory::{MemoryStore, Txn};
use crate::query::LedgerQueries;

/// The ledger: chart of accounts management and the posting lifecycle.
///
/// Cloning is cheap; clones share the same store and authorizer.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<MemoryStore>,
    authorizer: Arc<dyn Authorizer>,
}

impl Ledger {
    /// Creates a ledger over the given store and authorization policy.
    #[must_use]
    pub fn new(store: Arc<MemoryStore>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { store, authorizer }
    }

    /// Creates a ledger over a fresh store that permits every action.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(AllowAll))
    }

    /// Returns the read-only query facade over the same store.
    #[must_use]
    pub fn queries(&self) -> LedgerQueries {
        LedgerQueries::new(Arc::clone(&self.store))
    }

    fn authorize(
        &self,
        actor: ActorId,
        action: LedgerAction,
        company_id: CompanyId,
    ) -> Result<(), LedgerError> {
        if self.authorizer.is_authorized(actor, action, company_id) {
            Ok(())
        } else {
            debug!(%actor, %action, %company_id, "authorization denied");
            Err(LedgerError::Unauthorized {
                actor,
                action,
                company_id,
            })
        }
    }

    /// Creates an account in the chart of accounts.
    ///
    /// If the parent was postable it stops being so: gaining a child turns
    /// an account into a summary node, and that flip is audited alongside
    /// the creation. A parent that already carries posted balances cannot
    /// take a first child, since the flip would strip its balance out of
    /// the trial balance.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial, duplicate code or a
    /// parent rule violation.
    pub fn create_account(&self, input: NewAccount, actor: ActorId) -> Result<Account, LedgerError> {
        self.authorize(actor, LedgerAction::ManageAccounts, input.company_id)?;
        let mut txn = self.store.begin()?;

        if txn.account_by_code(input.company_id, &input.code).is_some() {
            return Err(RegistryError::DuplicateCode(input.code).into());
        }

        let now = Utc::now();
        let correlation_id = CorrelationId::new();

        if let Some(parent_id) = input.parent_id {
            let parent = txn
                .account(parent_id)
                .cloned()
                .ok_or(RegistryError::ParentNotFound(parent_id))?;
            RegistryService::validate_parent(&input, &parent)?;
            RegistryService::ensure_acyclic(parent_id, |id| {
                txn.account(id).and_then(|a| a.parent_id)
            })?;

            if parent.is_postable {
                if txn.has_postings(parent_id) {
                    return Err(RegistryError::ParentHasPostings(parent_id).into());
                }
                let mut updated = parent.clone();
                updated.is_postable = false;
                updated.updated_at = now;
                txn.record(AuditRecord::new(
                    parent.company_id,
                    actor,
                    correlation_id,
                    now,
                    AuditChange::AccountUpdated {
                        before: Box::new(parent),
                        after: Box::new(updated.clone()),
                    },
                ));
                txn.stage_account(updated);
            }
        }

        let account = Account {
            id: AccountId::new(),
            company_id: input.company_id,
            code: input.code,
            name: input.name,
            account_type: input.account_type,
            parent_id: input.parent_id,
            is_active: true,
            is_postable: true,
            created_at: now,
            updated_at: now,
        };

        txn.claim_code(account.company_id, account.code.clone(), account.id);
        txn.stage_account(account.clone());
        txn.record(AuditRecord::new(
            account.company_id,
            actor,
            correlation_id,
            now,
            AuditChange::AccountCreated {
                after: Box::new(account.clone()),
            },
        ));
        txn.commit();

        info!(account_id = %account.id, code = %account.code, "account created");
        Ok(account)
    }

    /// Renames an account.
    ///
    /// Renaming to the current name is a no-op and leaves no audit record.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial or unknown account.
    pub fn rename_account(
        &self,
        account_id: AccountId,
        new_name: &str,
        actor: ActorId,
    ) -> Result<Account, LedgerError> {
        let mut txn = self.store.begin()?;
        let account = txn
            .account(account_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        self.authorize(actor, LedgerAction::ManageAccounts, account.company_id)?;

        if account.name == new_name {
            return Ok(account);
        }

        let now = Utc::now();
        let mut updated = account.clone();
        updated.name = new_name.to_string();
        updated.updated_at = now;

        txn.record(AuditRecord::new(
            account.company_id,
            actor,
            CorrelationId::new(),
            now,
            AuditChange::AccountUpdated {
                before: Box::new(account),
                after: Box::new(updated.clone()),
            },
        ));
        txn.stage_account(updated.clone());
        txn.commit();

        info!(%account_id, "account renamed");
        Ok(updated)
    }

    /// Deactivates an account.
    ///
    /// Blocked while the account carries a nonzero balance or is referenced
    /// by unposted entries. Deactivating an already inactive account is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial or a deactivation
    /// guard.
    pub fn deactivate_account(
        &self,
        account_id: AccountId,
        actor: ActorId,
    ) -> Result<Account, LedgerError> {
        let mut txn = self.store.begin()?;
        let account = txn
            .account(account_id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        self.authorize(actor, LedgerAction::ManageAccounts, account.company_id)?;

        if !account.is_active {
            return Ok(account);
        }

        let balance = txn.latest_balance(account_id);
        let open_count = txn.open_entry_count(account_id);
        RegistryService::validate_deactivate(&account, balance, open_count)?;

        let now = Utc::now();
        let mut updated = account.clone();
        updated.is_active = false;
        updated.updated_at = now;

        txn.record(AuditRecord::new(
            account.company_id,
            actor,
            CorrelationId::new(),
            now,
            AuditChange::AccountDeactivated {
                before: Box::new(account),
                after: Box::new(updated.clone()),
            },
        ));
        txn.stage_account(updated.clone());
        txn.commit();

        info!(%account_id, "account deactivated");
        Ok(updated)
    }

    /// Validates and admits a journal entry draft.
    ///
    /// A draft that fails validation is rejected outright; nothing is
    /// stored and no audit record is written.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial or validation failure.
    pub fn submit_draft(
        &self,
        input: NewJournalEntry,
        actor: ActorId,
    ) -> Result<JournalEntry, LedgerError> {
        self.authorize(actor, LedgerAction::SubmitEntry, input.company_id)?;
        let mut txn = self.store.begin()?;

        let lines: Vec<JournalLine> = input
            .lines
            .iter()
            .map(|line| JournalLine {
                account_id: line.account_id,
                debit: line.debit,
                credit: line.credit,
                currency: line.currency.clone(),
                description: line.description.clone(),
            })
            .collect();

        validate_lines(input.company_id, &lines, |id| txn.account(id).cloned())?;

        let now = Utc::now();
        let entry = JournalEntry {
            id: EntryId::new(),
            company_id: input.company_id,
            entry_date: input.entry_date,
            description: input.description,
            status: EntryStatus::Draft,
            lines,
            created_by: actor,
            approved_by: None,
            posted_by: None,
            posting_sequence: None,
            reverses_entry_id: None,
            correlation_id: CorrelationId::new(),
            created_at: now,
            approved_at: None,
            posted_at: None,
            voided_at: None,
        };

        txn.stage_entry(entry.clone());
        txn.record(AuditRecord::new(
            entry.company_id,
            actor,
            entry.correlation_id,
            now,
            AuditChange::EntryDrafted {
                after: Box::new(entry.clone()),
            },
        ));
        txn.commit();

        info!(entry_id = %entry.id, lines = entry.lines.len(), "draft admitted");
        Ok(entry)
    }

    /// Approves a draft entry.
    ///
    /// The approver must differ from the creator, and the entry is
    /// re-validated against current account state before the approval
    /// sticks. Retrying on an already approved entry returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial, an illegal
    /// transition, self-approval or stale validation.
    pub fn approve_entry(
        &self,
        entry_id: EntryId,
        actor: ActorId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut txn = self.store.begin()?;
        let entry = txn
            .entry(entry_id)
            .cloned()
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        self.authorize(actor, LedgerAction::ApproveEntry, entry.company_id)?;

        let now = Utc::now();
        match PostingService::approve(&entry, actor, now)? {
            Transition::AlreadyDone => Ok(entry),
            Transition::Applied(updated) => {
                Self::revalidate(&txn, &entry)?;

                txn.stage_entry(updated.clone());
                txn.record(AuditRecord::new(
                    updated.company_id,
                    actor,
                    updated.correlation_id,
                    now,
                    AuditChange::EntryStatusChanged {
                        before: Box::new(entry),
                        after: Box::new(updated.clone()),
                    },
                ));
                txn.commit();

                info!(%entry_id, "entry approved");
                Ok(updated)
            }
        }
    }

    /// Posts an approved entry.
    ///
    /// Assigns the company's next gap-free posting sequence, re-validates
    /// the lines, applies the balance deltas and writes the audit records,
    /// all in one unit of work. Retrying on an already posted entry
    /// returns it unchanged; the sequence is not reassigned and balances
    /// are not touched again.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial, an illegal
    /// transition, stale validation or a balance engine guard.
    pub fn post_entry(
        &self,
        entry_id: EntryId,
        actor: ActorId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut txn = self.store.begin()?;
        let entry = txn
            .entry(entry_id)
            .cloned()
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        self.authorize(actor, LedgerAction::PostEntry, entry.company_id)?;

        let now = Utc::now();
        let sequence = txn.applied_sequence(entry.company_id) + 1;
        match PostingService::post(&entry, actor, sequence, now)? {
            Transition::AlreadyDone => Ok(entry),
            Transition::Applied(updated) => {
                Self::revalidate(&txn, &entry)?;
                let sequence = Self::check_sequence(&txn, &updated)?;

                Self::apply_balances(&mut txn, &updated, sequence, actor, now)?;
                txn.stage_sequence(updated.company_id, sequence);

                txn.stage_entry(updated.clone());
                txn.record(AuditRecord::new(
                    updated.company_id,
                    actor,
                    updated.correlation_id,
                    now,
                    AuditChange::EntryStatusChanged {
                        before: Box::new(entry),
                        after: Box::new(updated.clone()),
                    },
                ));
                txn.commit();

                info!(%entry_id, sequence, "entry posted");
                Ok(updated)
            }
        }
    }

    /// Voids a draft or approved entry.
    ///
    /// Posted entries cannot be voided; they are undone via
    /// [`Ledger::reverse_entry`]. Retrying on a voided entry returns it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial or an illegal
    /// transition.
    pub fn void_entry(
        &self,
        entry_id: EntryId,
        actor: ActorId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut txn = self.store.begin()?;
        let entry = txn
            .entry(entry_id)
            .cloned()
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        self.authorize(actor, LedgerAction::VoidEntry, entry.company_id)?;

        let now = Utc::now();
        match PostingService::void(&entry, now)? {
            Transition::AlreadyDone => Ok(entry),
            Transition::Applied(updated) => {
                txn.stage_entry(updated.clone());
                txn.record(AuditRecord::new(
                    updated.company_id,
                    actor,
                    updated.correlation_id,
                    now,
                    AuditChange::EntryStatusChanged {
                        before: Box::new(entry),
                        after: Box::new(updated.clone()),
                    },
                ));
                txn.commit();

                info!(%entry_id, "entry voided");
                Ok(updated)
            }
        }
    }

    /// Creates a reversal draft for a posted entry.
    ///
    /// The draft carries swapped lines and the original's correlation id,
    /// and then walks the normal Draft → Approved → Posted path. Calling
    /// this twice creates two independent reversal drafts.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` on authorization denial, if the original is
    /// not posted, or if the swapped lines no longer validate.
    pub fn reverse_entry(
        &self,
        entry_id: EntryId,
        entry_date: NaiveDate,
        actor: ActorId,
    ) -> Result<JournalEntry, LedgerError> {
        let mut txn = self.store.begin()?;
        let original = txn
            .entry(entry_id)
            .cloned()
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        self.authorize(actor, LedgerAction::ReverseEntry, original.company_id)?;

        let now = Utc::now();
        let reversal = ReversalService::build(&original, actor, entry_date, now)?;
        validate_lines(reversal.company_id, &reversal.lines, |id| {
            txn.account(id).cloned()
        })?;

        txn.stage_entry(reversal.clone());
        txn.record(AuditRecord::new(
            reversal.company_id,
            actor,
            reversal.correlation_id,
            now,
            AuditChange::EntryDrafted {
                after: Box::new(reversal.clone()),
            },
        ));
        txn.commit();

        info!(original = %entry_id, reversal = %reversal.id, "reversal drafted");
        Ok(reversal)
    }

    /// Re-runs line validation against the transaction's current account
    /// state, surfacing any failure as stale validation.
    fn revalidate(txn: &Txn<'_>, entry: &JournalEntry) -> Result<(), LedgerError> {
        validate_lines(entry.company_id, &entry.lines, |id| txn.account(id).cloned()).map_err(
            |source| {
                StateError::StaleValidation {
                    entry_id: entry.id,
                    source,
                }
                .into()
            },
        )
    }

    /// Verifies the entry's sequence extends the company's high-water mark
    /// by exactly one.
    fn check_sequence(txn: &Txn<'_>, entry: &JournalEntry) -> Result<u64, LedgerError> {
        let sequence = entry
            .posting_sequence
            .ok_or(BalanceError::MissingSequence(entry.id))?;
        let applied = txn.applied_sequence(entry.company_id);
        if sequence <= applied {
            return Err(BalanceError::AlreadyApplied {
                entry_id: entry.id,
                sequence,
            }
            .into());
        }
        if sequence != applied + 1 {
            return Err(BalanceError::SequenceConflict {
                company_id: entry.company_id,
                expected: applied + 1,
                actual: sequence,
            }
            .into());
        }
        Ok(sequence)
    }

    /// Applies the entry's merged deltas to the stored balance rows.
    ///
    /// For each affected account the row at the entry date absorbs the
    /// delta, every later row shifts by the same amount, and one audit
    /// record captures the before and after values at the entry date.
    fn apply_balances(
        txn: &mut Txn<'_>,
        entry: &JournalEntry,
        sequence: u64,
        actor: ActorId,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let mut sides: HashMap<AccountId, NormalSide> = HashMap::new();
        for line in &entry.lines {
            let account = txn
                .account(line.account_id)
                .ok_or(ValidationError::AccountNotFound(line.account_id))?;
            sides.insert(line.account_id, account.normal_side());
        }

        let deltas = entry_deltas(entry, |id| {
            sides.get(&id).copied().unwrap_or(NormalSide::Debit)
        });

        for (account_id, delta) in deltas {
            let rows = txn.balance_rows(account_id);
            let before = rows
                .range(..=entry.entry_date)
                .next_back()
                .map_or(Decimal::ZERO, |(_, row)| row.balance);
            let after = before + delta;

            txn.stage_balance(AccountBalance {
                account_id,
                as_of_date: entry.entry_date,
                balance: after,
                last_applied_sequence: sequence,
            });
            for (date, row) in rows.range((Bound::Excluded(entry.entry_date), Bound::Unbounded)) {
                txn.stage_balance(AccountBalance {
                    account_id,
                    as_of_date: *date,
                    balance: row.balance + delta,
                    last_applied_sequence: sequence,
                });
            }

            txn.record(AuditRecord::new(
                entry.company_id,
                actor,
                entry.correlation_id,
                now,
                AuditChange::BalanceApplied {
                    account_id,
                    as_of_date: entry.entry_date,
                    sequence,
                    before,
                    after,
                },
            ));
        }

        Ok(())
    }
}
