//! Shared fixtures for store integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_core::journal::{NewJournalEntry, NewJournalLine};
use tally_core::registry::{Account, AccountType, NewAccount};
use tally_shared::types::{AccountId, ActorId, CompanyId};
use tally_store::Ledger;

/// A ledger with a minimal chart of accounts and two actors.
pub struct Fixture {
    pub ledger: Ledger,
    pub company: CompanyId,
    /// Creates drafts.
    pub maker: ActorId,
    /// Approves and posts them.
    pub checker: ActorId,
    pub cash: Account,
    pub revenue: Account,
    pub expense: Account,
    pub payable: Account,
}

pub fn fixture() -> Fixture {
    let ledger = Ledger::in_memory();
    let company = CompanyId::new();
    let maker = ActorId::new();
    let checker = ActorId::new();

    let cash = ledger
        .create_account(
            new_account(company, "1000", "Cash", AccountType::Asset),
            maker,
        )
        .unwrap();
    let revenue = ledger
        .create_account(
            new_account(company, "4000", "Sales revenue", AccountType::Revenue),
            maker,
        )
        .unwrap();
    let expense = ledger
        .create_account(
            new_account(company, "5000", "Rent expense", AccountType::Expense),
            maker,
        )
        .unwrap();
    let payable = ledger
        .create_account(
            new_account(company, "2000", "Accounts payable", AccountType::Liability),
            maker,
        )
        .unwrap();

    Fixture {
        ledger,
        company,
        maker,
        checker,
        cash,
        revenue,
        expense,
        payable,
    }
}

pub fn new_account(
    company_id: CompanyId,
    code: &str,
    name: &str,
    account_type: AccountType,
) -> NewAccount {
    NewAccount {
        company_id,
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        parent_id: None,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A balanced two-line entry: debit one account, credit another.
pub fn two_line_entry(
    company_id: CompanyId,
    entry_date: NaiveDate,
    debit_account: AccountId,
    credit_account: AccountId,
    amount: Decimal,
) -> NewJournalEntry {
    NewJournalEntry {
        company_id,
        entry_date,
        description: "Cash sale".to_string(),
        lines: vec![
            NewJournalLine {
                account_id: debit_account,
                debit: amount,
                credit: Decimal::ZERO,
                currency: "USD".to_string(),
                description: None,
            },
            NewJournalLine {
                account_id: credit_account,
                debit: Decimal::ZERO,
                credit: amount,
                currency: "USD".to_string(),
                description: None,
            },
        ],
    }
}

impl Fixture {
    /// Drafts, approves and posts a two-line entry in one go.
    pub fn post_two_line(
        &self,
        entry_date: NaiveDate,
        debit_account: AccountId,
        credit_account: AccountId,
        amount: Decimal,
    ) -> tally_core::journal::JournalEntry {
        let draft = self
            .ledger
            .submit_draft(
                two_line_entry(
                    self.company,
                    entry_date,
                    debit_account,
                    credit_account,
                    amount,
                ),
                self.maker,
            )
            .unwrap();
        self.ledger.approve_entry(draft.id, self.checker).unwrap();
        self.ledger.post_entry(draft.id, self.checker).unwrap()
    }
}
