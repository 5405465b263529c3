//! Tally ledger walkthrough.
//!
//! Runs a small month of bookkeeping against an in-memory ledger: builds a
//! chart of accounts, posts a sale and an expense, reverses the expense,
//! and prints the resulting trial balance and audit trail.

use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::audit::AuditFilter;
use tally_core::journal::{NewJournalEntry, NewJournalLine};
use tally_core::registry::{AccountType, NewAccount};
use tally_shared::types::{ActorId, CompanyId, Deadline, PageRequest};
use tally_shared::AppConfig;
use tally_store::Ledger;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    let deadline = || Some(Deadline::after(Duration::from_millis(config.ledger.query_deadline_ms)));

    let ledger = Ledger::in_memory();
    let company = CompanyId::new();
    let bookkeeper = ActorId::new();
    let controller = ActorId::new();

    // Chart of accounts.
    let cash = ledger.create_account(
        account(company, "1000", "Cash", AccountType::Asset),
        bookkeeper,
    )?;
    let sales = ledger.create_account(
        account(company, "4000", "Sales revenue", AccountType::Revenue),
        bookkeeper,
    )?;
    let rent = ledger.create_account(
        account(company, "5000", "Rent expense", AccountType::Expense),
        bookkeeper,
    )?;
    info!("chart of accounts ready");

    // A cash sale, drafted by the bookkeeper and approved by the controller.
    let jan_10 = ymd(2026, 1, 10);
    let sale = ledger.submit_draft(
        entry(company, jan_10, "Cash sale", cash.id, sales.id, dec!(1200.00)),
        bookkeeper,
    )?;
    ledger.approve_entry(sale.id, controller)?;
    let sale = ledger.post_entry(sale.id, controller)?;
    info!(sequence = ?sale.posting_sequence, "sale posted");

    // January rent, paid in cash.
    let jan_12 = ymd(2026, 1, 12);
    let rent_entry = ledger.submit_draft(
        entry(company, jan_12, "January rent", rent.id, cash.id, dec!(400.00)),
        bookkeeper,
    )?;
    ledger.approve_entry(rent_entry.id, controller)?;
    let rent_entry = ledger.post_entry(rent_entry.id, controller)?;
    info!(sequence = ?rent_entry.posting_sequence, "rent posted");

    // The rent turns out to be wrong; reverse it through the normal path.
    let reversal = ledger.reverse_entry(rent_entry.id, jan_12, bookkeeper)?;
    ledger.approve_entry(reversal.id, controller)?;
    ledger.post_entry(reversal.id, controller)?;
    info!(original = %rent_entry.id, "rent reversed");

    // Trial balance at month end.
    let queries = ledger.queries();
    let tb = queries.trial_balance(company, ymd(2026, 1, 31), deadline())?;
    println!("Trial balance as of {}", tb.as_of_date);
    for row in &tb.rows {
        println!("  {:<6} {:<16} {:>12}", row.code, row.name, row.balance);
    }
    println!(
        "  debits {} / credits {} / net {}",
        tb.total_debits(),
        tb.total_credits(),
        tb.net()
    );

    // Every account still reconciles against its posted lines.
    for account in [&cash, &sales, &rent] {
        match queries.reconcile(account.id)? {
            None => info!(code = %account.code, "reconciled"),
            Some(discrepancy) => {
                anyhow::bail!(
                    "account {} off by {}",
                    account.code,
                    discrepancy.difference()
                );
            }
        }
    }

    // The audit trail captured the whole month.
    let history = queries.query_audit(
        company,
        &AuditFilter::default(),
        &PageRequest {
            page: 1,
            per_page: config.ledger.query_page_size,
        },
        deadline(),
    )?;
    println!("{} audit records:", history.meta.total);
    for record in &history.data {
        println!(
            "  {} {:?} {:?} by {}",
            record.timestamp.format("%H:%M:%S%.3f"),
            record.action(),
            record.entity_type(),
            record.actor
        );
    }

    Ok(())
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn account(company_id: CompanyId, code: &str, name: &str, account_type: AccountType) -> NewAccount {
    NewAccount {
        company_id,
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        parent_id: None,
    }
}

fn entry(
    company_id: CompanyId,
    entry_date: NaiveDate,
    description: &str,
    debit_account: tally_shared::types::AccountId,
    credit_account: tally_shared::types::AccountId,
    amount: rust_decimal::Decimal,
) -> NewJournalEntry {
    NewJournalEntry {
        company_id,
        entry_date,
        description: description.to_string(),
        lines: vec![
            NewJournalLine {
                account_id: debit_account,
                debit: amount,
                credit: rust_decimal::Decimal::ZERO,
                currency: "USD".to_string(),
                description: None,
            },
            NewJournalLine {
                account_id: credit_account,
                debit: rust_decimal::Decimal::ZERO,
                credit: amount,
                currency: "USD".to_string(),
                description: None,
            },
        ],
    }
}
