//! Property tests for the journal validator.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CompanyId};

use super::types::JournalLine;
use super::validation::validate_lines;
use crate::registry::{Account, AccountType};
use chrono::Utc;

fn make_account(id: AccountId, company_id: CompanyId) -> Account {
    Account {
        id,
        company_id,
        code: "1000".to_string(),
        name: "Cash".to_string(),
        account_type: AccountType::Asset,
        parent_id: None,
        is_active: true,
        is_postable: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Strategy for strictly positive amounts with 2 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for a balanced set of lines: each amount produces one debit
/// line and one credit line.
fn balanced_lines_strategy(max_pairs: usize) -> impl Strategy<Value = Vec<JournalLine>> {
    prop::collection::vec(amount_strategy(), 1..=max_pairs).prop_map(|amounts| {
        let mut lines = Vec::with_capacity(amounts.len() * 2);
        for amount in amounts {
            lines.push(JournalLine {
                account_id: AccountId::new(),
                debit: amount,
                credit: Decimal::ZERO,
                currency: "USD".to_string(),
                description: None,
            });
            lines.push(JournalLine {
                account_id: AccountId::new(),
                debit: Decimal::ZERO,
                credit: amount,
                currency: "USD".to_string(),
                description: None,
            });
        }
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of paired debit/credit lines with positive amounts validates.
    #[test]
    fn prop_balanced_lines_always_validate(lines in balanced_lines_strategy(10)) {
        let company = CompanyId::new();
        let result = validate_lines(company, &lines, |id| Some(make_account(id, company)));
        prop_assert!(result.is_ok());
    }

    /// Perturbing a single line's debit breaks the balance and is rejected.
    #[test]
    fn prop_perturbed_lines_rejected(
        lines in balanced_lines_strategy(10),
        delta in 1i64..1_000_000i64,
    ) {
        let company = CompanyId::new();
        let mut perturbed = lines;
        perturbed[0].debit += Decimal::new(delta, 2);

        let result = validate_lines(company, &perturbed, |id| Some(make_account(id, company)));
        prop_assert!(result.is_err());
    }

    /// Swapping every line's debit/credit preserves validity: the reversal
    /// of a valid entry is itself a valid entry.
    #[test]
    fn prop_swapped_lines_still_validate(lines in balanced_lines_strategy(10)) {
        let company = CompanyId::new();
        let swapped: Vec<JournalLine> = lines.iter().map(JournalLine::swapped).collect();
        let result = validate_lines(company, &swapped, |id| Some(make_account(id, company)));
        prop_assert!(result.is_ok());
    }

    /// Validation never mutates its input.
    #[test]
    fn prop_validation_is_pure(lines in balanced_lines_strategy(5)) {
        let company = CompanyId::new();
        let before = serde_json::to_string(&lines).unwrap();
        let _ = validate_lines(company, &lines, |id| Some(make_account(id, company)));
        let after = serde_json::to_string(&lines).unwrap();
        prop_assert_eq!(before, after);
    }
}
