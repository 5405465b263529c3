//! Property tests for balance delta calculations.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, ActorId, CompanyId, CorrelationId, EntryId};

use super::delta::{entry_deltas, line_delta, recompute_balance};
use crate::journal::{EntryStatus, JournalEntry, JournalLine};
use crate::registry::NormalSide;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// A balanced entry over a fixed pool of accounts, so merging kicks in.
fn balanced_entry_strategy() -> impl Strategy<Value = (Vec<AccountId>, JournalEntry)> {
    (2usize..6, prop::collection::vec(amount_strategy(), 1..8)).prop_map(|(pool_size, amounts)| {
        let pool: Vec<AccountId> = (0..pool_size).map(|_| AccountId::new()).collect();
        let mut lines = Vec::with_capacity(amounts.len() * 2);
        for (i, amount) in amounts.iter().enumerate() {
            lines.push(JournalLine {
                account_id: pool[i % pool.len()],
                debit: *amount,
                credit: Decimal::ZERO,
                currency: "USD".to_string(),
                description: None,
            });
            lines.push(JournalLine {
                account_id: pool[(i + 1) % pool.len()],
                debit: Decimal::ZERO,
                credit: *amount,
                currency: "USD".to_string(),
                description: None,
            });
        }
        let entry = JournalEntry {
            id: EntryId::new(),
            company_id: CompanyId::new(),
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "prop entry".to_string(),
            status: EntryStatus::Posted,
            lines,
            created_by: ActorId::new(),
            approved_by: None,
            posted_by: None,
            posting_sequence: Some(1),
            reverses_entry_id: None,
            correlation_id: CorrelationId::new(),
            created_at: Utc::now(),
            approved_at: None,
            posted_at: None,
            voided_at: None,
        };
        (pool, entry)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// When every account is debit-normal, merged deltas of a balanced
    /// entry sum to zero (debits cancel credits exactly).
    #[test]
    fn prop_uniform_side_deltas_sum_to_zero((_, entry) in balanced_entry_strategy()) {
        let deltas = entry_deltas(&entry, |_| NormalSide::Debit);
        let total: Decimal = deltas.iter().map(|(_, d)| *d).sum();
        prop_assert_eq!(total, Decimal::ZERO);
    }

    /// Merged deltas equal the per-line sums computed independently.
    #[test]
    fn prop_merge_preserves_per_account_sums((pool, entry) in balanced_entry_strategy()) {
        let deltas = entry_deltas(&entry, |_| NormalSide::Debit);
        for account in &pool {
            let expected: Decimal = entry
                .lines
                .iter()
                .filter(|l| l.account_id == *account)
                .map(|l| line_delta(NormalSide::Debit, l))
                .sum();
            let merged = deltas
                .iter()
                .find(|(id, _)| id == account)
                .map_or(Decimal::ZERO, |(_, d)| *d);
            prop_assert_eq!(merged, expected);
        }
    }

    /// Output ordering is ascending by account id regardless of input order.
    #[test]
    fn prop_deltas_sorted((_, entry) in balanced_entry_strategy()) {
        let deltas = entry_deltas(&entry, |_| NormalSide::Credit);
        for pair in deltas.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0);
        }
    }

    /// An entry followed by its reversal recomputes to zero on every
    /// account, for either normal side.
    #[test]
    fn prop_entry_plus_reversal_nets_zero((pool, entry) in balanced_entry_strategy()) {
        let reversed: Vec<JournalLine> =
            entry.lines.iter().map(JournalLine::swapped).collect();
        for account in &pool {
            for side in [NormalSide::Debit, NormalSide::Credit] {
                let all = entry
                    .lines
                    .iter()
                    .chain(reversed.iter())
                    .filter(|l| l.account_id == *account);
                prop_assert_eq!(recompute_balance(side, all), Decimal::ZERO);
            }
        }
    }

    /// Flipping the normal side negates every delta.
    #[test]
    fn prop_side_flip_negates((_, entry) in balanced_entry_strategy()) {
        let debit_side = entry_deltas(&entry, |_| NormalSide::Debit);
        let credit_side = entry_deltas(&entry, |_| NormalSide::Credit);
        prop_assert_eq!(debit_side.len(), credit_side.len());
        for ((id_a, a), (id_b, b)) in debit_side.iter().zip(credit_side.iter()) {
            prop_assert_eq!(id_a, id_b);
            prop_assert_eq!(*a, -*b);
        }
    }
}
