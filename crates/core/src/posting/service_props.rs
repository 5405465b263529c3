//! Property tests for the posting state machine.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, ActorId, CompanyId, CorrelationId, EntryId};

use super::service::{PostingService, Transition};
use crate::journal::{EntryStatus, JournalEntry, JournalLine};

fn make_entry(status: EntryStatus) -> JournalEntry {
    JournalEntry {
        id: EntryId::new(),
        company_id: CompanyId::new(),
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "prop entry".to_string(),
        status,
        lines: vec![
            JournalLine {
                account_id: AccountId::new(),
                debit: Decimal::new(10000, 2),
                credit: Decimal::ZERO,
                currency: "USD".to_string(),
                description: None,
            },
            JournalLine {
                account_id: AccountId::new(),
                debit: Decimal::ZERO,
                credit: Decimal::new(10000, 2),
                currency: "USD".to_string(),
                description: None,
            },
        ],
        created_by: ActorId::new(),
        approved_by: None,
        posted_by: None,
        posting_sequence: None,
        reverses_entry_id: None,
        correlation_id: CorrelationId::new(),
        created_at: Utc::now(),
        approved_at: None,
        posted_at: None,
        voided_at: None,
    }
}

fn status_strategy() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![
        Just(EntryStatus::Draft),
        Just(EntryStatus::Approved),
        Just(EntryStatus::Posted),
        Just(EntryStatus::Voided),
    ]
}

/// Rank of a status in the lifecycle. Voided sits alongside Posted as a
/// terminal state.
fn rank(status: EntryStatus) -> u8 {
    match status {
        EntryStatus::Draft => 0,
        EntryStatus::Approved => 1,
        EntryStatus::Posted | EntryStatus::Voided => 2,
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Approve,
    Post,
    Void,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Approve), Just(Op::Post), Just(Op::Void)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// No sequence of transition attempts ever regresses an entry's status.
    #[test]
    fn prop_status_never_regresses(
        start in status_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let mut entry = make_entry(start);
        let mut sequence = 0u64;

        for op in ops {
            let before = entry.status;
            let result = match op {
                Op::Approve => PostingService::approve(&entry, ActorId::new(), Utc::now()),
                Op::Post => {
                    sequence += 1;
                    PostingService::post(&entry, ActorId::new(), sequence, Utc::now())
                }
                Op::Void => PostingService::void(&entry, Utc::now()),
            };

            if let Ok(Transition::Applied(updated)) = result {
                prop_assert!(
                    rank(updated.status) >= rank(before),
                    "status regressed from {before} to {}", updated.status
                );
                prop_assert!(PostingService::is_valid_transition(before, updated.status));
                entry = updated;
            } else {
                // Errors and no-ops leave the entry untouched.
                prop_assert_eq!(entry.status, before);
            }
        }
    }

    /// Applying the same transition twice is a no-op the second time.
    #[test]
    fn prop_transitions_idempotent(_seed in 0u8..=255) {
        let entry = make_entry(EntryStatus::Draft);
        let approver = ActorId::new();

        let approved = match PostingService::approve(&entry, approver, Utc::now()).unwrap() {
            Transition::Applied(e) => e,
            Transition::AlreadyDone => unreachable!("first approve must apply"),
        };
        prop_assert!(matches!(
            PostingService::approve(&approved, approver, Utc::now()).unwrap(),
            Transition::AlreadyDone
        ));

        let posted = match PostingService::post(&approved, approver, 1, Utc::now()).unwrap() {
            Transition::Applied(e) => e,
            Transition::AlreadyDone => unreachable!("first post must apply"),
        };
        prop_assert!(matches!(
            PostingService::post(&posted, approver, 2, Utc::now()).unwrap(),
            Transition::AlreadyDone
        ));
        // Retried post must not reassign the sequence.
        prop_assert_eq!(posted.posting_sequence, Some(1));
    }

    /// Posted entries reject every transition except the idempotent retry.
    #[test]
    fn prop_posted_is_terminal(op in op_strategy()) {
        let entry = make_entry(EntryStatus::Posted);
        match op {
            Op::Approve => {
                // Approve on a posted entry is a retry of an earlier success.
                prop_assert!(matches!(
                    PostingService::approve(&entry, ActorId::new(), Utc::now()).unwrap(),
                    Transition::AlreadyDone
                ));
            }
            Op::Post => {
                prop_assert!(matches!(
                    PostingService::post(&entry, ActorId::new(), 9, Utc::now()).unwrap(),
                    Transition::AlreadyDone
                ));
            }
            Op::Void => {
                prop_assert!(PostingService::void(&entry, Utc::now()).is_err());
            }
        }
    }
}
