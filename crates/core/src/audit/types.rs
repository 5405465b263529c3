//! Audit trail domain types.
//!
//! Changes are a closed tagged-variant type with a fixed, typed payload per
//! variant - never a free-form map - so consumers get exhaustive-match
//! safety at compile time.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, ActorId, AuditRecordId, CompanyId, CorrelationId};
use uuid::Uuid;

use crate::journal::JournalEntry;
use crate::registry::Account;

/// Coarse audit action classification, derived from the change variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// An entity was created.
    Create,
    /// An entity's fields were updated.
    Update,
    /// An entity's lifecycle status changed.
    StatusChange,
}

/// The kind of entity a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A chart of accounts entry.
    Account,
    /// A journal entry.
    JournalEntry,
    /// An account balance row.
    AccountBalance,
}

/// A typed before/after description of one mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditChange {
    /// An account was created.
    AccountCreated {
        /// The account as created.
        after: Box<Account>,
    },
    /// An account was updated (rename, postability flip).
    AccountUpdated {
        /// The account before the update.
        before: Box<Account>,
        /// The account after the update.
        after: Box<Account>,
    },
    /// An account was deactivated.
    AccountDeactivated {
        /// The account before deactivation.
        before: Box<Account>,
        /// The account after deactivation.
        after: Box<Account>,
    },
    /// A journal entry draft was admitted.
    EntryDrafted {
        /// The entry as drafted.
        after: Box<JournalEntry>,
    },
    /// A journal entry moved through the lifecycle.
    EntryStatusChanged {
        /// The entry before the transition.
        before: Box<JournalEntry>,
        /// The entry after the transition.
        after: Box<JournalEntry>,
    },
    /// A posting was applied to an account balance.
    BalanceApplied {
        /// The account whose balance changed.
        account_id: AccountId,
        /// The balance row date.
        as_of_date: NaiveDate,
        /// The posting sequence applied.
        sequence: u64,
        /// The balance before.
        before: Decimal,
        /// The balance after.
        after: Decimal,
    },
}

impl AuditChange {
    /// The coarse action class of this change.
    #[must_use]
    pub const fn action(&self) -> AuditAction {
        match self {
            Self::AccountCreated { .. } | Self::EntryDrafted { .. } => AuditAction::Create,
            Self::AccountUpdated { .. } | Self::BalanceApplied { .. } => AuditAction::Update,
            Self::AccountDeactivated { .. } | Self::EntryStatusChanged { .. } => {
                AuditAction::StatusChange
            }
        }
    }

    /// The kind of entity this change describes.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::AccountCreated { .. }
            | Self::AccountUpdated { .. }
            | Self::AccountDeactivated { .. } => EntityType::Account,
            Self::EntryDrafted { .. } | Self::EntryStatusChanged { .. } => EntityType::JournalEntry,
            Self::BalanceApplied { .. } => EntityType::AccountBalance,
        }
    }

    /// The id of the entity this change describes.
    #[must_use]
    pub fn entity_id(&self) -> Uuid {
        match self {
            Self::AccountCreated { after } => after.id.into_inner(),
            Self::AccountUpdated { after, .. } | Self::AccountDeactivated { after, .. } => {
                after.id.into_inner()
            }
            Self::EntryDrafted { after } => after.id.into_inner(),
            Self::EntryStatusChanged { after, .. } => after.id.into_inner(),
            Self::BalanceApplied { account_id, .. } => account_id.into_inner(),
        }
    }

    /// Snapshot of the entity before the change, if it existed.
    #[must_use]
    pub fn before_snapshot(&self) -> Option<serde_json::Value> {
        match self {
            Self::AccountCreated { .. } | Self::EntryDrafted { .. } => None,
            Self::AccountUpdated { before, .. } | Self::AccountDeactivated { before, .. } => {
                serde_json::to_value(before).ok()
            }
            Self::EntryStatusChanged { before, .. } => serde_json::to_value(before).ok(),
            Self::BalanceApplied { before, .. } => serde_json::to_value(before).ok(),
        }
    }

    /// Snapshot of the entity after the change.
    #[must_use]
    pub fn after_snapshot(&self) -> Option<serde_json::Value> {
        match self {
            Self::AccountCreated { after } => serde_json::to_value(after).ok(),
            Self::AccountUpdated { after, .. } | Self::AccountDeactivated { after, .. } => {
                serde_json::to_value(after).ok()
            }
            Self::EntryDrafted { after } => serde_json::to_value(after).ok(),
            Self::EntryStatusChanged { after, .. } => serde_json::to_value(after).ok(),
            Self::BalanceApplied { after, .. } => serde_json::to_value(after).ok(),
        }
    }
}

/// An append-only audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier.
    pub id: AuditRecordId,
    /// Company the mutation belongs to.
    pub company_id: CompanyId,
    /// Actor who performed the mutation.
    pub actor: ActorId,
    /// When the mutation happened.
    pub timestamp: DateTime<Utc>,
    /// Correlation ID tying related records together.
    pub correlation_id: CorrelationId,
    /// The typed change description.
    pub change: AuditChange,
}

impl AuditRecord {
    /// Creates a new audit record.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        actor: ActorId,
        correlation_id: CorrelationId,
        timestamp: DateTime<Utc>,
        change: AuditChange,
    ) -> Self {
        Self {
            id: AuditRecordId::new(),
            company_id,
            actor,
            timestamp,
            correlation_id,
            change,
        }
    }

    /// The coarse action class.
    #[must_use]
    pub const fn action(&self) -> AuditAction {
        self.change.action()
    }

    /// The kind of entity described.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.change.entity_type()
    }

    /// The id of the entity described.
    #[must_use]
    pub fn entity_id(&self) -> Uuid {
        self.change.entity_id()
    }

    /// Ordering key: timestamp ascending, then id ascending.
    #[must_use]
    pub fn sort_key(&self) -> (DateTime<Utc>, AuditRecordId) {
        (self.timestamp, self.id)
    }
}

/// Filter options for audit trail queries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Filter by entity type.
    pub entity_type: Option<EntityType>,
    /// Filter by entity id.
    pub entity_id: Option<Uuid>,
    /// Filter by actor.
    pub actor: Option<ActorId>,
    /// Filter by correlation id.
    pub correlation_id: Option<CorrelationId>,
    /// Only records at or after this time.
    pub from: Option<DateTime<Utc>>,
    /// Only records at or before this time.
    pub to: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Returns true if the record matches every set filter field.
    #[must_use]
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.entity_type
            .is_none_or(|t| record.entity_type() == t)
            && self.entity_id.is_none_or(|id| record.entity_id() == id)
            && self.actor.is_none_or(|a| record.actor == a)
            && self
                .correlation_id
                .is_none_or(|c| record.correlation_id == c)
            && self.from.is_none_or(|t| record.timestamp >= t)
            && self.to.is_none_or(|t| record.timestamp <= t)
    }
}
