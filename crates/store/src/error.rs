//! Aggregated error taxonomy for the store layer.
//!
//! Each core module keeps its own error enum; this type collects them at
//! the operation surface and adds the failures only the store can produce
//! (missing entities, authorization denials, deadline expiry).

use tally_core::balance::BalanceError;
use tally_core::journal::ValidationError;
use tally_core::posting::StateError;
use tally_core::registry::RegistryError;
use tally_shared::types::{AccountId, ActorId, CompanyId, EntryId};
use thiserror::Error;

use crate::authorize::LedgerAction;

/// Errors returned by ledger operations and queries.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Double-entry validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle transition was illegal.
    #[error(transparent)]
    State(#[from] StateError),

    /// A chart of accounts rule was violated.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The balance engine rejected a posting.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// No account with the given id exists.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No journal entry with the given id exists.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(EntryId),

    /// The authorizer denied the action.
    #[error("Actor {actor} may not {action} for company {company_id}")]
    Unauthorized {
        /// The denied actor.
        actor: ActorId,
        /// The attempted action.
        action: LedgerAction,
        /// The company the action targeted.
        company_id: CompanyId,
    },

    /// A read query ran past its deadline.
    #[error("Query deadline exceeded")]
    DeadlineExceeded,

    /// The store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    StorePoisoned,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::State(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Balance(e) => e.error_code(),
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::StorePoisoned => "STORE_POISONED",
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Balance(e) => e.is_retryable(),
            Self::DeadlineExceeded => true,
            _ => false,
        }
    }
}
