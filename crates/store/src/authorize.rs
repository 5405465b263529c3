//! Authorization port for ledger mutations.
//!
//! Every mutating operation names its action and the company it touches,
//! and asks the configured [`Authorizer`] before doing anything else. The
//! ledger never assumes a caller is allowed; a denial is an explicit,
//! typed error, not a silent no-op.

use serde::{Deserialize, Serialize};
use tally_shared::types::{ActorId, CompanyId};

/// A mutating action an actor may or may not be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    /// Create, rename or deactivate chart of accounts entries.
    ManageAccounts,
    /// Submit a journal entry draft.
    SubmitEntry,
    /// Approve a draft entry.
    ApproveEntry,
    /// Post an approved entry.
    PostEntry,
    /// Void a draft or approved entry.
    VoidEntry,
    /// Create a reversal draft for a posted entry.
    ReverseEntry,
}

impl LedgerAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageAccounts => "manage_accounts",
            Self::SubmitEntry => "submit_entry",
            Self::ApproveEntry => "approve_entry",
            Self::PostEntry => "post_entry",
            Self::VoidEntry => "void_entry",
            Self::ReverseEntry => "reverse_entry",
        }
    }
}

impl std::fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether an actor may perform an action for a company.
///
/// Implementations are expected to be cheap and side-effect free; the
/// ledger calls this on every mutation, before opening a transaction.
pub trait Authorizer: Send + Sync {
    /// Returns true if `actor` may perform `action` for `company_id`.
    fn is_authorized(&self, actor: ActorId, action: LedgerAction, company_id: CompanyId) -> bool;
}

/// Permits every action. The default policy for embedded use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self, _actor: ActorId, _action: LedgerAction, _company_id: CompanyId) -> bool {
        true
    }
}

/// Denies every action.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl Authorizer for DenyAll {
    fn is_authorized(&self, _actor: ActorId, _action: LedgerAction, _company_id: CompanyId) -> bool {
        false
    }
}
