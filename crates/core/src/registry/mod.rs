//! Chart of accounts registry.
//!
//! This module owns the account domain types and the pure rules for
//! account creation, hierarchy shape, and deactivation:
//! - Account types and normal balance sides
//! - Parent/child hierarchy validation (acyclic, type-consistent)
//! - Deactivation guards (nonzero balance, open drafts)

pub mod error;
pub mod service;
pub mod types;

pub use error::RegistryError;
pub use service::RegistryService;
pub use types::{Account, AccountFilter, AccountType, NewAccount, NormalSide};
