//! Repository for account data
//!
//! Every read path only sees active rows; soft-deleted accounts stay in
//! storage but are invisible here. `save` is a compare-and-swap on
//! `Account::version`, so a read-modify-write that lost a race fails with
//! `Error::ConcurrentModification` instead of overwriting the winner.

mod in_memory;
mod postgres;

use async_trait::async_trait;
use common::error::Result;
use common::model::account::Account;
use uuid::Uuid;

pub use in_memory::InMemoryAccountRepository;
pub use postgres::PostgresAccountRepository;

/// Account repository trait defining the interface for account data storage
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new account, failing with a conflict if its number is
    /// already held by another active account
    async fn insert(&self, account: Account) -> Result<Account>;

    /// Get an active account by ID
    async fn find_active(&self, id: Uuid) -> Result<Option<Account>>;

    /// Get the active account holding a number
    async fn find_active_by_number(&self, account_number: &str) -> Result<Option<Account>>;

    /// All active accounts of an owner, newest first
    async fn list_active_by_owner(&self, owner_id: &str) -> Result<Vec<Account>>;

    /// All active accounts whose status is ACTIVE
    async fn list_open(&self) -> Result<Vec<Account>>;

    /// Write back an account read earlier; returns the stored row with its
    /// bumped version
    async fn save(&self, account: Account) -> Result<Account>;
}

pub(crate) fn duplicate_number() -> common::Error {
    common::Error::Conflict("account number already exists".to_string())
}

pub(crate) fn stale_version(id: Uuid) -> common::Error {
    common::Error::ConcurrentModification(format!("account {} was modified concurrently", id))
}
