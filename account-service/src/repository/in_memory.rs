use async_trait::async_trait;
use chrono::Utc;
use common::decimal::{precision, Balance};
use common::error::{Error, Result};
use common::model::account::Account;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use super::{duplicate_number, stale_version, AccountRepository};

/// In-memory repository for account data
pub struct InMemoryAccountRepository {
    /// Accounts by ID, including soft-deleted ones
    pub accounts: DashMap<Uuid, Account>,
    /// Account number -> ID, active accounts only
    numbers: DashMap<String, Uuid>,
}

impl InMemoryAccountRepository {
    /// Create a new in-memory account repository
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            numbers: DashMap::new(),
        }
    }

    /// Reserve a number for `id`; succeeds if `id` already holds it
    fn claim_number(&self, account_number: &str, id: Uuid) -> Result<()> {
        match self.numbers.entry(account_number.to_string()) {
            Entry::Occupied(holder) if *holder.get() != id => Err(duplicate_number()),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn release_number(&self, account_number: &str, id: Uuid) {
        self.numbers.remove_if(account_number, |_, holder| *holder == id);
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, mut account: Account) -> Result<Account> {
        debug!("Inserting account {} ({})", account.id, account.account_number);

        if account.active {
            self.claim_number(&account.account_number, account.id)?;
        }
        account.balance = precision::normalize_balance(account.balance);

        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts
            .get(&id)
            .filter(|a| a.active)
            .map(|a| a.clone()))
    }

    async fn find_active_by_number(&self, account_number: &str) -> Result<Option<Account>> {
        let id = match self.numbers.get(account_number) {
            Some(holder) => *holder,
            None => return Ok(None),
        };
        self.find_active(id).await
    }

    async fn list_active_by_owner(&self, owner_id: &str) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self.accounts
            .iter()
            .filter(|entry| entry.active && entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();

        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn list_open(&self) -> Result<Vec<Account>> {
        Ok(self.accounts
            .iter()
            .filter(|entry| entry.is_open_for_business())
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn save(&self, mut account: Account) -> Result<Account> {
        debug!("Saving account {} at version {}", account.id, account.version);

        if account.balance < Balance::ZERO {
            return Err(Error::Internal(format!("Negative balance on account {}", account.id)));
        }

        let mut stored = self.accounts
            .get_mut(&account.id)
            .ok_or_else(Error::account_not_found)?;

        if stored.version != account.version {
            return Err(stale_version(account.id));
        }

        let number_changed = stored.account_number != account.account_number;
        if account.active && (number_changed || !stored.active) {
            self.claim_number(&account.account_number, account.id)?;
        }
        if stored.active && (number_changed || !account.active) {
            self.release_number(&stored.account_number, account.id);
        }

        account.version += 1;
        account.updated_at = Utc::now();
        account.balance = precision::normalize_balance(account.balance);

        *stored = account.clone();
        Ok(account)
    }
}
