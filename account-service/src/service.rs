//! Account service implementation

use std::sync::Arc;

use common::decimal::{precision, Amount};
use common::error::{Error, ErrorExt, Result};
use common::model::account::{Account, AccountDraft, AccountStatus};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AccountServiceConfig;
use crate::repository::{AccountRepository, InMemoryAccountRepository, PostgresAccountRepository};

/// Account service for the cooperative's account lifecycle and balances
pub struct AccountService {
    /// Repository for account data
    repo: Arc<dyn AccountRepository>,
}

/// Repository Type
pub enum RepositoryType {
    /// In-memory repository
    InMemory,
    /// PostgreSQL repository
    Postgres(AccountServiceConfig),
}

impl AccountService {
    /// Create a new account service backed by memory
    pub fn new() -> Self {
        Self::from_repository(Arc::new(InMemoryAccountRepository::new()))
    }

    /// Create a service over an existing repository
    pub fn from_repository(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    /// Create a new account service with a specific repository type
    pub async fn with_repository(repo_type: RepositoryType) -> Result<Self> {
        let repo: Arc<dyn AccountRepository> = match repo_type {
            RepositoryType::InMemory => Arc::new(InMemoryAccountRepository::new()),
            RepositoryType::Postgres(config) => {
                Arc::new(PostgresAccountRepository::with_config(&config).await?)
            }
        };

        Ok(Self { repo })
    }

    /// Create a new account service with a configuration
    pub async fn with_config(config: &AccountServiceConfig) -> Result<Self> {
        Self::with_repository(RepositoryType::Postgres(config.clone())).await
    }

    /// Open a new account
    pub async fn create_account(&self, draft: AccountDraft) -> Result<Account> {
        draft.validate()?;
        info!("Creating account {} for owner {}", draft.account_number, draft.owner_id);

        if self.repo.find_active_by_number(&draft.account_number).await?.is_some() {
            return Err(Error::Conflict("account number already exists".to_string()));
        }

        self.repo.insert(Account::open(draft)).await
            .with_context(|| "Failed to persist new account")
    }

    /// Replace owner, number, type and balance of an account
    pub async fn update_account(&self, id: Uuid, draft: AccountDraft) -> Result<Account> {
        draft.validate()?;
        info!("Updating account {}", id);

        let mut account = self.load(id).await?;

        if draft.account_number != account.account_number {
            debug!("Account {} changes number to {}", id, draft.account_number);
            if self.repo.find_active_by_number(&draft.account_number).await?.is_some() {
                return Err(Error::Conflict("account number already in use".to_string()));
            }
        }

        account.replace(draft);
        self.repo.save(account).await
            .with_context(|| format!("Failed to update account {}", id))
    }

    /// Get an active account by ID
    pub async fn get_account(&self, id: Uuid) -> Result<Account> {
        self.load(id).await
    }

    /// Active accounts of an owner, newest first
    pub async fn list_accounts_by_owner(&self, owner_id: &str) -> Result<Vec<Account>> {
        self.repo.list_active_by_owner(owner_id).await
    }

    /// Active accounts in ACTIVE status
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.repo.list_open().await
    }

    /// Soft-delete an account
    pub async fn delete_account(&self, id: Uuid) -> Result<()> {
        info!("Deleting account {}", id);

        let mut account = self.load(id).await?;
        account.close();
        self.repo.save(account).await
            .with_context(|| format!("Failed to delete account {}", id))?;

        Ok(())
    }

    /// Withdraw funds from an account
    pub async fn withdraw(&self, id: Uuid, amount: Amount) -> Result<Account> {
        precision::check_positive(amount, "amount")?;
        info!("Withdrawing {} from account {}", amount, id);

        let mut account = self.load(id).await?;
        if let Err(e) = account.withdraw(amount) {
            warn!("Withdrawal of {} from account {} refused: {}", amount, id, e);
            return Err(e);
        }

        self.repo.save(account).await
            .with_context(|| format!("Failed to update balance after withdrawal for account {}", id))
    }

    /// Deposit funds into an account
    pub async fn deposit(&self, id: Uuid, amount: Amount) -> Result<Account> {
        precision::check_positive(amount, "amount")?;
        info!("Depositing {} to account {}", amount, id);

        let mut account = self.load(id).await?;
        account.deposit(amount)?;

        self.repo.save(account).await
            .with_context(|| format!("Failed to update balance after deposit for account {}", id))
    }

    /// Suspend or reactivate an account
    pub async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<Account> {
        if status == AccountStatus::Cancelled {
            return Err(Error::ValidationError(
                "accounts are cancelled by deleting them".to_string(),
            ));
        }
        info!("Setting account {} status to {}", id, status);

        let mut account = self.load(id).await?;
        account.status = status;
        self.repo.save(account).await
            .with_context(|| format!("Failed to change status of account {}", id))
    }

    async fn load(&self, id: Uuid) -> Result<Account> {
        self.repo.find_active(id).await
            .with_context(|| format!("Failed to retrieve account {}", id))?
            .ok_or_else(Error::account_not_found)
    }
}

impl Default for AccountService {
    fn default() -> Self {
        Self::new()
    }
}
