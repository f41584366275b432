use async_trait::async_trait;
use common::db::{self, DbAccount, DbPool};
use common::decimal::precision;
use common::error::{Error, Result};
use common::model::account::Account;
use tracing::{debug, info};
use uuid::Uuid;

use super::{duplicate_number, stale_version, AccountRepository};
use crate::config::AccountServiceConfig;

const ACCOUNT_COLUMNS: &str = "id, owner_id, account_number, balance, account_type, status, \
                               active, version, created_at, updated_at";

/// PostgreSQL repository for account data
pub struct PostgresAccountRepository {
    /// Database connection pool
    pool: DbPool,
}

impl PostgresAccountRepository {
    /// Wrap an existing pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connect using the service configuration, applying migrations if enabled
    pub async fn with_config(config: &AccountServiceConfig) -> Result<Self> {
        info!("Connecting to PostgreSQL database with pool size: {}", config.db_pool_size);

        let pool = db::connect(&config.database_url, config.db_pool_size).await?;
        if config.run_migrations {
            db::run_migrations(&pool).await?;
        }

        Ok(Self::new(pool))
    }
}

/// Map a unique-index violation on the account number to a conflict
fn map_unique_violation(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => duplicate_number(),
        _ => Error::Database(err),
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(&self, account: Account) -> Result<Account> {
        debug!("Inserting account {} into database", account.id);

        let row: DbAccount = sqlx::query_as(&format!(
            "INSERT INTO accounts (id, owner_id, account_number, balance, account_type, status,
                                   active, version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(account.id)
        .bind(&account.owner_id)
        .bind(&account.account_number)
        .bind(precision::normalize_balance(account.balance))
        .bind(account.account_type.as_str())
        .bind(account.status.as_str())
        .bind(account.active)
        .bind(account.version)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        row.try_into()
    }

    async fn find_active(&self, id: Uuid) -> Result<Option<Account>> {
        debug!("Getting account from database: {}", id);

        let row: Option<DbAccount> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE id = $1 AND active",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_active_by_number(&self, account_number: &str) -> Result<Option<Account>> {
        debug!("Looking up active account number {}", account_number);

        let row: Option<DbAccount> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE account_number = $1 AND active",
            ACCOUNT_COLUMNS
        ))
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn list_active_by_owner(&self, owner_id: &str) -> Result<Vec<Account>> {
        debug!("Listing accounts for owner {}", owner_id);

        let rows: Vec<DbAccount> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE owner_id = $1 AND active ORDER BY created_at DESC",
            ACCOUNT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn list_open(&self) -> Result<Vec<Account>> {
        let rows: Vec<DbAccount> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE active AND status = 'ACTIVE'",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Account::try_from).collect()
    }

    async fn save(&self, account: Account) -> Result<Account> {
        debug!("Updating account {} at version {}", account.id, account.version);

        let row: Option<DbAccount> = sqlx::query_as(&format!(
            "UPDATE accounts
             SET owner_id = $2,
                 account_number = $3,
                 balance = $4,
                 account_type = $5,
                 status = $6,
                 active = $7,
                 version = version + 1,
                 updated_at = NOW()
             WHERE id = $1 AND version = $8
             RETURNING {}",
            ACCOUNT_COLUMNS
        ))
        .bind(account.id)
        .bind(&account.owner_id)
        .bind(&account.account_number)
        .bind(precision::normalize_balance(account.balance))
        .bind(account.account_type.as_str())
        .bind(account.status.as_str())
        .bind(account.active)
        .bind(account.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        match row {
            Some(row) => row.try_into(),
            None => Err(stale_version(account.id)),
        }
    }
}
