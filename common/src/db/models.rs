use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::decimal::precision;
use crate::error::{Error, Result, ErrorExt};
use crate::model::account::{Account, AccountStatus, AccountType};

/// Database model for the accounts table
#[derive(Debug, Clone, FromRow)]
pub struct DbAccount {
    pub id: Uuid,
    pub owner_id: String,
    pub account_number: String,
    pub balance: Decimal,
    pub account_type: String,
    pub status: String,
    pub active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAccount> for Account {
    type Error = Error;

    fn try_from(row: DbAccount) -> Result<Self> {
        let account_type = row.account_type.parse::<AccountType>()
            .map_err(|e: Error| Error::Internal(e.to_string()))
            .with_context(|| format!("Invalid account_type on account {}", row.id))?;
        let status = row.status.parse::<AccountStatus>()
            .map_err(|e: Error| Error::Internal(e.to_string()))
            .with_context(|| format!("Invalid status on account {}", row.id))?;

        Ok(Account {
            id: row.id,
            owner_id: row.owner_id,
            account_number: row.account_number,
            balance: precision::normalize_balance(row.balance),
            account_type,
            status,
            active: row.active,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
