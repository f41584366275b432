//! Account models and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{precision, Amount, Balance};
use crate::error::{Error, Result};
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Kind of product an account represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Savings account
    Savings,
    /// Checking account
    Checking,
    /// Fixed-term deposit
    TermDeposit,
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Open for deposits and withdrawals
    Active,
    /// Visible but blocked from transacting
    Suspended,
    /// Closed by a delete
    Cancelled,
}

impl AccountType {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "SAVINGS",
            AccountType::Checking => "CHECKING",
            AccountType::TermDeposit => "TERM_DEPOSIT",
        }
    }
}

impl AccountStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
            AccountStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SAVINGS" => Ok(AccountType::Savings),
            "CHECKING" => Ok(AccountType::Checking),
            "TERM_DEPOSIT" => Ok(AccountType::TermDeposit),
            other => Err(Error::ValidationError(format!("Unknown account type: {}", other))),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ACTIVE" => Ok(AccountStatus::Active),
            "SUSPENDED" => Ok(AccountStatus::Suspended),
            "CANCELLED" => Ok(AccountStatus::Cancelled),
            other => Err(Error::ValidationError(format!("Unknown account status: {}", other))),
        }
    }
}

/// Where an account sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Stored row is visible to reads, with its current status
    Open(AccountStatus),
    /// Soft-deleted; retained in storage but invisible to every read path
    Closed,
}

/// Fields supplied by a caller when creating or replacing an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    /// Owner reference (cooperative member id, not validated here)
    pub owner_id: String,
    /// Account number, unique among active accounts
    pub account_number: String,
    /// Opening or replacement balance
    pub balance: Balance,
    /// Account type
    pub account_type: AccountType,
}

impl AccountDraft {
    /// Check the field-level preconditions shared by create and update
    pub fn validate(&self) -> Result<()> {
        if self.owner_id.trim().is_empty() {
            return Err(Error::ValidationError("owner_id must not be empty".to_string()));
        }
        if self.account_number.trim().is_empty() {
            return Err(Error::ValidationError("account_number must not be empty".to_string()));
        }
        precision::check_positive(self.balance, "balance")
    }
}

/// Account model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Account {
    /// Unique account ID
    pub id: Uuid,
    /// Owner reference
    pub owner_id: String,
    /// Account number
    pub account_number: String,
    /// Current balance
    #[serde(with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "utoipa", schema(value_type = f64))]
    pub balance: Balance,
    /// Account type
    pub account_type: AccountType,
    /// Account status
    pub status: AccountStatus,
    /// False once the account has been deleted
    pub active: bool,
    /// Optimistic concurrency counter, bumped on every save
    pub version: i64,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Build a new, active account from a validated draft
    pub fn open(draft: AccountDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: draft.owner_id,
            account_number: draft.account_number,
            balance: precision::normalize_balance(draft.balance),
            account_type: draft.account_type,
            status: AccountStatus::Active,
            active: true,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Lifecycle view of the `active` flag and status
    pub fn lifecycle(&self) -> Lifecycle {
        if self.active {
            Lifecycle::Open(self.status)
        } else {
            Lifecycle::Closed
        }
    }

    /// Whether the account shows up in the general listing
    pub fn is_open_for_business(&self) -> bool {
        self.lifecycle() == Lifecycle::Open(AccountStatus::Active)
    }

    /// Fail unless deposits and withdrawals are allowed
    pub fn ensure_transactable(&self) -> Result<()> {
        if self.is_open_for_business() {
            Ok(())
        } else {
            Err(Error::Conflict("account not active".to_string()))
        }
    }

    /// Overwrite the caller-controlled fields (full replace)
    pub fn replace(&mut self, draft: AccountDraft) {
        self.owner_id = draft.owner_id;
        self.account_number = draft.account_number;
        self.account_type = draft.account_type;
        self.balance = precision::normalize_balance(draft.balance);
    }

    /// Add funds to the balance
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        self.ensure_transactable()?;
        let balance = self.balance
            .checked_add(amount)
            .filter(|sum| *sum <= precision::MAX_BALANCE)
            .ok_or_else(|| Error::Conflict("balance limit exceeded".to_string()))?;
        self.balance = precision::normalize_balance(balance);
        Ok(())
    }

    /// Remove funds from the balance
    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        self.ensure_transactable()?;
        if self.balance < amount {
            return Err(Error::Conflict("insufficient balance".to_string()));
        }
        self.balance = precision::normalize_balance(self.balance - amount);
        Ok(())
    }

    /// Soft delete
    pub fn close(&mut self) {
        self.active = false;
        self.status = AccountStatus::Cancelled;
    }
}
