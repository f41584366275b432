//! Error types for the cooperative account services
//!
//! This module provides a unified error handling system shared by the account
//! service and the HTTP gateway. Business-rule failures (`AccountNotFound`,
//! `Conflict`, `ConcurrentModification`) carry the exact message returned to
//! callers; everything else is treated as a failure of the request.

use std::fmt::Display;
use thiserror::Error;

/// Account service error type
#[derive(Debug, Error)]
pub enum Error {
    /// The id does not resolve to an active account
    #[error("{0}")]
    AccountNotFound(String),

    /// Business-rule violation: duplicate number, inactive account,
    /// insufficient balance
    #[error("{0}")]
    Conflict(String),

    /// The account changed between read and write
    #[error("{0}")]
    ConcurrentModification(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    /// Account lookup by id came back empty
    pub fn account_not_found() -> Self {
        Error::AccountNotFound("account not found".to_string())
    }

    /// Returns true for failures the caller can fix by changing input or state
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Error::AccountNotFound(_) | Error::Conflict(_) | Error::ConcurrentModification(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            // Business-rule messages are returned to callers unchanged.
            if e.is_business_rule() {
                return e;
            }

            let context = context_fn().to_string();
            match e {
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                other => other,
            }
        })
    }
}
