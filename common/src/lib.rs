//! Common types and utilities for the cooperative account services
//!
//! This library contains the shared error type, decimal helpers, the account
//! domain model and database plumbing used by both the account service and
//! the HTTP gateway.

pub mod error;
pub mod model;
pub mod decimal;
pub mod db;

/// Re-export important types
pub use error::{Error, Result, ErrorExt};
pub use decimal::*;

// Re-export database types
pub use db::DbPool;

// Re-export utoipa for use in model ToSchema derives
#[cfg(feature = "utoipa")]
pub use utoipa;
