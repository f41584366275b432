//! API handlers
//!
//! This module contains the API endpoint handlers organized by resource.
//! Each handler follows a consistent pattern:
//! - Extract state and parameters using Axum extractors
//! - Validate input parameters
//! - Call the account service
//! - Map the result or error to a response

pub mod account;
pub mod extract;
pub mod health;
