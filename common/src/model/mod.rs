//! Domain models for the cooperative

pub mod account;

pub use account::{Account, AccountDraft, AccountStatus, AccountType, Lifecycle};
