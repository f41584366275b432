//! Application configuration

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listening address
    pub addr: String,
    /// Database URL
    pub database_url: Option<String>,
    /// Serve from the in-memory repository instead of PostgreSQL
    pub in_memory: bool,
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn new() -> Self {
        Self {
            addr: env::var("API_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
            in_memory: env::var("IN_MEMORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
