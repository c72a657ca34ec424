//! Runtime configuration read from the environment
//!
//! # Environment Variables
//!
//! - `PORT` - Server port number (default: 8080)
//! - `DATABASE_URL` - Path to database file (default: "ads.db")
//! - `AUTHORIZATION` - Optional shared token required on API routes
//! - `RUST_LOG` - Tracing filter (default: "adpulse=debug,tower_http=debug")

use std::env;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "ads.db";
pub const DEFAULT_LOG_FILTER: &str = "adpulse=debug,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub auth_token: Option<String>,
    pub log_filter: String,
}

impl Config {
    /// Reads configuration from the process environment
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// Unparseable or missing values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url = lookup("DATABASE_URL")
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let auth_token = lookup("AUTHORIZATION").filter(|token| !token.is_empty());

        let log_filter = lookup("RUST_LOG")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            port,
            database_url,
            auth_token,
            log_filter,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
