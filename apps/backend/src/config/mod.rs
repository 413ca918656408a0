//! Environment-driven configuration, read once at startup.

pub mod game;
pub mod oracle;

use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Parse an optional variable, using `default` when unset or blank.
pub(crate) fn env_or<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("Environment variable '{name}' has an invalid value: '{raw}'"))),
        _ => Ok(default),
    }
}

/// Get required environment variable or return error
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

pub use game::GameSettings;
pub use oracle::{oracle_from_env, OracleSettings};
