#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod oracle;
pub mod services;
pub mod telemetry;

// Re-exports for public API
pub use config::{oracle_from_env, GameSettings, OracleSettings};
pub use error::AppError;
pub use errors::domain::DomainError;
pub use errors::ErrorCode;
pub use oracle::{HttpOracle, Oracle, OracleConfig, OracleError, RandomOracle};
pub use services::{GameFlowMutationResult, GameFlowService, GameStore, InMemoryGameStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
