//! Oracle boundary: the remote (or random) decision maker behind NPC seats
//! and cheat judgments.

mod config;
pub mod http;
pub mod payloads;
mod random;
pub mod registry;
mod trait_def;
pub mod validate;

pub use config::OracleConfig;
pub use http::HttpOracle;
pub use random::RandomOracle;
pub use trait_def::{Oracle, OracleError};
