//! How to register an oracle
//!
//! 1) Implement `Oracle` for your type in its module.
//! 2) Add an `OracleFactory` entry to the static list with a stable `name` and `version`.
//! 3) Constructors read what they need from `OracleConfig` and do no I/O.
//! 4) Same seed, same decisions (where applicable).

use std::sync::Arc;

use super::config::OracleConfig;
use super::http::HttpOracle;
use super::random::RandomOracle;
use super::trait_def::{Oracle, OracleError};

pub struct OracleFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(&OracleConfig) -> Result<Arc<dyn Oracle>, OracleError>,
}

static ORACLE_FACTORIES: &[OracleFactory] = &[
    OracleFactory {
        name: RandomOracle::NAME,
        version: RandomOracle::VERSION,
        make: make_random,
    },
    OracleFactory {
        name: HttpOracle::NAME,
        version: HttpOracle::VERSION,
        make: make_http,
    },
];

pub fn registered_oracles() -> &'static [OracleFactory] {
    ORACLE_FACTORIES
}

pub fn by_name(name: &str) -> Option<&'static OracleFactory> {
    registered_oracles().iter().find(|f| f.name == name)
}

fn make_random(config: &OracleConfig) -> Result<Arc<dyn Oracle>, OracleError> {
    Ok(Arc::new(RandomOracle::from_config(config)))
}

fn make_http(config: &OracleConfig) -> Result<Arc<dyn Oracle>, OracleError> {
    Ok(Arc::new(HttpOracle::from_config(config)?))
}
