use std::sync::Arc;

use tracing::info;

use super::{env_or, must_var};
use crate::error::AppError;
use crate::oracle::http::DEFAULT_TIMEOUT_MS;
use crate::oracle::registry::by_name;
use crate::oracle::{HttpOracle, Oracle, OracleConfig, RandomOracle};

/// Which oracle to build and how.
#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub kind: String,
    pub config: OracleConfig,
}

impl OracleSettings {
    /// `ORACLE_KIND` (default `random`); `ORACLE_URL` is required for `http`.
    pub fn from_env() -> Result<Self, AppError> {
        let kind: String = env_or("ORACLE_KIND", RandomOracle::NAME.to_owned())?;
        let seed: u64 = env_or("ORACLE_SEED", 0)?;
        let mut config = OracleConfig::empty();
        config.seed = (seed != 0).then_some(seed);
        if kind == HttpOracle::NAME {
            config = config
                .with_custom("url", must_var("ORACLE_URL")?)
                .with_custom("timeout_ms", env_or("ORACLE_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?);
        }
        Ok(Self { kind, config })
    }

    pub fn build(&self) -> Result<Arc<dyn Oracle>, AppError> {
        let factory = by_name(&self.kind)
            .ok_or_else(|| AppError::config(format!("Unknown oracle kind '{}'", self.kind)))?;
        let oracle = (factory.make)(&self.config)
            .map_err(|e| AppError::config(format!("Oracle '{}': {e}", self.kind)))?;
        info!(kind = factory.name, version = factory.version, "oracle ready");
        Ok(oracle)
    }
}

pub fn oracle_from_env() -> Result<Arc<dyn Oracle>, AppError> {
    OracleSettings::from_env()?.build()
}
