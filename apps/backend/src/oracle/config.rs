//! Per-oracle configuration.
//!
//! Standard fields are typed; anything implementation specific stays in
//! `custom` and is queried by the implementation that understands it.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Configuration handed to an oracle factory.
///
/// ```json
/// {"seed": 12345, "cheat_rate": 40}
/// {"url": "http://localhost:8700", "timeout_ms": 8000}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// RNG seed for reproducible decisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(flatten)]
    pub custom: JsonValue,
}

impl OracleConfig {
    /// Unparseable input yields an empty config.
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        config
            .and_then(|json| serde_json::from_value(json.clone()).ok())
            .unwrap_or_else(Self::empty)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_custom(&self, key: &str) -> Option<&JsonValue> {
        self.custom.get(key)
    }

    pub fn custom_str(&self, key: &str) -> Option<&str> {
        self.get_custom(key).and_then(JsonValue::as_str)
    }

    pub fn custom_u64(&self, key: &str) -> Option<u64> {
        self.get_custom(key).and_then(JsonValue::as_u64)
    }

    pub fn empty() -> Self {
        Self {
            seed: None,
            custom: JsonValue::Object(serde_json::Map::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::empty()
        }
    }

    /// Set a custom field, replacing any previous value.
    pub fn with_custom(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        if let JsonValue::Object(map) = &mut self.custom {
            map.insert(key.to_owned(), value.into());
        }
        self
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::empty()
    }
}
