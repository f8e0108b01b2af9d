//! Engine configuration.
//!
//! Provides [`SignerConfig`]. Values are loaded from environment variables by
//! the binary; embedding gateways construct it directly.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default prefix for every variable the engine publishes.
pub const DEFAULT_VARIABLE_PREFIX: &str = "sign_";

/// URL signing engine configuration.
///
/// # Examples
///
/// ```
/// use gcsign_core::SignerConfig;
///
/// let config = SignerConfig::default();
/// assert_eq!(config.variable_name("signedurl"), "sign_signedurl");
///
/// let config = SignerConfig::builder().variable_prefix("gcs_".to_owned()).build();
/// assert_eq!(config.variable_name("signature"), "gcs_signature");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SignerConfig {
    /// Prefix prepended to every published variable name.
    #[builder(default = String::from(DEFAULT_VARIABLE_PREFIX))]
    pub variable_prefix: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            variable_prefix: String::from(DEFAULT_VARIABLE_PREFIX),
            log_level: String::from("info"),
        }
    }
}

impl SignerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GCSIGN_VARIABLE_PREFIX` | `sign_` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GCSIGN_VARIABLE_PREFIX") {
            config.variable_prefix = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The full name of a published variable.
    #[must_use]
    pub fn variable_name(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.variable_prefix)
    }
}
