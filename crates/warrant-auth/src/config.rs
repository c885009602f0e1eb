//! Token authority configuration.
//!
//! The secret is deliberately absent from this configuration: it is
//! provisioned by the caller and handed to the authority directly.
//!
//! # Example (TOML)
//!
//! ```toml
//! [authority]
//! digest = "sha256"
//! default_validity = "30d"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::token::claims::DEFAULT_VALIDITY;
use crate::token::signer::DigestAlgorithm;

/// Token authority configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Digest algorithm underlying the token MAC.
    /// Supported: "sha256", "sha384", "sha512"
    pub digest: String,

    /// Lifetime of tokens issued without an explicit validity.
    #[serde(with = "humantime_serde")]
    pub default_validity: Duration,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            digest: DigestAlgorithm::default().as_str().to_string(),
            default_validity: DEFAULT_VALIDITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// The configuration source could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    authority: AuthorityConfig,
}

impl AuthorityConfig {
    /// Parses the `[authority]` table of a TOML document.
    ///
    /// A document without the table yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the document is not valid TOML, or any
    /// error from [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
        file.authority.validate()?;
        Ok(file.authority)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if the file cannot be read, or any error
    /// from [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Returns the configured digest algorithm.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown algorithm name.
    pub fn digest_algorithm(&self) -> Result<DigestAlgorithm, ConfigError> {
        self.digest.parse().map_err(ConfigError::InvalidValue)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `digest` is not a supported algorithm
    /// - `default_validity` is zero or does not fit a Unix timestamp
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.digest_algorithm()?;

        if self.default_validity.is_zero() {
            return Err(ConfigError::InvalidValue(
                "default_validity must be > 0".to_string(),
            ));
        }

        if i64::try_from(self.default_validity.as_secs()).is_err() {
            return Err(ConfigError::InvalidValue(
                "default_validity is too large".to_string(),
            ));
        }

        Ok(())
    }
}
