//! # Registry Configuration
//!
//! Deployment configuration: the module account that receives fees and the
//! initial parameter record. Loaded from YAML (`.yaml`/`.yml`) or JSON (any
//! other extension). Missing parameter fields fall back to
//! [`Params::default()`].
//!
//! ```yaml
//! module_account: zkr1registrymodule
//! params:
//!   max_proof_size: 32768
//!   proof_submission_fee: { denom: uzkr, amount: 250 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zkr_core::Address;

use crate::error::RegistryError;
use crate::params::Params;

/// Errors from loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// The file parsed but its contents are invalid.
    #[error("invalid configuration in {path}: {source}")]
    Invalid {
        path: String,
        #[source]
        source: RegistryError,
    },
}

/// Registry deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Account credited with every fee.
    pub module_account: Address,
    #[serde(default)]
    pub params: Params,
}

impl RegistryConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: display.clone(),
            reason: format!("cannot read file: {e}"),
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match ext {
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
        .map_err(|reason| ConfigError::Load {
            path: display.clone(),
            reason,
        })?;

        config.params.validate().map_err(|source| ConfigError::Invalid {
            path: display,
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            module_account = %config.module_account,
            "configuration loaded"
        );
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("invalid YAML: {e}"))
    }

    fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))
    }
}
