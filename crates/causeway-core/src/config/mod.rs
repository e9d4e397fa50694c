//! Configuration loaded from TOML. Every section falls back to defaults,
//! so an empty document is a valid config.

pub mod defaults;
mod observability_config;
mod storage_config;
mod threshold_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use threshold_config::{ThresholdConfig, ThresholdOverrides};

use crate::errors::{CausewayError, CausewayResult};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CausewayConfig {
    pub storage: StorageConfig,
    pub thresholds: ThresholdConfig,
    pub observability: ObservabilityConfig,
}

impl CausewayConfig {
    /// Parse a TOML document.
    pub fn from_toml(source: &str) -> CausewayResult<Self> {
        toml::from_str(source).map_err(|e| CausewayError::ConfigError(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> CausewayResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            CausewayError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&source)
    }
}
