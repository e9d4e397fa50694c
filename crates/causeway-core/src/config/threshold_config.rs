use serde::{Deserialize, Serialize};

use super::defaults;

/// Hysteresis thresholds, shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Grace period of a new component, in observations.
    pub initializing: u32,
    /// Consecutive abnormal observations to move normal → abnormal.
    pub confirmed: u32,
    /// Consecutive healthy observations to move abnormal → normal.
    pub normal: u32,
}

impl ThresholdConfig {
    /// Return a copy with every `Some` field of `overrides` applied.
    pub fn with_overrides(self, overrides: ThresholdOverrides) -> Self {
        Self {
            initializing: overrides.initializing.unwrap_or(self.initializing),
            confirmed: overrides.confirmed.unwrap_or(self.confirmed),
            normal: overrides.normal.unwrap_or(self.normal),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            initializing: defaults::DEFAULT_INITIALIZING_THRESHOLD,
            confirmed: defaults::DEFAULT_CONFIRMED_THRESHOLD,
            normal: defaults::DEFAULT_NORMAL_THRESHOLD,
        }
    }
}

/// Partial runtime override of [`ThresholdConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub initializing: Option<u32>,
    #[serde(default)]
    pub confirmed: Option<u32>,
    #[serde(default)]
    pub normal: Option<u32>,
}

impl ThresholdOverrides {
    /// Override every threshold at once.
    pub fn all(initializing: u32, confirmed: u32, normal: u32) -> Self {
        Self {
            initializing: Some(initializing),
            confirmed: Some(confirmed),
            normal: Some(normal),
        }
    }
}
