//! Global subscriber setup driven by `[observability]` config.

pub mod spans;

use tracing_subscriber::{fmt, EnvFilter};

use causeway_core::config::ObservabilityConfig;
use causeway_core::errors::{CausewayError, CausewayResult};

/// Install the global `fmt` subscriber. `RUST_LOG` wins over the configured
/// level. Returns `false` when a subscriber was already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> CausewayResult<bool> {
    let filter = build_filter(config)?;
    let installed = if config.json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init()
            .is_ok()
    };
    Ok(installed)
}

/// Filter from `RUST_LOG` if set and valid, else from `config.log_level`.
pub fn build_filter(config: &ObservabilityConfig) -> CausewayResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| CausewayError::ConfigError(format!("invalid log level: {e}")))
}
