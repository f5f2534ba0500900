//! Tracing subscriber setup for hosts and tools that embed the library.
//!
//! The library itself only emits `tracing` events; nothing is printed until
//! a subscriber is installed.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;
use crate::error::{Result, SaveError};

/// Install a global fmt subscriber. `RUST_LOG` wins over the configured
/// level when set.
///
/// # Errors
/// Returns [`SaveError::Config`] if the level is not a valid filter or a
/// global subscriber is already installed.
pub fn init_tracing(general: &GeneralConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&general.log_level)
            .map_err(|e| SaveError::Config(format!("invalid log level `{}`: {e}", general.log_level)))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| SaveError::Config(format!("tracing already initialised: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once() {
        let general = GeneralConfig::default();
        init_tracing(&general).expect("first install");
        let err = init_tracing(&general).expect_err("second install");
        assert!(matches!(err, SaveError::Config(_)));
    }
}
