//! Tracing subscriber setup for hosts embedding the engine.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install a global fmt subscriber. `RUST_LOG` wins over `default_level`.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(default_level: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

pub fn init_from_config(config: &LoggingConfig) -> Result<(), TryInitError> {
    init_tracing(&config.level)
}
