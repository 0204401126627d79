use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::error::ConfigError;

/// `RUST_LOG` wins; otherwise everything at `default_level`.
pub fn init_tracing(default_level: &str) -> Result<(), ConfigError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| ConfigError::Logging(err.to_string()))
}
