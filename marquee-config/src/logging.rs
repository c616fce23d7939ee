use anyhow::Context;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::models::LoggingConfig;

/// Install the global fmt subscriber. `RUST_LOG` overrides the configured
/// directive. Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_directive)
            .with_context(|| {
                format!("invalid log directive {:?}", config.default_directive)
            })?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(config.ansi))
        .try_init()
        .context("failed to install tracing subscriber")
}
