//! Shared configuration library for Marquee.
//!
//! Loads the refresh settings, the default user policy and logging options
//! from a TOML/JSON file or the environment, validates them, and installs the
//! tracing subscriber.

pub mod error;
pub mod loader;
pub mod logging;
pub mod models;

pub use error::ConfigError;
pub use loader::{CONFIG_JSON_ENV, CONFIG_PATH_ENV, ConfigLoad, ConfigSource};
pub use logging::init_tracing;
pub use models::{LoggingConfig, MarqueeConfig, RefreshConfig};
