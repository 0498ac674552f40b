//! Configuration loaded from `config.toml`, overridable from the command line.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, Config, FeedConfig, SessionConfig};
