use std::time::Duration;

use crate::config::ApiConfig;

/// Timeouts applied to every backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Time allowed to establish a connection.
    pub connect: Duration,
    /// Total time allowed for a call, body included.
    pub request: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            request: Duration::from_secs(15),
        }
    }
}

impl From<&ApiConfig> for TimeoutConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            connect: Duration::from_secs(api.connect_timeout_seconds as u64),
            request: Duration::from_secs(api.timeout_seconds as u64),
        }
    }
}
