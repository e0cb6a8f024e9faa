use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interval between automatic re-fetches, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub poll_interval_ms: u64,
}

impl SyncConfig {
    pub fn with_poll_interval(interval: Duration) -> Self {
        Self {
            poll_interval_ms: interval.as_millis() as u64,
        }
    }

    /// The poll period. Never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_polls_every_five_seconds() {
        assert_eq!(SyncConfig::default().poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = SyncConfig { poll_interval_ms: 0 };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn missing_field_uses_default() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config, SyncConfig::default());
        let config: SyncConfig = toml::from_str("poll_interval_ms = 250").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }
}
