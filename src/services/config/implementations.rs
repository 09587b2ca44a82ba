// 設定管理の具象実装

use crate::core::EngineConfig;
use std::time::Duration;

/// コンソールのポーリング間隔の既定値
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultEngineConfig {
    poll_interval: Duration,
    file_timeout: Option<Duration>,
}

impl DefaultEngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_file_timeout(mut self, file_timeout: Option<Duration>) -> Self {
        self.file_timeout = file_timeout;
        self
    }
}

impl Default for DefaultEngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            file_timeout: None,
        }
    }
}

impl EngineConfig for DefaultEngineConfig {
    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn file_timeout(&self) -> Option<Duration> {
        self.file_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_config() {
        let config = DefaultEngineConfig::default();

        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert!(config.file_timeout().is_none());
    }

    #[test]
    fn test_engine_config_builder() {
        let config = DefaultEngineConfig::new()
            .with_poll_interval(Duration::from_millis(250))
            .with_file_timeout(Some(Duration::from_secs(30)));

        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.file_timeout(), Some(Duration::from_secs(30)));
    }
}
