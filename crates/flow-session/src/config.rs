//! # Session Configuration
//!
//! Tuning knobs for the payment session. Defaults match the gateway's
//! production behavior: 5 second status polls under a 10 minute ceiling,
//! five tolerated consecutive poll failures, and at most ten intent
//! regenerations per session.

use std::time::Duration;

/// Configuration for a payment session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Gap between status polls
    pub poll_interval: Duration,

    /// Absolute lifetime ceiling for polling one intent
    pub poll_ceiling: Duration,

    /// Consecutive poll failures tolerated before giving up
    pub poll_failure_threshold: u32,

    /// Regenerations allowed per session before failing out
    pub max_regenerations: u32,
}

impl SessionConfig {
    /// Builder: set the poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builder: set the polling ceiling
    pub fn with_poll_ceiling(mut self, ceiling: Duration) -> Self {
        self.poll_ceiling = ceiling;
        self
    }

    /// Builder: set the consecutive-failure threshold
    pub fn with_poll_failure_threshold(mut self, threshold: u32) -> Self {
        self.poll_failure_threshold = threshold;
        self
    }

    /// Builder: set the regeneration cap
    pub fn with_max_regenerations(mut self, cap: u32) -> Self {
        self.max_regenerations = cap;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            poll_ceiling: Duration::from_secs(600),
            poll_failure_threshold: 5,
            max_regenerations: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.poll_ceiling, Duration::from_secs(600));
        assert_eq!(config.poll_failure_threshold, 5);
        assert_eq!(config.max_regenerations, 10);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_poll_interval(Duration::from_secs(2))
            .with_max_regenerations(3);
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.max_regenerations, 3);
    }
}
