//! Cache configuration

use std::time::Duration;
use warden_common::CacheSettings;

/// Settings cache configuration
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Sliding time-to-live; every hit restarts it
    pub ttl: Duration,
    /// Interval between sweeps of expired entries
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(2 * 60 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    /// Set the time-to-live
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the sweep interval
    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            ttl: settings.ttl(),
            sweep_interval: settings.sweep_interval(),
        }
    }
}
