//! Client configuration

use std::env;
use std::time::Duration;

use influxdb_core::{InfluxError, InfluxResult};
use serde::{Deserialize, Serialize};

/// Batching configuration for the write engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of points that triggers a size-based flush
    pub batch_size: usize,

    /// Interval between periodic flushes in milliseconds (0 disables the
    /// background worker; size-based flushing still applies)
    pub flush_interval_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            flush_interval_ms: 500,
        }
    }
}

impl BatchConfig {
    /// Load configuration from defaults and environment variables
    pub fn load() -> InfluxResult<Self> {
        let mut config = Self::default();

        if let Ok(batch_size) = env::var("INFLUXDB_BATCH_SIZE") {
            config.batch_size = batch_size.parse().map_err(|_| {
                InfluxError::configuration(format!("Invalid INFLUXDB_BATCH_SIZE: {}", batch_size))
            })?;
        }

        if let Ok(interval) = env::var("INFLUXDB_FLUSH_INTERVAL_MS") {
            config.flush_interval_ms = interval.parse().map_err(|_| {
                InfluxError::configuration(format!("Invalid INFLUXDB_FLUSH_INTERVAL_MS: {}", interval))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> InfluxResult<()> {
        if self.batch_size == 0 {
            return Err(InfluxError::configuration("batch_size must be at least 1"));
        }
        Ok(())
    }

    /// The flush interval as a `Duration`
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}
