// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_DELIVERY_TIMEOUT_MS, DEFAULT_INBOX_CAPACITY, DEFAULT_THROTTLE_LIMIT,
    DEFAULT_TICK_BUFFER,
};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for an [`Engine`](crate::runtime::Engine).
///
/// Every field is optional in YAML and falls back to the built-in default.
///
/// # Fields
/// * `throttle_limit` - in-flight messages the ingress mailbox admits
/// * `inbox_capacity` - usable slots in each actor's private inbox
/// * `delivery_timeout_ms` - how long a broadcast waits on a full child inbox
/// * `tick_buffer` - bounded channel size between actor loops and the sink
///
/// # Example
/// ```yaml
/// throttle_limit: 256
/// inbox_capacity: 64
/// delivery_timeout_ms: 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub throttle_limit: usize,
    pub inbox_capacity: usize,
    pub delivery_timeout_ms: u64,
    pub tick_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            throttle_limit: DEFAULT_THROTTLE_LIMIT,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            delivery_timeout_ms: DEFAULT_DELIVERY_TIMEOUT_MS,
            tick_buffer: DEFAULT_TICK_BUFFER,
        }
    }
}

impl RuntimeConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("throttle_limit", self.throttle_limit as u64),
            ("inbox_capacity", self.inbox_capacity as u64),
            ("delivery_timeout_ms", self.delivery_timeout_ms),
            ("tick_buffer", self.tick_buffer as u64),
        ];

        for (field, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Parse a YAML string into a validated [`RuntimeConfig`].
pub fn parse_config(yaml: &str) -> Result<RuntimeConfig, ConfigError> {
    let config: RuntimeConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a [`RuntimeConfig`] from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RuntimeConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}
