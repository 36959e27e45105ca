//! Stopwatch settings
//!
//! ```yaml
//! refresh_rate: Native
//! geocode_timeout_ms: 5000
//! upload_enabled: true
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::RefreshRate;
use crate::{Result, StopwatchError};

/// Default upper bound on a reverse geocoding lookup.
pub const DEFAULT_GEOCODE_TIMEOUT_MS: u64 = 5_000;

/// Stopwatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(default, deny_unknown_fields)]
pub struct StopwatchConfig {
    /// Rate at which the display is refreshed from the clock driver
    pub refresh_rate: RefreshRate,
    /// Upper bound on the reverse geocoding lookup at finalize
    pub geocode_timeout_ms: u64,
    /// Send a summary of each finalized session to the uploader
    pub upload_enabled: bool,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            refresh_rate: RefreshRate::Native,
            geocode_timeout_ms: DEFAULT_GEOCODE_TIMEOUT_MS,
            upload_enabled: true,
        }
    }
}

impl StopwatchConfig {
    /// Parse and validate settings from YAML. Missing fields take defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| StopwatchError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| StopwatchError::encode("stopwatch config", e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.geocode_timeout_ms == 0 {
            return Err(StopwatchError::invalid_config("geocode_timeout_ms must be positive"));
        }
        Ok(())
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }
}
