//! Display refresh rate for the clock driver

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Native clock driver frequency: one tick every 10ms.
pub const NATIVE_TICK_HZ: f64 = 100.0;

/// Rate at which a subscriber wants clock ticks delivered
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum RefreshRate {
    /// Every tick of the driver (100Hz)
    #[default]
    Native,

    /// Throttled to at most this many Hz
    /// If the requested rate reaches the driver rate, Native is used
    Max(u32),
}

impl RefreshRate {
    /// Normalize rate against the driver frequency
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            RefreshRate::Native => RefreshRate::Native,
            RefreshRate::Max(hz) if hz as f64 >= source_hz => RefreshRate::Native,
            RefreshRate::Max(0) => RefreshRate::Max(1),
            RefreshRate::Max(hz) => RefreshRate::Max(hz),
        }
    }

    /// Check if throttling is needed
    pub fn needs_throttle(self, source_hz: f64) -> bool {
        matches!(self.normalize(source_hz), RefreshRate::Max(_))
    }

    /// Get throttle interval if needed
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            RefreshRate::Native => None,
            RefreshRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}
