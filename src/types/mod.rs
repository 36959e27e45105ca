//! Core types for the timing engine.
//!
//! - [`TimerPhase`] is the engine's two-state machine (`Idle`, `Running`)
//! - [`LapRecord`] and [`SectorRecord`] are closed timing intervals; their
//!   `Display` output is the canonical stored form (`Lap 3: 00:41:27`)
//! - [`Snapshot`] is what a display refresh reads on every clock tick
//! - [`Coordinate`] is the position handed to reverse geocoding
//!
//! ## Usage Example
//!
//! ```rust
//! use mx_stopwatch::types::{LapRecord, format_time};
//! use std::time::Duration;
//!
//! let lap = LapRecord { index: 2, elapsed: Duration::from_millis(20_000) };
//! assert_eq!(lap.to_string(), "Lap 2: 00:20:00");
//! assert_eq!(format_time(Duration::from_secs_f64(65.256)), "01:05:25");
//! ```

mod lap_time;
mod refresh_rate;

pub use lap_time::*;
pub use refresh_rate::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Timing engine state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TimerPhase {
    #[default]
    Idle,
    Running,
}

/// A closed lap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapRecord {
    /// 1-based lap number within the session
    pub index: u32,
    pub elapsed: Duration,
}

impl fmt::Display for LapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_labelled("Lap", self.index, self.elapsed))
    }
}

/// A closed sector within a lap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorRecord {
    /// 1-based sector number within its lap
    pub index: u32,
    pub elapsed: Duration,
}

impl fmt::Display for SectorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_labelled("Sector", self.index, self.elapsed))
    }
}

/// Elapsed times read on a clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Time since `start`
    pub total: Duration,
    /// Time since the current lap began
    pub current_lap: Duration,
}

impl Snapshot {
    pub fn total_display(&self) -> String {
        format_time(self.total)
    }

    pub fn current_lap_display(&self) -> String {
        format_time(self.current_lap)
    }
}

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True when both components are finite and inside WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}
