//! Session statistics over stored lap strings.
//!
//! Every function here takes the stored lap entries (`"Lap 4: 00:41:27"`) and
//! parses the trailing `MM:SS:CC` back out, so statistics work equally on a
//! session that was just recorded and one decoded from history. Malformed
//! entries parse as zero.
//!
//! The consistency score is a heuristic: the population standard deviation
//! of lap seconds measured against a fixed 7 second reference deviation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ZERO_TIME, format_centis, labelled_seconds, parse_centis, time_component};

/// Standard deviation (seconds) that scores 0% before clamping.
pub const REFERENCE_DEVIATION_SECS: f64 = 7.0;

/// Lowest reported consistency percentage.
pub const MIN_CONSISTENCY: u8 = 1;

/// Highest reported consistency percentage.
pub const MAX_CONSISTENCY: u8 = 100;

const NOT_AVAILABLE: &str = "N/A";

/// Consistency score of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Consistency {
    /// Fewer than two laps
    NotAvailable,
    /// Clamped to `1..=100`
    Percent(u8),
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consistency::NotAvailable => f.write_str(NOT_AVAILABLE),
            Consistency::Percent(p) => write!(f, "{}%", p),
        }
    }
}

impl Consistency {
    /// Read a stored consistency string. Anything unrecognised is `NotAvailable`.
    pub fn parse(value: &str) -> Self {
        value
            .strip_suffix('%')
            .and_then(|p| p.parse::<u8>().ok())
            .map(|p| Consistency::Percent(p.clamp(MIN_CONSISTENCY, MAX_CONSISTENCY)))
            .unwrap_or(Consistency::NotAvailable)
    }
}

/// Statistics computed at finalize time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub fastest_lap: String,
    pub slowest_lap: String,
    pub average_lap: String,
    pub consistency: Consistency,
}

impl SessionStats {
    pub fn from_laps<S: AsRef<str>>(laps: &[S]) -> Self {
        Self {
            fastest_lap: fastest_lap(laps),
            slowest_lap: slowest_lap(laps),
            average_lap: average_lap(laps),
            consistency: consistency(laps),
        }
    }
}

/// Mean lap time, formatted `MM:SS:CC` (truncated). `"00:00:00"` when empty.
pub fn average_lap<S: AsRef<str>>(laps: &[S]) -> String {
    if laps.is_empty() {
        return ZERO_TIME.to_string();
    }

    let total: u128 =
        laps.iter().map(|lap| parse_centis(time_component(lap.as_ref())) as u128).sum();
    let average = total / laps.len() as u128;
    format_centis(average.min(u64::MAX as u128) as u64)
}

/// Consistency score from the population standard deviation of lap seconds.
pub fn consistency<S: AsRef<str>>(laps: &[S]) -> Consistency {
    if laps.len() < 2 {
        return Consistency::NotAvailable;
    }

    let seconds: Vec<f64> = laps.iter().map(|lap| labelled_seconds(lap.as_ref())).collect();
    let count = seconds.len() as f64;
    let mean = seconds.iter().sum::<f64>() / count;
    let variance = seconds.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / count;
    let deviation = variance.sqrt();

    let score = 100.0 * (1.0 - deviation / REFERENCE_DEVIATION_SECS);
    let clamped = score.clamp(MIN_CONSISTENCY as f64, MAX_CONSISTENCY as f64);
    Consistency::Percent(clamped.round() as u8)
}

/// Time string of the numerically slowest lap. Ties keep the first entry.
pub fn slowest_lap<S: AsRef<str>>(laps: &[S]) -> String {
    pick_lap(laps, |candidate, current| candidate > current)
}

/// Time string of the numerically fastest lap. Ties keep the first entry.
pub fn fastest_lap<S: AsRef<str>>(laps: &[S]) -> String {
    pick_lap(laps, |candidate, current| candidate < current)
}

fn pick_lap<S, F>(laps: &[S], replaces: F) -> String
where
    S: AsRef<str>,
    F: Fn(u64, u64) -> bool,
{
    let mut best: Option<(&str, u64)> = None;
    for lap in laps {
        let time = time_component(lap.as_ref());
        let centis = parse_centis(time);
        match best {
            Some((_, current)) if !replaces(centis, current) => {}
            _ => best = Some((time, centis)),
        }
    }
    best.map(|(time, _)| time.to_string()).unwrap_or_else(|| ZERO_TIME.to_string())
}
