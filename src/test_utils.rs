//! Builders shared by unit tests and benchmarks
//!
//! Produces timing engines and stored lap strings with known contents so
//! tests and benchmarks don't each script their own laps.

#![cfg(any(test, feature = "benchmark"))]

use std::time::{Duration, Instant};

use crate::timing::TimingEngine;
use crate::types::LapRecord;

/// Stored lap entries for the given lap times (centiseconds, oldest first),
/// returned most recent first as the engine stores them.
pub fn lap_entries(centis: &[u64]) -> Vec<String> {
    centis
        .iter()
        .enumerate()
        .rev()
        .map(|(i, c)| {
            LapRecord { index: i as u32 + 1, elapsed: Duration::from_millis(c * 10) }.to_string()
        })
        .collect()
}

/// Lap times that wander around `base_centis` by up to `spread_centis`.
pub fn wandering_laps(count: usize, base_centis: u64, spread_centis: u64) -> Vec<u64> {
    (0..count as u64)
        .map(|i| base_centis + (i * 7_919) % (spread_centis.max(1)))
        .collect()
}

/// A running engine started at `t0` with the given laps (oldest first) closed.
///
/// Returns the engine and the instant the last lap was closed.
pub fn engine_with_laps(t0: Instant, laps: &[Duration]) -> (TimingEngine, Instant) {
    let mut engine = TimingEngine::new();
    engine.start(t0);
    let mut now = t0;
    for lap in laps {
        now += *lap;
        engine.add_lap(now);
    }
    (engine, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    #[test]
    fn lap_entries_are_most_recent_first() {
        assert_eq!(lap_entries(&[3_050, 2_000]), vec!["Lap 2: 00:20:00", "Lap 1: 00:30:50"]);
    }

    #[test]
    fn wandering_laps_stay_in_band() {
        let laps = wandering_laps(50, 4_000, 300);
        assert!(laps.iter().all(|c| (4_000..4_300).contains(c)));
    }

    #[test]
    fn engine_with_laps_matches_entries() {
        let (engine, _) =
            engine_with_laps(Instant::now(), &[Duration::from_millis(30_500), Duration::from_secs(20)]);
        let stored: Vec<String> = engine.laps().iter().map(ToString::to_string).collect();

        assert_eq!(stored, lap_entries(&[3_050, 2_000]));
        assert_eq!(stats::average_lap(&stored), "00:25:25");
    }
}
