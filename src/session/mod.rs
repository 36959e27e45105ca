//! # Session Records
//!
//! A [`Session`] is the immutable record produced when a timing run is
//! finalized. It carries the formatted lap and sector strings exactly as they
//! were displayed, plus the statistics computed from them, so a stored record
//! can be re-analysed later by parsing those strings back.
//!
//! ## Record Format
//!
//! Sessions serialise with camelCase field names to a human-readable YAML
//! record:
//!
//! ```text
//! id: 6f1c8c1e-0d6b-4ad2-9a51-2f0f3c0b9d11
//! date: 2026-10-19T09:12:44.512Z
//! fastestLap: 00:20:00
//! slowestLap: 00:30:50
//! averageLap: 00:25:25
//! consistency: 25%
//! lapTimes:
//! - 'Lap 2: 00:20:00'
//! - 'Lap 1: 00:30:50'
//! location: Hangtown
//! totalTime: 00:50:50
//! ```
//!
//! Absent optional fields (`sectorTimes`, `location`) are left out of the
//! record rather than written as `null`.
//!
//! Records may also be persisted as JSON by the host application; the serde
//! field names are the same.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::stats::{Consistency, SessionStats};
use crate::types::{labelled_seconds, parse_labelled, parse_time};
use crate::{Result, StopwatchError};

pub mod history;

pub use history::{LapComparison, SectorComparison, SectorRow, SessionHistory};

/// A finalized timing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: Uuid,
    date: DateTime<Utc>,
    fastest_lap: String,
    slowest_lap: String,
    average_lap: String,
    consistency: String,
    lap_times: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sector_times: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    total_time: String,
}

impl Session {
    /// Create a record with a fresh id, dated now.
    pub(crate) fn record(
        stats: SessionStats,
        lap_times: Vec<String>,
        sector_times: Option<Vec<Vec<String>>>,
        location: Option<String>,
        total_time: String,
    ) -> Self {
        Self::with_identity(
            Uuid::new_v4(),
            Utc::now(),
            stats,
            lap_times,
            sector_times,
            location,
            total_time,
        )
    }

    pub(crate) fn with_identity(
        id: Uuid,
        date: DateTime<Utc>,
        stats: SessionStats,
        lap_times: Vec<String>,
        sector_times: Option<Vec<Vec<String>>>,
        location: Option<String>,
        total_time: String,
    ) -> Self {
        Self {
            id,
            date,
            fastest_lap: stats.fastest_lap,
            slowest_lap: stats.slowest_lap,
            average_lap: stats.average_lap,
            consistency: stats.consistency.to_string(),
            lap_times,
            sector_times,
            location,
            total_time,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn fastest_lap(&self) -> &str {
        &self.fastest_lap
    }

    pub fn slowest_lap(&self) -> &str {
        &self.slowest_lap
    }

    pub fn average_lap(&self) -> &str {
        &self.average_lap
    }

    /// Stored consistency string, `"N/A"` or `"P%"`.
    pub fn consistency(&self) -> &str {
        &self.consistency
    }

    pub fn consistency_score(&self) -> Consistency {
        Consistency::parse(&self.consistency)
    }

    /// Lap entries, most recent first.
    pub fn lap_times(&self) -> &[String] {
        &self.lap_times
    }

    /// Sector entries per lap, aligned with [`lap_times`](Self::lap_times).
    pub fn sector_times(&self) -> Option<&[Vec<String>]> {
        self.sector_times.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn total_time(&self) -> &str {
        &self.total_time
    }

    pub fn lap_count(&self) -> usize {
        self.lap_times.len()
    }

    /// Lap durations parsed back from the stored strings, most recent first.
    pub fn lap_durations(&self) -> Vec<Duration> {
        self.lap_times.iter().map(|lap| parse_labelled(lap)).collect()
    }

    pub fn total_duration(&self) -> Duration {
        parse_time(&self.total_time)
    }

    pub fn fastest_lap_seconds(&self) -> f64 {
        labelled_seconds(&self.fastest_lap)
    }

    /// Lines of the analytics card for this session.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Session: {}", self.date.format("%Y-%m-%d %H:%M")),
            format!("Fastest Lap: {}", self.fastest_lap),
            format!("Slowest Lap: {}", self.slowest_lap),
            format!("Average Lap: {}", self.average_lap),
            format!("Consistency: {}", self.consistency),
            format!("Total Time: {}", self.total_time),
        ];
        if let Some(city) = &self.location {
            lines.push(format!("Location: {}", city));
        }
        lines
    }

    /// Encode as a YAML record.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| StopwatchError::encode("session record", e))
    }

    /// Decode a YAML record.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| StopwatchError::decode("session record", e))
    }
}
