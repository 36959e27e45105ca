//! Session history and comparisons
//!
//! The history owns every finalized [`Session`], ordered by date. It is the
//! data behind the analytics, history and compare screens: deleting a
//! session, listing laps of several selected sessions side by side, and
//! flattening their sector times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::Session;
use crate::types::time_component;
use crate::{Result, StopwatchError};

/// Ordered collection of finalized sessions
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHistory {
    sessions: Vec<Session>,
}

/// Laps of one selected session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapComparison {
    pub session_id: Uuid,
    pub date: DateTime<Utc>,
    /// `(lap number, MM:SS:CC)`, most recent lap first
    pub laps: Vec<(u32, String)>,
}

/// One sector time of a selected session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorRow {
    pub lap: u32,
    pub sector: u32,
    pub time: String,
}

/// Sectors of one selected session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorComparison {
    pub session_id: Uuid,
    pub date: DateTime<Utc>,
    pub sectors: Vec<SectorRow>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from sessions in any order.
    pub fn from_sessions(mut sessions: Vec<Session>) -> Self {
        sessions.sort_by_key(|s| s.date());
        Self { sessions }
    }

    /// Insert a session, keeping date order. Sessions with equal dates keep
    /// insertion order.
    pub fn push(&mut self, session: Session) {
        let at = self.sessions.partition_point(|s| s.date() <= session.date());
        debug!(session_id = %session.id(), position = at, "Adding session to history");
        self.sessions.insert(at, session);
    }

    /// Delete a session by id.
    pub fn remove(&mut self, id: Uuid) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.id() == id)?;
        debug!(session_id = %id, "Removing session from history");
        Some(self.sessions.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn latest(&self) -> Option<&Session> {
        self.sessions.last()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Lap listings for the selected sessions, in history order.
    pub fn compare_laps(&self, selected: &[Uuid]) -> Vec<LapComparison> {
        self.selected(selected)
            .map(|session| {
                let total = session.lap_count();
                let laps = session
                    .lap_times()
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| ((total - i) as u32, time_component(entry).to_string()))
                    .collect();
                LapComparison { session_id: session.id(), date: session.date(), laps }
            })
            .collect()
    }

    /// Flattened sector listings for the selected sessions, in history order.
    /// Sessions recorded without sectors yield an empty listing.
    ///
    /// Slots are numbered from the last one (lap 1) upward. A leading slot
    /// beyond the lap count, such as the in-progress lap of records that kept
    /// it, is skipped.
    pub fn compare_sectors(&self, selected: &[Uuid]) -> Vec<SectorComparison> {
        self.selected(selected)
            .map(|session| {
                let laps = session.lap_count();
                let slots = session.sector_times().unwrap_or_default();
                let mut sectors = Vec::new();
                for (i, slot) in slots.iter().enumerate() {
                    let lap = slots.len() - i;
                    if lap > laps {
                        continue;
                    }
                    let lap = lap as u32;
                    for (j, entry) in slot.iter().enumerate() {
                        sectors.push(SectorRow {
                            lap,
                            sector: (slot.len() - j) as u32,
                            time: time_component(entry).to_string(),
                        });
                    }
                }
                SectorComparison { session_id: session.id(), date: session.date(), sectors }
            })
            .collect()
    }

    fn selected<'a>(&'a self, selected: &'a [Uuid]) -> impl Iterator<Item = &'a Session> + 'a {
        self.sessions.iter().filter(move |s| selected.contains(&s.id()))
    }

    /// Encode the whole history as a YAML sequence of session records.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| StopwatchError::encode("session history", e))
    }

    /// Decode a YAML sequence of session records.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let sessions: Vec<Session> = serde_yaml_ng::from_str(yaml)
            .map_err(|e| StopwatchError::decode("session history", e))?;
        Ok(Self::from_sessions(sessions))
    }
}

impl<'a> IntoIterator for &'a SessionHistory {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.sessions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SessionStats;
    use chrono::TimeZone;

    fn session_at(hour: u32, laps: &[&str], sectors: Option<Vec<Vec<&str>>>) -> Session {
        let laps: Vec<String> = laps.iter().map(|s| s.to_string()).collect();
        let sectors: Option<Vec<Vec<String>>> = sectors
            .map(|slots| slots.into_iter().map(|s| s.into_iter().map(String::from).collect()).collect());
        Session::with_identity(
            Uuid::new_v4(),
            Utc.with_ymd_and_hms(2026, 10, 19, hour, 0, 0).unwrap(),
            SessionStats::from_laps(&laps),
            laps,
            sectors,
            None,
            "01:00:00".to_string(),
        )
    }

    #[test]
    fn push_keeps_date_order() {
        let mut history = SessionHistory::new();
        let late = session_at(15, &["Lap 1: 00:40:00"], None);
        let early = session_at(9, &["Lap 1: 00:45:00"], None);
        history.push(late.clone());
        history.push(early.clone());

        let ids: Vec<Uuid> = history.iter().map(Session::id).collect();
        assert_eq!(ids, vec![early.id(), late.id()]);
        assert_eq!(history.latest().map(Session::id), Some(late.id()));
    }

    #[test]
    fn remove_deletes_by_id() {
        let mut history = SessionHistory::new();
        let session = session_at(10, &["Lap 1: 00:40:00"], None);
        let id = session.id();
        history.push(session);

        assert!(history.get(id).is_some());
        assert_eq!(history.remove(id).map(|s| s.id()), Some(id));
        assert!(history.is_empty());
        assert!(history.remove(id).is_none());
    }

    #[test]
    fn compare_laps_numbers_laps_chronologically() {
        let mut history = SessionHistory::new();
        let a = session_at(9, &["Lap 2: 00:41:00", "Lap 1: 00:44:10"], None);
        let b = session_at(10, &["Lap 1: 00:39:99"], None);
        let unselected = session_at(11, &["Lap 1: 00:50:00"], None);
        history.push(a.clone());
        history.push(b.clone());
        history.push(unselected);

        let rows = history.compare_laps(&[b.id(), a.id()]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].session_id, a.id());
        assert_eq!(rows[0].laps, vec![(2, "00:41:00".to_string()), (1, "00:44:10".to_string())]);
        assert_eq!(rows[1].laps, vec![(1, "00:39:99".to_string())]);
    }

    #[test]
    fn compare_sectors_flattens_slots() {
        let mut history = SessionHistory::new();
        let session = session_at(
            9,
            &["Lap 2: 00:41:00", "Lap 1: 00:44:10"],
            Some(vec![vec!["Sector 2: 00:20:00", "Sector 1: 00:21:00"], vec!["Sector 1: 00:44:10"]]),
        );
        let bare = session_at(10, &["Lap 1: 00:40:00"], None);
        history.push(session.clone());
        history.push(bare.clone());

        let rows = history.compare_sectors(&[session.id(), bare.id()]);
        assert_eq!(
            rows[0].sectors,
            vec![
                SectorRow { lap: 2, sector: 2, time: "00:20:00".to_string() },
                SectorRow { lap: 2, sector: 1, time: "00:21:00".to_string() },
                SectorRow { lap: 1, sector: 1, time: "00:44:10".to_string() },
            ]
        );
        assert!(rows[1].sectors.is_empty());
    }

    #[test]
    fn compare_sectors_skips_in_progress_slot() {
        let yaml = "\
id: 00000000-0000-0000-0000-000000000001
date: 2026-10-19T09:00:00Z
fastestLap: '00:20:00'
slowestLap: '00:30:50'
averageLap: '00:25:25'
consistency: 25%
lapTimes:
- 'Lap 2: 00:20:00'
- 'Lap 1: 00:30:50'
sectorTimes:
- []
- ['Sector 1: 00:09:00']
- ['Sector 1: 00:12:00']
totalTime: '00:50:50'
";
        let session = Session::from_yaml(yaml).unwrap();
        let id = session.id();
        let history = SessionHistory::from_sessions(vec![session]);

        let rows = history.compare_sectors(&[id]);
        assert_eq!(
            rows[0].sectors,
            vec![
                SectorRow { lap: 2, sector: 1, time: "00:09:00".to_string() },
                SectorRow { lap: 1, sector: 1, time: "00:12:00".to_string() },
            ]
        );
        assert!(rows[0].sectors.iter().all(|row| row.lap >= 1));
    }

    #[test]
    fn compare_sectors_with_fewer_slots_than_laps() {
        let mut history = SessionHistory::new();
        let session = session_at(
            9,
            &["Lap 3: 00:41:00", "Lap 2: 00:42:00", "Lap 1: 00:44:10"],
            Some(vec![vec!["Sector 1: 00:20:00"]]),
        );
        history.push(session.clone());

        let rows = history.compare_sectors(&[session.id()]);
        assert_eq!(rows[0].sectors, vec![SectorRow { lap: 1, sector: 1, time: "00:20:00".to_string() }]);
    }

    #[test]
    fn yaml_history_round_trips_and_sorts() {
        let late = session_at(15, &["Lap 1: 00:40:00"], None);
        let early = session_at(9, &["Lap 1: 00:45:00"], None);
        let unordered = SessionHistory { sessions: vec![late.clone(), early.clone()] };

        let yaml = unordered.to_yaml().unwrap();
        let decoded = SessionHistory::from_yaml(&yaml).unwrap();

        assert_eq!(decoded, SessionHistory::from_sessions(vec![early, late]));
    }

    #[test]
    fn malformed_history_is_a_decode_error() {
        let result = SessionHistory::from_yaml("- id: 12\n");
        assert!(matches!(result, Err(StopwatchError::Decode { .. })));
    }
}
