//! Lap and sector timing state machine
//!
//! [`TimingEngine`] owns the running/idle state, the lap and sector records
//! and the best lap. It never reads a clock itself: every operation takes the
//! current instant from the caller, which keeps it deterministic under test
//! and lets a single clock driver feed both display ticks and button presses.
//!
//! ```text
//!            start(now)
//!    Idle ───────────────► Running ──┐ tick(now)      (read only)
//!     ▲                      │  ▲    │ add_lap(now)
//!     │       stop(now)      │  └────┘ add_sector(now)
//!     └──────────────────────┘
//!     reset() from any state returns to Idle and clears every record
//! ```
//!
//! Records are kept most recent first. Sector slots are created lazily: the
//! first sector or lap of a run opens `sector_slots()[0]`, which always
//! belongs to the lap in progress. Once a lap is closed, the slot of closed
//! lap `laps()[i]` is `sector_slots()[i + 1]`.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

use crate::session::Session;
use crate::stats::SessionStats;
use crate::types::{LapRecord, SectorRecord, Snapshot, TimerPhase, ZERO_TIME, format_time};

/// Lap/sector timing state machine
#[derive(Debug, Clone, Default)]
pub struct TimingEngine {
    phase: TimerPhase,
    start: Option<Instant>,
    lap_start: Option<Instant>,
    sector_start: Option<Instant>,
    /// Total elapsed time frozen by the last `stop`
    stopped_total: Duration,
    laps: VecDeque<LapRecord>,
    sector_slots: VecDeque<VecDeque<SectorRecord>>,
    best_lap: Option<Duration>,
    lap_count: u32,
    sector_count: u32,
}

fn since(now: Instant, origin: Option<Instant>) -> Duration {
    origin.map(|o| now.saturating_duration_since(o)).unwrap_or_default()
}

impl TimingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Idle → Running. Restarting after a stop restarts the total and lap
    /// clocks but keeps the recorded laps.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            trace!("start ignored: already running");
            return;
        }

        self.start = Some(now);
        self.lap_start = Some(now);
        self.sector_start = Some(now);
        self.stopped_total = Duration::ZERO;
        self.phase = TimerPhase::Running;
        debug!(laps = self.laps.len(), "Stopwatch started");
    }

    /// Running → Idle. Recorded laps and sectors are kept.
    pub fn stop(&mut self, now: Instant) {
        if !self.is_running() {
            trace!("stop ignored: not running");
            return;
        }

        self.stopped_total = since(now, self.start);
        self.phase = TimerPhase::Idle;
        debug!(total = %format_time(self.stopped_total), "Stopwatch stopped");
    }

    /// Elapsed times for a display refresh. `None` while idle.
    pub fn tick(&self, now: Instant) -> Option<Snapshot> {
        if !self.is_running() {
            return None;
        }
        Some(Snapshot { total: since(now, self.start), current_lap: since(now, self.lap_start) })
    }

    /// Total elapsed time: live while running, frozen at the last stop otherwise.
    pub fn total_elapsed(&self, now: Instant) -> Duration {
        match self.phase {
            TimerPhase::Running => since(now, self.start),
            TimerPhase::Idle => self.stopped_total,
        }
    }

    /// Close the current lap. Ignored unless running.
    pub fn add_lap(&mut self, now: Instant) -> Option<LapRecord> {
        if !self.is_running() {
            trace!("lap ignored: not running");
            return None;
        }

        let elapsed = since(now, self.lap_start);
        // Strictly less: the first of equal laps stays the best
        if self.best_lap.is_none_or(|best| elapsed < best) {
            self.best_lap = Some(elapsed);
        }

        self.lap_count += 1;
        let record = LapRecord { index: self.lap_count, elapsed };
        self.laps.push_front(record);
        // Close the finished lap's slot before opening the next one
        self.current_slot();
        self.sector_slots.push_front(VecDeque::new());

        self.lap_start = Some(now);
        self.sector_start = Some(now);
        self.sector_count = 0;

        debug!(lap = %record, "Lap recorded");
        Some(record)
    }

    /// Close the current sector of the lap in progress. Ignored unless running.
    pub fn add_sector(&mut self, now: Instant) -> Option<SectorRecord> {
        if !self.is_running() {
            trace!("sector ignored: not running");
            return None;
        }

        let elapsed = since(now, self.sector_start);
        self.sector_count += 1;
        let record = SectorRecord { index: self.sector_count, elapsed };
        self.current_slot().push_front(record);
        self.sector_start = Some(now);

        debug!(sector = %record, "Sector recorded");
        Some(record)
    }

    /// Slot of the lap in progress, created on first use.
    fn current_slot(&mut self) -> &mut VecDeque<SectorRecord> {
        if self.sector_slots.is_empty() {
            self.sector_slots.push_front(VecDeque::new());
        }
        &mut self.sector_slots[0]
    }

    /// Any state → Idle with every record cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
        debug!("Stopwatch reset");
    }

    /// Build a [`Session`] from the recorded laps and reset.
    ///
    /// Returns `None`, leaving the engine untouched, when no lap has been
    /// closed. Sectors of the lap in progress are dropped with it.
    pub fn finalize(&mut self, now: Instant, location: Option<String>) -> Option<Session> {
        if self.laps.is_empty() {
            debug!("finalize ignored: no laps recorded");
            return None;
        }

        let lap_times: Vec<String> = self.laps.iter().map(LapRecord::to_string).collect();

        let closed_slots: Vec<Vec<String>> = self
            .sector_slots
            .iter()
            .skip(1)
            .take(self.laps.len())
            .map(|slot| slot.iter().map(SectorRecord::to_string).collect())
            .collect();
        let sector_times =
            closed_slots.iter().any(|slot| !slot.is_empty()).then_some(closed_slots);

        let mut stats = SessionStats::from_laps(&lap_times);
        stats.fastest_lap = self.best_lap_display();

        let total_time = format_time(self.total_elapsed(now));
        let session = Session::record(stats, lap_times, sector_times, location, total_time);

        info!(
            session_id = %session.id(),
            laps = session.lap_count(),
            fastest = session.fastest_lap(),
            total = session.total_time(),
            "Session finalized"
        );

        self.reset();
        Some(session)
    }

    /// Closed laps, most recent first.
    pub fn laps(&self) -> &VecDeque<LapRecord> {
        &self.laps
    }

    /// Sector slots, most recent lap first; slot 0 is the lap in progress.
    pub fn sector_slots(&self) -> &VecDeque<VecDeque<SectorRecord>> {
        &self.sector_slots
    }

    /// Sectors of the lap in progress, most recent first.
    pub fn current_sectors(&self) -> impl Iterator<Item = &SectorRecord> {
        self.sector_slots.front().into_iter().flatten()
    }

    pub fn best_lap(&self) -> Option<Duration> {
        self.best_lap
    }

    /// Best lap formatted, `"00:00:00"` before the first lap.
    pub fn best_lap_display(&self) -> String {
        self.best_lap.map(format_time).unwrap_or_else(|| ZERO_TIME.to_string())
    }

    pub fn lap_count(&self) -> u32 {
        self.lap_count
    }

    pub fn sector_count(&self) -> u32 {
        self.sector_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn clock() -> impl Fn(u64) -> Instant {
        let t0 = Instant::now();
        move |ms| t0 + Duration::from_millis(ms)
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let at = clock();
        let mut engine = TimingEngine::new();

        engine.stop(at(0));
        assert_eq!(engine.phase(), TimerPhase::Idle);

        engine.start(at(0));
        engine.start(at(5_000));
        assert_eq!(engine.tick(at(6_000)).map(|s| s.total), Some(Duration::from_secs(6)));

        engine.stop(at(7_000));
        engine.stop(at(9_000));
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.total_elapsed(at(20_000)), Duration::from_secs(7));
    }

    #[test]
    fn tick_reads_total_and_current_lap() {
        let at = clock();
        let mut engine = TimingEngine::new();
        assert_eq!(engine.tick(at(0)), None);

        engine.start(at(0));
        engine.add_lap(at(30_500));
        let snapshot = engine.tick(at(40_000)).unwrap();

        assert_eq!(snapshot.total_display(), "00:40:00");
        assert_eq!(snapshot.current_lap_display(), "00:09:50");
        assert_eq!(engine.laps().len(), 1);
    }

    #[test]
    fn idle_calls_are_ignored() {
        let at = clock();
        let mut engine = TimingEngine::new();

        assert_eq!(engine.add_lap(at(1_000)), None);
        assert_eq!(engine.add_sector(at(1_000)), None);
        assert!(engine.laps().is_empty());
        assert!(engine.sector_slots().is_empty());

        engine.start(at(0));
        engine.add_lap(at(10_000));
        engine.stop(at(11_000));
        assert_eq!(engine.add_lap(at(12_000)), None);
        assert_eq!(engine.laps().len(), 1);
    }

    #[test]
    fn laps_are_most_recent_first() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_lap(at(30_500));
        engine.add_lap(at(50_500));

        let labels: Vec<String> = engine.laps().iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["Lap 2: 00:20:00", "Lap 1: 00:30:50"]);
        assert_eq!(engine.best_lap(), Some(Duration::from_secs(20)));
        assert_eq!(engine.best_lap_display(), "00:20:00");
    }

    #[test]
    fn equal_laps_keep_the_first_best() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_lap(at(20_000));
        engine.add_lap(at(40_000));

        assert_eq!(engine.best_lap(), Some(Duration::from_secs(20)));
        assert_eq!(engine.lap_count(), 2);
    }

    #[test]
    fn sector_before_first_lap_goes_to_slot_zero() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        let sector = engine.add_sector(at(4_250)).unwrap();

        assert_eq!(sector.to_string(), "Sector 1: 00:04:25");
        assert_eq!(engine.sector_slots().len(), 1);
        assert_eq!(engine.sector_slots()[0].front(), Some(&sector));
    }

    #[test]
    fn sector_slots_are_created_lazily() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        assert!(engine.sector_slots().is_empty());
        assert_eq!(engine.current_sectors().count(), 0);

        engine.add_lap(at(30_000));
        assert_eq!(engine.sector_slots().len(), 2);
        assert!(engine.sector_slots().iter().all(VecDeque::is_empty));

        let session = engine.finalize(at(30_000), None).unwrap();
        assert_eq!(session.sector_times(), None);
    }

    #[test]
    fn sectors_reset_on_lap_boundary() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_sector(at(10_000));
        engine.add_sector(at(25_000));
        engine.add_lap(at(30_000));
        engine.add_sector(at(38_000));

        assert_eq!(engine.sector_count(), 1);
        let current: Vec<String> = engine.current_sectors().map(ToString::to_string).collect();
        assert_eq!(current, vec!["Sector 1: 00:08:00"]);

        let closed: Vec<String> = engine.sector_slots()[1].iter().map(ToString::to_string).collect();
        assert_eq!(closed, vec!["Sector 2: 00:15:00", "Sector 1: 00:10:00"]);
    }

    #[test]
    fn reset_clears_everything() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_sector(at(1_000));
        engine.add_lap(at(2_000));
        engine.reset();

        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert!(engine.laps().is_empty());
        assert!(engine.sector_slots().is_empty());
        assert_eq!(engine.best_lap(), None);
        assert_eq!(engine.lap_count(), 0);
        assert_eq!(engine.sector_count(), 0);
    }

    #[test]
    fn finalize_without_laps_is_a_no_op() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_sector(at(1_000));

        assert!(engine.finalize(at(2_000), None).is_none());
        assert!(engine.is_running());
        assert_eq!(engine.sector_count(), 1);
    }

    #[test]
    fn finalize_builds_session_and_resets() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_lap(at(30_500));
        engine.add_lap(at(50_500));

        let session = engine.finalize(at(50_500), Some("Hangtown".to_string())).unwrap();

        assert_eq!(session.fastest_lap(), "00:20:00");
        assert_eq!(session.slowest_lap(), "00:30:50");
        assert_eq!(session.average_lap(), "00:25:25");
        assert_eq!(session.consistency(), "25%");
        assert_eq!(session.lap_times(), ["Lap 2: 00:20:00", "Lap 1: 00:30:50"]);
        assert_eq!(session.sector_times(), None);
        assert_eq!(session.location(), Some("Hangtown"));
        assert_eq!(session.total_time(), "00:50:50");

        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert!(engine.laps().is_empty());
    }

    #[test]
    fn finalize_aligns_sectors_with_laps() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_sector(at(12_000));
        engine.add_lap(at(30_000));
        engine.add_lap(at(55_000));
        engine.add_sector(at(60_000));

        let session = engine.finalize(at(61_000), None).unwrap();
        let sectors = session.sector_times().unwrap();

        assert_eq!(sectors.len(), session.lap_count());
        assert!(sectors[0].is_empty());
        assert_eq!(sectors[1], vec!["Sector 1: 00:12:00".to_string()]);
    }

    #[test]
    fn finalize_after_stop_uses_frozen_total() {
        let at = clock();
        let mut engine = TimingEngine::new();
        engine.start(at(0));
        engine.add_lap(at(42_000));
        engine.stop(at(45_000));

        let session = engine.finalize(at(90_000), None).unwrap();
        assert_eq!(session.total_time(), "00:45:00");
        assert_eq!(session.consistency(), "N/A");
    }

    proptest! {
        #[test]
        fn sector_slots_never_fewer_than_laps(ops in prop::collection::vec(0u8..4, 0..60)) {
            let at = clock();
            let mut engine = TimingEngine::new();
            let mut t = 0u64;
            for op in ops {
                t += 137;
                match op {
                    0 => engine.start(at(t)),
                    1 => { engine.add_lap(at(t)); }
                    2 => { engine.add_sector(at(t)); }
                    _ => engine.stop(at(t)),
                }
                prop_assert!(engine.sector_slots().len() >= engine.laps().len());
                if !engine.laps().is_empty() {
                    prop_assert_eq!(engine.sector_slots().len(), engine.laps().len() + 1);
                }
            }
        }

        #[test]
        fn best_lap_is_first_minimum(laps in prop::collection::vec(1u64..120_000u64, 1..30)) {
            let at = clock();
            let mut engine = TimingEngine::new();
            engine.start(at(0));
            let mut t = 0u64;
            for lap in &laps {
                t += lap;
                engine.add_lap(at(t));
            }

            let min = *laps.iter().min().unwrap();
            prop_assert_eq!(engine.best_lap(), Some(Duration::from_millis(min)));
        }
    }
}
