//! Stopwatch controller
//!
//! [`Stopwatch`] is the object a UI holds: it owns the [`TimingEngine`], the
//! [`SessionHistory`] and the optional geocoding and upload collaborators.
//! Button handlers call the synchronous timing operations; the reset/save
//! action calls [`Stopwatch::finalize`], the only async operation, which
//! awaits reverse geocoding before the session record is created.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::StopwatchConfig;
use crate::geocode::{LocationResolver, resolve_location};
use crate::session::{Session, SessionHistory};
use crate::timing::TimingEngine;
use crate::types::{Coordinate, LapRecord, SectorRecord, Snapshot};
use crate::upload::{SessionUploader, UploadPayload, spawn_upload};

/// Timing engine plus session history and external collaborators
pub struct Stopwatch {
    engine: TimingEngine,
    history: SessionHistory,
    resolver: Option<Arc<dyn LocationResolver>>,
    uploader: Option<Arc<dyn SessionUploader>>,
    config: StopwatchConfig,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new(StopwatchConfig::default())
    }
}

impl Stopwatch {
    pub fn new(config: StopwatchConfig) -> Self {
        Self {
            engine: TimingEngine::new(),
            history: SessionHistory::new(),
            resolver: None,
            uploader: None,
            config,
        }
    }

    /// Use `resolver` to name the location of finalized sessions.
    pub fn with_resolver(mut self, resolver: impl LocationResolver) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Send a summary of each finalized session to `uploader`.
    pub fn with_uploader(mut self, uploader: impl SessionUploader) -> Self {
        self.uploader = Some(Arc::new(uploader));
        self
    }

    /// Start from previously stored sessions.
    pub fn with_history(mut self, history: SessionHistory) -> Self {
        self.history = history;
        self
    }

    pub fn start(&mut self, now: Instant) {
        self.engine.start(now);
    }

    pub fn stop(&mut self, now: Instant) {
        self.engine.stop(now);
    }

    pub fn tick(&self, now: Instant) -> Option<Snapshot> {
        self.engine.tick(now)
    }

    pub fn add_lap(&mut self, now: Instant) -> Option<LapRecord> {
        self.engine.add_lap(now)
    }

    pub fn add_sector(&mut self, now: Instant) -> Option<SectorRecord> {
        self.engine.add_sector(now)
    }

    /// Discard the current run without saving it.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// Save the current run as a session.
    ///
    /// Resolves the locality of `position` (bounded by the configured
    /// timeout), creates the session, appends it to the history, resets the
    /// engine and spawns the upload. Returns `None` when no lap was closed.
    /// Geocoding and upload failures never fail finalize.
    pub async fn finalize(&mut self, now: Instant, position: Option<Coordinate>) -> Option<Session> {
        if self.engine.laps().is_empty() {
            debug!("finalize ignored: no laps recorded");
            return None;
        }

        let location = match (&self.resolver, position) {
            (Some(resolver), Some(position)) => {
                resolve_location(resolver.as_ref(), position, self.config.geocode_timeout()).await
            }
            _ => None,
        };

        let session = self.engine.finalize(now, location)?;
        self.history.push(session.clone());
        info!(session_id = %session.id(), history = self.history.len(), "Session saved");

        if let Some(uploader) = self.uploader.as_ref().filter(|_| self.config.upload_enabled) {
            spawn_upload(Arc::clone(uploader), UploadPayload::from_session(&session));
        }

        Some(session)
    }

    pub fn engine(&self) -> &TimingEngine {
        &self.engine
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Mutable access for deleting sessions.
    pub fn history_mut(&mut self) -> &mut SessionHistory {
        &mut self.history
    }

    pub fn config(&self) -> &StopwatchConfig {
        &self.config
    }
}
