//! Session upload seam
//!
//! After a session is finalized an optional summary is sent to a remote
//! endpoint. Transport is the host's concern: implement [`SessionUploader`]
//! for it, or use [`ChannelUploader`] and drain the payloads elsewhere.
//! Upload runs detached from finalize and its failures are only logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::session::Session;
use crate::{Result, StopwatchError};

/// Summary sent to the upload endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct UploadPayload {
    pub session_id: Uuid,
    /// Total session time in seconds
    pub duration: f64,
    /// Fastest lap in seconds
    pub best_lap: f64,
    pub lap_count: u32,
    pub timestamp: DateTime<Utc>,
}

impl UploadPayload {
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id(),
            duration: session.total_duration().as_secs_f64(),
            best_lap: session.fastest_lap_seconds(),
            lap_count: session.lap_count().try_into().unwrap_or(u32::MAX),
            timestamp: session.date(),
        }
    }
}

/// Trait for upload endpoints
#[async_trait::async_trait]
pub trait SessionUploader: Send + Sync + 'static {
    async fn upload(&self, payload: UploadPayload) -> Result<()>;
}

/// Uploader that forwards payloads to a channel
#[derive(Debug, Clone)]
pub struct ChannelUploader {
    tx: mpsc::UnboundedSender<UploadPayload>,
}

impl ChannelUploader {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UploadPayload>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait::async_trait]
impl SessionUploader for ChannelUploader {
    async fn upload(&self, payload: UploadPayload) -> Result<()> {
        self.tx
            .send(payload)
            .map_err(|_| StopwatchError::upload_failed("upload receiver dropped"))
    }
}

/// Spawn a detached upload. Failures are logged, never returned.
///
/// Returns `None` when called outside a tokio runtime; the upload is skipped.
pub fn spawn_upload(
    uploader: Arc<dyn SessionUploader>,
    payload: UploadPayload,
) -> Option<JoinHandle<()>> {
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            warn!(session_id = %payload.session_id, "No runtime available, skipping session upload");
            return None;
        }
    };

    Some(handle.spawn(async move {
        let session_id = payload.session_id;
        match uploader.upload(payload).await {
            Ok(()) => debug!(%session_id, "Session uploaded"),
            Err(e) => warn!(%session_id, "Session upload failed: {}", e),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::SessionStats;
    use chrono::TimeZone;

    fn session() -> Session {
        let laps = vec!["Lap 2: 00:20:00".to_string(), "Lap 1: 00:30:50".to_string()];
        Session::with_identity(
            Uuid::nil(),
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
            SessionStats::from_laps(&laps),
            laps,
            None,
            None,
            "00:50:50".to_string(),
        )
    }

    #[test]
    fn payload_is_built_from_stored_strings() {
        let payload = UploadPayload::from_session(&session());
        assert_eq!(payload.session_id, Uuid::nil());
        assert_eq!(payload.duration, 50.5);
        assert_eq!(payload.best_lap, 20.0);
        assert_eq!(payload.lap_count, 2);
    }

    #[test]
    fn payload_serialises_with_snake_case_fields() {
        let yaml = serde_yaml_ng::to_string(&UploadPayload::from_session(&session())).unwrap();
        for field in ["session_id", "duration", "best_lap", "lap_count", "timestamp"] {
            assert!(yaml.contains(field), "missing {field}");
        }
    }

    #[tokio::test]
    async fn channel_uploader_forwards_payloads() {
        let (uploader, mut rx) = ChannelUploader::new();
        let handle = spawn_upload(Arc::new(uploader), UploadPayload::from_session(&session()));
        handle.unwrap().await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.lap_count, 2);
    }

    #[tokio::test]
    async fn failed_upload_is_swallowed() {
        let _ = tracing_subscriber::fmt::try_init();
        let (uploader, rx) = ChannelUploader::new();
        drop(rx);

        let handle = spawn_upload(Arc::new(uploader), UploadPayload::from_session(&session()));
        assert!(handle.unwrap().await.is_ok());
    }

    #[test]
    fn upload_outside_runtime_is_skipped() {
        let (uploader, _rx) = ChannelUploader::new();
        assert!(spawn_upload(Arc::new(uploader), UploadPayload::from_session(&session())).is_none());
    }
}
