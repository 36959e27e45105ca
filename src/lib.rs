//! Lap and sector timing engine with session statistics.
//!
//! MX StopWatch is the timing core of a GPS stopwatch for track days: a
//! start/stop/lap/sector state machine, the session record produced when a
//! run is saved, and the statistics shown on the analytics screen (fastest,
//! slowest and average lap, consistency score).
//!
//! # Features
//!
//! - **Deterministic timing**: every operation takes `now` from the caller
//! - **Stable record format**: `Lap 3: 00:41:27` strings are both display and
//!   storage, and statistics parse them back
//! - **Clock driver**: a 100Hz tick task with per-subscriber refresh rates
//! - **Async seams**: reverse geocoding and session upload as traits, awaited
//!   or spawned only at the finalize boundary
//!
//! # Quick Start
//!
//! ```rust
//! use mx_stopwatch::TimingEngine;
//! use std::time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut engine = TimingEngine::new();
//! engine.start(t0);
//! engine.add_lap(t0 + Duration::from_millis(30_500));
//! engine.add_lap(t0 + Duration::from_millis(50_500));
//!
//! let session = engine.finalize(t0 + Duration::from_millis(50_500), None).unwrap();
//! assert_eq!(session.fastest_lap(), "00:20:00");
//! assert_eq!(session.lap_times(), ["Lap 2: 00:20:00", "Lap 1: 00:30:50"]);
//! ```
//!
//! ## Example (controller with clock driver)
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use mx_stopwatch::{ClockDriver, RefreshRate, Stopwatch};
//! use std::time::Instant;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut stopwatch = Stopwatch::default();
//!     let clock = ClockDriver::spawn();
//!     let mut ticks = clock.subscribe(RefreshRate::Max(30));
//!
//!     stopwatch.start(Instant::now());
//!     while let Some(now) = ticks.next().await {
//!         if let Some(snapshot) = stopwatch.tick(now) {
//!             println!("{}  lap {}", snapshot.total_display(), snapshot.current_lap_display());
//!         }
//!     }
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Timing and statistics
pub mod session;
pub mod stats;
pub mod timing;

// Clock driver
pub mod clock;
pub mod stream;

// Controller and external seams
pub mod config;
pub mod geocode;
pub mod stopwatch;
pub mod upload;

// Core exports
pub use error::*;
pub use types::*;

pub use clock::{ClockChannels, ClockDriver};
pub use config::StopwatchConfig;
pub use geocode::{FixedLocation, LocationResolver};
pub use session::{Session, SessionHistory};
pub use stats::{Consistency, SessionStats};
pub use stopwatch::Stopwatch;
pub use timing::TimingEngine;
pub use upload::{ChannelUploader, SessionUploader, UploadPayload};
