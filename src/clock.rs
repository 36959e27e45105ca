//! Clock driver that feeds display refreshes
//!
//! The timing engine never reads a clock. [`ClockDriver::spawn`] starts a
//! task that publishes the current instant every 10ms on a watch channel;
//! subscribers read it at their own [`RefreshRate`] and pass it to
//! [`TimingEngine::tick`](crate::TimingEngine::tick). Cancelling the driver is
//! the only way to stop ticking.

use futures::StreamExt;
use futures::stream::BoxStream;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::stream::ThrottleExt;
use crate::types::{NATIVE_TICK_HZ, RefreshRate};

/// Channels of a running clock driver
///
/// Dropping this cancels the driver.
pub struct ClockChannels {
    /// Latest tick instant, `None` before the first tick
    pub ticks: watch::Receiver<Option<Instant>>,
    /// Cancellation token for stopping the driver
    pub cancel: CancellationToken,
}

impl ClockChannels {
    /// Subscribe to ticks at the requested rate
    ///
    /// The stream ends when the driver is cancelled.
    pub fn subscribe(&self, rate: RefreshRate) -> BoxStream<'static, Instant> {
        let ticks = WatchStream::new(self.ticks.clone()).filter_map(|tick| async move { tick });

        match rate.throttle_interval(NATIVE_TICK_HZ) {
            None => ticks.boxed(),
            Some(period) => ticks.throttle(period).boxed(),
        }
    }

    /// Most recent tick, if any
    pub fn latest(&self) -> Option<Instant> {
        *self.ticks.borrow()
    }

    /// Stop the driver
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ClockChannels {
    fn drop(&mut self) {
        debug!("Dropping clock channels");
        self.cancel.cancel();
    }
}

/// Spawns and manages the tick task
pub struct ClockDriver;

impl ClockDriver {
    /// Spawn a driver ticking at the native 100Hz rate
    pub fn spawn() -> ClockChannels {
        Self::spawn_with_period(Duration::from_secs_f64(1.0 / NATIVE_TICK_HZ))
    }

    /// Spawn a driver with a custom tick period
    pub fn spawn_with_period(period: Duration) -> ClockChannels {
        let (tick_tx, tick_rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            Self::tick_task(period, tick_tx, cancel_task).await;
        });

        ClockChannels { ticks: tick_rx, cancel }
    }

    async fn tick_task(
        period: Duration,
        tick_tx: watch::Sender<Option<Instant>>,
        cancel: CancellationToken,
    ) {
        info!(?period, "Clock driver started");
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick_count = 0u64;

        loop {
            let instant = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Clock driver cancelled");
                    break;
                }
                instant = interval.tick() => instant,
            };

            tick_count += 1;
            trace!(tick_count, "Clock tick");

            if tick_tx.send(Some(instant.into_std())).is_err() {
                debug!("Tick receivers dropped, shutting down");
                break;
            }
        }

        info!("Clock driver ended after {} ticks", tick_count);
    }
}
