//! Reverse geocoding seam
//!
//! The session record carries an optional place name. Looking it up is the
//! host platform's job; the core only awaits the answer at the finalize
//! boundary and treats every failure as "no location".

use std::time::Duration;
use tracing::{debug, warn};

use crate::types::Coordinate;
use crate::{Result, StopwatchError};

/// Trait for reverse geocoding services
#[async_trait::async_trait]
pub trait LocationResolver: Send + Sync + 'static {
    /// Resolve a position to a locality name (city, track, town)
    ///
    /// Returns:
    /// - `Ok(Some(name))` - Locality found
    /// - `Ok(None)` - Position resolved but has no locality
    /// - `Err(e)` - Lookup failed
    async fn locality(&self, position: Coordinate) -> Result<Option<String>>;
}

/// Resolver that always answers with the same locality
#[derive(Debug, Clone, Default)]
pub struct FixedLocation(pub Option<String>);

impl FixedLocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }
}

#[async_trait::async_trait]
impl LocationResolver for FixedLocation {
    async fn locality(&self, _position: Coordinate) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Look up the locality for `position`, giving up after `timeout`.
///
/// Never fails: invalid positions, lookup errors and timeouts are logged and
/// yield `None`.
pub async fn resolve_location(
    resolver: &dyn LocationResolver,
    position: Coordinate,
    timeout: Duration,
) -> Option<String> {
    if !position.is_valid() {
        warn!(?position, "Skipping reverse geocoding for invalid position");
        return None;
    }

    match tokio::time::timeout(timeout, resolver.locality(position)).await {
        Ok(Ok(locality)) => {
            debug!(?locality, "Reverse geocoding resolved");
            locality
        }
        Ok(Err(e)) => {
            warn!("Reverse geocoding failed: {}", e);
            None
        }
        Err(_) => {
            let e = StopwatchError::Timeout { duration: timeout };
            warn!("Reverse geocoding abandoned: {}", e);
            None
        }
    }
}
