//! Error types for the stopwatch core.
//!
//! Almost nothing in the timing core can fail: invalid-state calls are
//! ignored and malformed time strings parse as zero. The errors below cover
//! the library's outer edges: encoding session records, loading
//! configuration, and the optional external collaborators (reverse geocoding
//! and session upload) whose failures the [`Stopwatch`](crate::Stopwatch)
//! logs and swallows.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use mx_stopwatch::StopwatchError;
//!
//! let error = StopwatchError::upload_failed("endpoint unreachable");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Result type alias for stopwatch operations.
pub type Result<T, E = StopwatchError> = std::result::Result<T, E>;

/// Main error type for stopwatch operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StopwatchError {
    #[error("Failed to encode {context}")]
    Encode {
        context: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Failed to decode {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Reverse geocoding failed: {reason}")]
    Geocode {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Session upload failed: {reason}")]
    Upload {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },
}

impl StopwatchError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            StopwatchError::Geocode { .. } => true,
            StopwatchError::Upload { .. } => true,
            StopwatchError::Timeout { .. } => true,
            StopwatchError::Encode { .. } => false,
            StopwatchError::Decode { .. } => false,
            StopwatchError::Config { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            StopwatchError::Encode { .. } => vec![
                "Check that session fields contain valid UTF-8",
                "Report the session that failed to encode",
            ],
            StopwatchError::Decode { .. } => vec![
                "Verify the stored session record is complete",
                "Check the record uses camelCase field names",
                "Restore the history from a backup",
            ],
            StopwatchError::Config { .. } => vec![
                "Check configuration field names and values",
                "Remove unknown configuration keys",
                "Fall back to the default configuration",
            ],
            StopwatchError::Geocode { .. } => vec![
                "Check network connectivity",
                "Verify location permissions are granted",
                "Save the session without a location",
            ],
            StopwatchError::Upload { .. } => vec![
                "Check network connectivity",
                "Verify the upload endpoint is reachable",
                "Retry the upload later",
            ],
            StopwatchError::Timeout { .. } => vec![
                "Increase the geocode timeout",
                "Check network latency",
            ],
        }
    }

    /// Helper constructor for configuration errors.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        StopwatchError::Config { reason: reason.into() }
    }

    /// Helper constructor for geocoding errors.
    pub fn geocode_failed(reason: impl Into<String>) -> Self {
        StopwatchError::Geocode { reason: reason.into(), source: None }
    }

    /// Helper constructor for geocoding errors with source.
    pub fn geocode_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        StopwatchError::Geocode { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for upload errors.
    pub fn upload_failed(reason: impl Into<String>) -> Self {
        StopwatchError::Upload { reason: reason.into(), source: None }
    }

    /// Helper constructor for upload errors with source.
    pub fn upload_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        StopwatchError::Upload { reason: reason.into(), source: Some(source) }
    }

    pub(crate) fn encode(context: impl Into<String>, source: serde_yaml_ng::Error) -> Self {
        StopwatchError::Encode { context: context.into(), source }
    }

    pub(crate) fn decode(context: impl Into<String>, source: serde_yaml_ng::Error) -> Self {
        StopwatchError::Decode { context: context.into(), source }
    }
}
