//! `MM:SS:CC` lap time formatting and parsing
//!
//! The formatted string is both the display form and the stored form of lap
//! and sector times, so the statistics calculator parses these strings back.
//! Widths are fixed at two digits (minutes may grow past two digits; they are
//! never wrapped at 60) and hundredths are truncated, not rounded.

use std::time::Duration;

/// Formatted value of a zero duration.
pub const ZERO_TIME: &str = "00:00:00";

/// Separator between a label (`Lap 3`) and its time value.
pub const LABEL_SEPARATOR: &str = ": ";

/// Format a duration as `MM:SS:CC` (hundredths truncated).
pub fn format_time(elapsed: Duration) -> String {
    format_centis(to_centis(elapsed))
}

/// Format a whole number of centiseconds as `MM:SS:CC`.
pub fn format_centis(centis: u64) -> String {
    let total_secs = centis / 100;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let hundredths = centis % 100;
    format!("{:02}:{:02}:{:02}", minutes, seconds, hundredths)
}

/// Truncate a duration to whole centiseconds.
pub fn to_centis(elapsed: Duration) -> u64 {
    (elapsed.as_millis() / 10).min(u64::MAX as u128) as u64
}

/// Build a duration from whole centiseconds.
pub fn from_centis(centis: u64) -> Duration {
    Duration::from_millis(centis.saturating_mul(10))
}

/// Format a labelled entry such as `Lap 2: 00:20:00`.
pub fn format_labelled(label: &str, index: u32, elapsed: Duration) -> String {
    format!("{} {}{}{}", label, index, LABEL_SEPARATOR, format_time(elapsed))
}

/// Return the time portion of a labelled entry: everything after the last
/// `": "`, or the whole entry when there is no label.
pub fn time_component(entry: &str) -> &str {
    entry.rsplit(LABEL_SEPARATOR).next().unwrap_or(entry)
}

/// Parse a bare `MM:SS:CC` value into centiseconds.
///
/// Missing or non-numeric components count as zero; this never fails.
pub fn parse_centis(value: &str) -> u64 {
    let mut parts = value.split(':').map(|part| part.parse::<u64>().unwrap_or(0));
    let minutes = parts.next().unwrap_or(0);
    let seconds = parts.next().unwrap_or(0);
    let hundredths = parts.next().unwrap_or(0);

    minutes
        .saturating_mul(60)
        .saturating_add(seconds)
        .saturating_mul(100)
        .saturating_add(hundredths)
}

/// Parse a bare `MM:SS:CC` value into a duration (fail-closed, see [`parse_centis`]).
pub fn parse_time(value: &str) -> Duration {
    from_centis(parse_centis(value))
}

/// Parse the trailing time of a labelled entry such as `Lap 1: 00:30:50`.
pub fn parse_labelled(entry: &str) -> Duration {
    parse_time(time_component(entry))
}

/// Parse a labelled entry into seconds.
pub fn labelled_seconds(entry: &str) -> f64 {
    parse_centis(time_component(entry)) as f64 / 100.0
}
