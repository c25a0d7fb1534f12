//! Display formatting for timing values.
//!
//! All numeric formatting lives here so rounding rules are stated once:
//!
//! - lap times are rounded to the nearest millisecond *before* splitting into
//!   minutes and seconds, so `59.9996` renders `1:00.000`, never `0:60.000`;
//! - zero, negative, non-finite and absent values render as [`PLACEHOLDER`].

use time::OffsetDateTime;
use time::macros::format_description;

use crate::openf1::GapValue;

/// Rendered for any value that is missing or not meaningful.
pub const PLACEHOLDER: &str = "—";

/// Longest lap time still rendered; anything slower is a data artefact.
pub const MAX_FORMATTED_LAP_SECS: f64 = 300.0;

/// `m:ss.sss` from one minute upward, `s.sss` below.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_lap_time(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds.filter(|s| s.is_finite() && *s > 0.0 && *s <= MAX_FORMATTED_LAP_SECS) else {
        return PLACEHOLDER.to_string();
    };
    let millis = (seconds * 1000.0).round() as u64;
    let minutes = millis / 60_000;
    let secs = (millis % 60_000) / 1000;
    let frac = millis % 1000;
    if minutes > 0 {
        format!("{minutes}:{secs:02}.{frac:03}")
    } else {
        format!("{secs}.{frac:03}")
    }
}

/// Gap to the leader: `+1.234`, the provider's text marker, `LEADER` for
/// the race leader without a gap, otherwise the placeholder.
#[must_use]
pub fn format_gap(gap: Option<&GapValue>, is_leader: bool) -> String {
    match gap {
        Some(value) => format_gap_value(value),
        None if is_leader => "LEADER".to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Interval to the car ahead; same rules as [`format_gap`] without a leader label.
#[must_use]
pub fn format_interval(interval: Option<&GapValue>) -> String {
    format_gap(interval, false)
}

fn format_gap_value(value: &GapValue) -> String {
    match value {
        GapValue::Seconds(s) if s.is_finite() => format!("+{s:.3}"),
        GapValue::Seconds(_) => PLACEHOLDER.to_string(),
        GapValue::Text(text) if text.trim().is_empty() => PLACEHOLDER.to_string(),
        GapValue::Text(text) => text.trim().to_string(),
    }
}

/// Stationary time in the pit lane, one decimal.
#[must_use]
pub fn format_pit_duration(seconds: Option<f64>) -> String {
    match seconds.filter(|s| s.is_finite() && *s >= 0.0) {
        Some(s) => format!("{s:.1}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// `HH:MM:SS` in UTC.
#[must_use]
pub fn format_clock(ts: Option<OffsetDateTime>) -> String {
    ts.and_then(|t| {
        t.to_offset(time::UtcOffset::UTC)
            .format(format_description!("[hour]:[minute]:[second]"))
            .ok()
    })
    .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `HH:MM` in UTC.
#[must_use]
pub fn format_clock_short(ts: Option<OffsetDateTime>) -> String {
    ts.and_then(|t| {
        t.to_offset(time::UtcOffset::UTC)
            .format(format_description!("[hour]:[minute]"))
            .ok()
    })
    .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
