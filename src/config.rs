//! Dashboard configuration parsed from environment variables.
//!
//! Every knob has a default so the dashboard runs with an empty environment.
//! Invalid numbers fall back to their default; only values that would make
//! the scheduler meaningless (a zero poll interval) are rejected.

use std::time::Duration;

use crate::views::schedule::ScheduleWindow;

pub const DEFAULT_OPENF1_BASE_URL: &str = "https://api.openf1.org/v1";
pub const DEFAULT_JOLPICA_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_RATE_LIMIT_PER_SEC: u32 = 3;
pub const DEFAULT_HTTP_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_NEXT_EVENT_LEAD_DAYS: i64 = 14;
pub const DEFAULT_NEXT_EVENT_GRACE_DAYS: i64 = 2;
pub const DEFAULT_RACE_CONTROL_LIMIT: usize = 30;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be greater than zero")]
    ZeroValue { var: &'static str },
}

// =============================================================================
// CONFIG TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_HTTP_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    /// Live-session API base, e.g. `https://api.openf1.org/v1`.
    pub openf1_base_url: String,
    /// Historical-results API base, e.g. `https://api.jolpi.ca/ergast/f1`.
    pub jolpica_base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub endpoints: ApiEndpoints,
    pub timeouts: HttpTimeouts,
    /// Cadence of the periodic live refresh.
    pub poll_interval: Duration,
    /// Outgoing request cap; zero disables pacing.
    pub rate_limit_per_sec: u32,
    /// Season whose calendar is classified into past/next/upcoming.
    pub schedule_season: i32,
    /// Season whose championship tables are shown.
    pub standings_season: i32,
    pub schedule_window: ScheduleWindow,
    pub race_control_limit: usize,
}

impl DashboardConfig {
    /// Build typed dashboard config from environment variables.
    ///
    /// Optional:
    /// - `OPENF1_BASE_URL`, `JOLPICA_BASE_URL`
    /// - `POLL_INTERVAL_SECS`: default 30, must be non-zero
    /// - `RATE_LIMIT_PER_SEC`: default 3, 0 disables pacing
    /// - `HTTP_REQUEST_TIMEOUT_SECS`: default 15
    /// - `HTTP_CONNECT_TIMEOUT_SECS`: default 5
    /// - `SCHEDULE_SEASON`: default current UTC year
    /// - `STANDINGS_SEASON`: default schedule season minus one
    /// - `NEXT_EVENT_LEAD_DAYS`: default 14
    /// - `NEXT_EVENT_GRACE_DAYS`: default 2
    /// - `RACE_CONTROL_LIMIT`: default 30
    ///
    /// # Errors
    ///
    /// Returns an error if the poll interval or race control limit is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let current_year = time::OffsetDateTime::now_utc().year();
        Self::from_lookup(|key| std::env::var(key).ok(), current_year)
    }

    /// Build config from an arbitrary key lookup (for testing).
    pub(crate) fn from_lookup<F>(lookup: F, current_year: i32) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoints = ApiEndpoints {
            openf1_base_url: base_url(lookup("OPENF1_BASE_URL"), DEFAULT_OPENF1_BASE_URL),
            jolpica_base_url: base_url(lookup("JOLPICA_BASE_URL"), DEFAULT_JOLPICA_BASE_URL),
        };
        let timeouts = HttpTimeouts {
            request_secs: parse_or(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", DEFAULT_HTTP_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
        };

        let poll_secs = parse_or(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(ConfigError::ZeroValue { var: "POLL_INTERVAL_SECS" });
        }
        let race_control_limit = parse_or(&lookup, "RACE_CONTROL_LIMIT", DEFAULT_RACE_CONTROL_LIMIT);
        if race_control_limit == 0 {
            return Err(ConfigError::ZeroValue { var: "RACE_CONTROL_LIMIT" });
        }

        let schedule_season = parse_or(&lookup, "SCHEDULE_SEASON", current_year);
        let standings_season = parse_or(&lookup, "STANDINGS_SEASON", schedule_season - 1);

        Ok(Self {
            endpoints,
            timeouts,
            poll_interval: Duration::from_secs(poll_secs),
            rate_limit_per_sec: parse_or(&lookup, "RATE_LIMIT_PER_SEC", DEFAULT_RATE_LIMIT_PER_SEC),
            schedule_season,
            standings_season,
            schedule_window: ScheduleWindow {
                lead_days: parse_or(&lookup, "NEXT_EVENT_LEAD_DAYS", DEFAULT_NEXT_EVENT_LEAD_DAYS),
                grace_days: parse_or(&lookup, "NEXT_EVENT_GRACE_DAYS", DEFAULT_NEXT_EVENT_GRACE_DAYS),
            },
            race_control_limit,
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn base_url(raw: Option<String>, default: &str) -> String {
    raw.filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
