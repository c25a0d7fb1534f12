//! OpenF1 live-session API client.
//!
//! Thin typed wrapper over the read-only `/v1/*` endpoints. Session endpoints
//! are filtered by `session_key`; the literal `latest` selects the most recent
//! session. `meetings` is filtered by season instead. Wire types are partial: every field the dashboard reads is an
//! `Option`, unknown fields are ignored, and a body that is not an array of
//! records degrades to "no data" at the gateway.

use std::sync::Arc;

use serde::Deserialize;

use crate::gateway::Gateway;

/// Session key selecting the most recent session.
pub const LATEST_SESSION: &str = "latest";

/// Live timing covers the classified field only.
const POSITION_FILTER: &str = "position<=20";

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionRecord {
    pub session_key: Option<u32>,
    pub session_name: Option<String>,
    pub session_type: Option<String>,
    pub location: Option<String>,
    pub circuit_short_name: Option<String>,
}

/// One Grand Prix weekend on the season calendar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeetingRecord {
    pub meeting_key: Option<u32>,
    pub meeting_name: Option<String>,
    pub location: Option<String>,
    pub country_name: Option<String>,
    /// RFC 3339.
    pub date_start: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionRecord {
    pub driver_number: Option<u32>,
    pub position: Option<u32>,
    pub date: Option<String>,
}

/// Gap or interval as reported by the provider: seconds, or a text marker
/// such as `"+1 LAP"` for lapped cars.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GapValue {
    Seconds(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntervalRecord {
    pub driver_number: Option<u32>,
    pub gap_to_leader: Option<GapValue>,
    pub interval: Option<GapValue>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StintRecord {
    pub driver_number: Option<u32>,
    pub stint_number: Option<u32>,
    pub compound: Option<String>,
    pub lap_start: Option<u32>,
    pub lap_end: Option<u32>,
    pub tyre_age_at_start: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LapRecord {
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub lap_duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PitRecord {
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub pit_duration: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverRecord {
    pub driver_number: Option<u32>,
    pub name_acronym: Option<String>,
    pub full_name: Option<String>,
    pub team_name: Option<String>,
    /// Hex colour without the leading `#`.
    pub team_colour: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherRecord {
    pub air_temperature: Option<f64>,
    pub track_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    /// Provider sends `0`/`1`.
    pub rainfall: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RaceControlRecord {
    pub date: Option<String>,
    pub category: Option<String>,
    pub flag: Option<String>,
    pub message: Option<String>,
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed access to the live-session endpoints.
pub struct LiveClient {
    gateway: Arc<Gateway>,
    base_url: String,
}

impl LiveClient {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>, base_url: impl Into<String>) -> Self {
        Self { gateway, base_url: base_url.into() }
    }

    fn url(&self, endpoint: &str, session_key: &str) -> String {
        format!("{}/{endpoint}?session_key={session_key}", self.base_url)
    }

    pub async fn sessions(&self, session_key: &str) -> Option<Vec<SessionRecord>> {
        self.gateway.fetch_opt(&self.url("sessions", session_key)).await
    }

    /// The last session the provider lists for `session_key`.
    pub async fn session(&self, session_key: &str) -> Option<SessionRecord> {
        self.sessions(session_key).await.and_then(|mut sessions| sessions.pop())
    }

    pub async fn positions(&self, session_key: &str) -> Option<Vec<PositionRecord>> {
        let url = format!("{}&{POSITION_FILTER}", self.url("position", session_key));
        self.gateway.fetch_opt(&url).await
    }

    pub async fn intervals(&self, session_key: &str) -> Option<Vec<IntervalRecord>> {
        self.gateway.fetch_opt(&self.url("intervals", session_key)).await
    }

    pub async fn weather(&self, session_key: &str) -> Option<Vec<WeatherRecord>> {
        self.gateway.fetch_opt(&self.url("weather", session_key)).await
    }

    pub async fn race_control(&self, session_key: &str) -> Option<Vec<RaceControlRecord>> {
        self.gateway.fetch_opt(&self.url("race_control", session_key)).await
    }

    pub async fn stints(&self, session_key: &str) -> Option<Vec<StintRecord>> {
        self.gateway.fetch_opt(&self.url("stints", session_key)).await
    }

    pub async fn pit_stops(&self, session_key: &str) -> Option<Vec<PitRecord>> {
        self.gateway.fetch_opt(&self.url("pit", session_key)).await
    }

    pub async fn drivers(&self, session_key: &str) -> Option<Vec<DriverRecord>> {
        self.gateway.fetch_opt(&self.url("drivers", session_key)).await
    }

    pub async fn laps(&self, session_key: &str) -> Option<Vec<LapRecord>> {
        self.gateway.fetch_opt(&self.url("laps", session_key)).await
    }

    /// Every meeting of `year`, in provider order.
    pub async fn meetings(&self, year: i32) -> Option<Vec<MeetingRecord>> {
        let url = format!("{}/meetings?year={year}", self.base_url);
        self.gateway.fetch_opt(&url).await
    }
}

#[cfg(test)]
#[path = "openf1_test.rs"]
mod tests;
