//! Jolpica-F1 (Ergast-compatible) historical API client.
//!
//! DESIGN
//! ======
//! Every response is wrapped in an `MRData` envelope holding one typed table
//! (`RaceTable` or `StandingsTable`). The envelope types are private; the
//! client unwraps them and hands back the inner records, or `None` when the
//! envelope is missing, malformed, or empty.
//!
//! Ergast serializes numbers as strings (`"points": "25"`), and some mirrors
//! send real numbers. [`ProviderNumber`] accepts both.

use std::sync::Arc;

use serde::Deserialize;

use crate::gateway::Gateway;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A numeric field that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderNumber {
    Number(f64),
    Text(String),
}

impl ProviderNumber {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }

    /// Whole, non-negative value; fractions are truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_u32(&self) -> Option<u32> {
        self.as_f64()
            .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n.trunc() as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub locality: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub circuit_name: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: Option<String>,
    pub code: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub constructor_id: Option<String>,
    pub name: Option<String>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub position: Option<ProviderNumber>,
    pub points: Option<ProviderNumber>,
    pub status: Option<String>,
    #[serde(rename = "Driver")]
    pub driver: Option<Driver>,
    #[serde(rename = "Constructor")]
    pub constructor: Option<Constructor>,
}

/// One weekend session before the race. Same formats as [`Race::date`] and
/// [`Race::time`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionSlot {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub round: Option<ProviderNumber>,
    pub race_name: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `HH:MM:SSZ`, absent for older seasons.
    pub time: Option<String>,
    #[serde(rename = "Circuit")]
    pub circuit: Option<Circuit>,
    #[serde(rename = "FirstPractice")]
    pub first_practice: Option<SessionSlot>,
    #[serde(rename = "SecondPractice")]
    pub second_practice: Option<SessionSlot>,
    #[serde(rename = "ThirdPractice")]
    pub third_practice: Option<SessionSlot>,
    /// Sprint weekends only.
    #[serde(rename = "Sprint")]
    pub sprint: Option<SessionSlot>,
    #[serde(rename = "Qualifying")]
    pub qualifying: Option<SessionSlot>,
    #[serde(rename = "Results", default)]
    pub results: Vec<RaceResult>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverStanding {
    pub position: Option<ProviderNumber>,
    pub points: Option<ProviderNumber>,
    pub wins: Option<ProviderNumber>,
    #[serde(rename = "Driver")]
    pub driver: Option<Driver>,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstructorStanding {
    pub position: Option<ProviderNumber>,
    pub points: Option<ProviderNumber>,
    pub wins: Option<ProviderNumber>,
    #[serde(rename = "Constructor")]
    pub constructor: Option<Constructor>,
}

// -----------------------------------------------------------------------------
// Envelope
// -----------------------------------------------------------------------------

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MRData")]
    mr_data: T,
}

#[derive(Deserialize)]
struct RaceTableData {
    #[serde(rename = "RaceTable")]
    race_table: Option<RaceTable>,
}

#[derive(Deserialize)]
struct RaceTable {
    #[serde(rename = "Races", default)]
    races: Vec<Race>,
}

#[derive(Deserialize)]
struct StandingsTableData {
    #[serde(rename = "StandingsTable")]
    standings_table: Option<StandingsTable>,
}

#[derive(Deserialize)]
struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    lists: Vec<StandingsList>,
}

#[derive(Deserialize)]
struct StandingsList {
    #[serde(rename = "DriverStandings", default)]
    driver_standings: Vec<DriverStanding>,
    #[serde(rename = "ConstructorStandings", default)]
    constructor_standings: Vec<ConstructorStanding>,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed access to the season-scoped historical endpoints.
pub struct HistoryClient {
    gateway: Arc<Gateway>,
    base_url: String,
}

impl HistoryClient {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>, base_url: impl Into<String>) -> Self {
        Self { gateway, base_url: base_url.into() }
    }

    /// Season calendar.
    pub async fn schedule(&self, season: i32) -> Option<Vec<Race>> {
        self.races(&format!("{}/{season}.json", self.base_url)).await
    }

    pub async fn driver_standings(&self, season: i32) -> Option<Vec<DriverStanding>> {
        let url = format!("{}/{season}/driverStandings.json", self.base_url);
        self.first_standings_list(&url)
            .await
            .map(|list| list.driver_standings)
    }

    pub async fn constructor_standings(&self, season: i32) -> Option<Vec<ConstructorStanding>> {
        let url = format!("{}/{season}/constructorStandings.json", self.base_url);
        self.first_standings_list(&url)
            .await
            .map(|list| list.constructor_standings)
    }

    /// Classification of one round.
    pub async fn race_result(&self, season: i32, round: u32) -> Option<Race> {
        let url = format!("{}/{season}/{round}/results.json", self.base_url);
        self.first_race(&url).await
    }

    /// Classification of the most recently completed round.
    pub async fn last_result(&self) -> Option<Race> {
        let url = format!("{}/current/last/results.json", self.base_url);
        self.first_race(&url).await
    }

    async fn races(&self, url: &str) -> Option<Vec<Race>> {
        let envelope: Envelope<RaceTableData> = self.gateway.fetch_opt(url).await?;
        envelope.mr_data.race_table.map(|table| table.races)
    }

    async fn first_race(&self, url: &str) -> Option<Race> {
        self.races(url).await?.into_iter().next()
    }

    async fn first_standings_list(&self, url: &str) -> Option<StandingsList> {
        let envelope: Envelope<StandingsTableData> = self.gateway.fetch_opt(url).await?;
        envelope.mr_data.standings_table?.lists.into_iter().next()
    }
}

#[cfg(test)]
#[path = "jolpica_test.rs"]
mod tests;
