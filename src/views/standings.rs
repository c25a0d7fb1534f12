//! Championship tables and race classification.

use crate::jolpica::{Constructor, ConstructorStanding, Driver, DriverStanding, ProviderNumber, Race};
use crate::theme::{TeamKey, resolve_team};
use crate::views::timing::non_empty;

#[derive(Debug, Clone, PartialEq)]
pub struct StandingsRow {
    /// 1-based position in the provider's ordering.
    pub rank: u32,
    pub name: String,
    /// Three-letter driver code; `None` for constructors.
    pub code: Option<String>,
    pub nationality: Option<String>,
    pub team: TeamKey,
    pub team_name: String,
    pub points: f64,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaceResultRow {
    pub position: Option<u32>,
    pub code: String,
    pub driver_name: String,
    pub team: TeamKey,
    pub team_name: String,
    pub points: f64,
    pub status: String,
}

/// Driver championship rows. The team is the driver's most recent constructor.
#[must_use]
pub fn driver_standings(entries: &[DriverStanding]) -> Vec<StandingsRow> {
    entries
        .iter()
        .zip(1u32..)
        .map(|(entry, rank)| {
            let driver = entry.driver.as_ref();
            let constructor = entry.constructors.last();
            StandingsRow {
                rank,
                name: driver_name(driver),
                code: driver.and_then(|d| non_empty(d.code.as_deref())).map(str::to_string),
                nationality: driver
                    .and_then(|d| non_empty(d.nationality.as_deref()))
                    .map(str::to_string),
                team: constructor_team(constructor),
                team_name: constructor_name(constructor),
                points: number(entry.points.as_ref()),
                wins: count(entry.wins.as_ref()),
            }
        })
        .collect()
}

#[must_use]
pub fn constructor_standings(entries: &[ConstructorStanding]) -> Vec<StandingsRow> {
    entries
        .iter()
        .zip(1u32..)
        .map(|(entry, rank)| {
            let constructor = entry.constructor.as_ref();
            let team_name = constructor_name(constructor);
            StandingsRow {
                rank,
                name: team_name.clone(),
                code: None,
                nationality: constructor
                    .and_then(|c| non_empty(c.nationality.as_deref()))
                    .map(str::to_string),
                team: constructor_team(constructor),
                team_name,
                points: number(entry.points.as_ref()),
                wins: count(entry.wins.as_ref()),
            }
        })
        .collect()
}

/// Finishing order of one race, in the provider's order.
#[must_use]
pub fn race_result(race: &Race) -> Vec<RaceResultRow> {
    race.results
        .iter()
        .map(|result| {
            let driver = result.driver.as_ref();
            let constructor = result.constructor.as_ref();
            RaceResultRow {
                position: result.position.as_ref().and_then(ProviderNumber::as_u32),
                code: driver
                    .and_then(|d| non_empty(d.code.as_deref()))
                    .map_or_else(|| "—".to_string(), str::to_string),
                driver_name: driver_name(driver),
                team: constructor_team(constructor),
                team_name: constructor_name(constructor),
                points: number(result.points.as_ref()),
                status: non_empty(result.status.as_deref()).unwrap_or("—").to_string(),
            }
        })
        .collect()
}

fn driver_name(driver: Option<&Driver>) -> String {
    let given = driver.and_then(|d| non_empty(d.given_name.as_deref()));
    let family = driver.and_then(|d| non_empty(d.family_name.as_deref()));
    match (given, family) {
        (Some(g), Some(f)) => format!("{g} {f}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => driver
            .and_then(|d| non_empty(d.driver_id.as_deref()))
            .unwrap_or("Unknown")
            .to_string(),
    }
}

fn constructor_name(constructor: Option<&Constructor>) -> String {
    constructor
        .and_then(|c| non_empty(c.name.as_deref()))
        .unwrap_or("Unknown")
        .to_string()
}

/// Prefer the stable constructor id; fall back to the display name.
fn constructor_team(constructor: Option<&Constructor>) -> TeamKey {
    let Some(c) = constructor else {
        return TeamKey::Neutral;
    };
    match resolve_team(c.constructor_id.as_deref()) {
        TeamKey::Neutral => resolve_team(c.name.as_deref()),
        key => key,
    }
}

fn number(value: Option<&ProviderNumber>) -> f64 {
    value.and_then(ProviderNumber::as_f64).unwrap_or(0.0)
}

fn count(value: Option<&ProviderNumber>) -> u32 {
    value.and_then(ProviderNumber::as_u32).unwrap_or(0)
}

#[cfg(test)]
#[path = "standings_test.rs"]
mod tests;
