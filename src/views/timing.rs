//! Race order — the joined live timing board.
//!
//! DESIGN
//! ======
//! Positions, intervals, stints and laps are each reduced to one record per
//! driver number, then joined onto the latest position and the driver roster.
//! Positions and intervals are ordered by timestamp; stints by stint number
//! and laps by lap number, since those carry no reliable timestamp.

use std::collections::HashMap;

use crate::openf1::{DriverRecord, IntervalRecord, LapRecord, PositionRecord, StintRecord};
use crate::theme::{TeamKey, resolve_team};
use crate::views::format::{format_gap, format_interval, format_lap_time};
use crate::views::latest::{latest_by_key, parse_timestamp};
use crate::views::tyre::TyreCompound;

/// Cars classified beyond this position are not shown.
pub const MAX_CLASSIFIED_POSITION: u32 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct DriverViewRow {
    pub position: u32,
    pub driver_number: u32,
    pub code: String,
    pub name: String,
    pub team: TeamKey,
    pub team_name: String,
    /// `#RRGGBB`, when the roster carries one.
    pub team_colour: Option<String>,
    pub gap: String,
    pub interval: String,
    pub last_lap: String,
    pub tyre: TyreCompound,
    /// Laps on the current set, including laps run before fitting.
    pub tyre_age: Option<u32>,
    pub pit_count: u32,
}

/// Raw live-timing inputs for [`race_order`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingInputs<'a> {
    pub positions: &'a [PositionRecord],
    pub drivers: &'a [DriverRecord],
    pub intervals: &'a [IntervalRecord],
    pub stints: &'a [StintRecord],
    pub laps: &'a [LapRecord],
}

/// Build the timing board, sorted by position.
#[must_use]
pub fn race_order(inputs: TimingInputs<'_>) -> Vec<DriverViewRow> {
    let latest_positions = latest_by_key(inputs.positions, |p| p.driver_number, |p| parse_timestamp(p.date.as_deref()));
    if latest_positions.is_empty() {
        return Vec::new();
    }

    let roster: HashMap<u32, &DriverRecord> = inputs
        .drivers
        .iter()
        .filter_map(|d| d.driver_number.map(|n| (n, d)))
        .collect();
    let intervals = latest_by_key(inputs.intervals, |i| i.driver_number, |i| parse_timestamp(i.date.as_deref()));
    let stints = latest_by_key(inputs.stints, |s| s.driver_number, |s| s.stint_number);
    let laps = latest_by_key(inputs.laps, |l| l.driver_number, |l| l.lap_number);

    let mut rows: Vec<DriverViewRow> = latest_positions
        .into_iter()
        .filter_map(|(number, record)| {
            let position = record
                .position
                .filter(|p| (1..=MAX_CLASSIFIED_POSITION).contains(p))?;
            let driver = roster.get(&number).copied();
            let interval = intervals.get(&number).copied();
            let stint = stints.get(&number).copied();
            let lap = laps.get(&number).copied();
            Some(build_row(position, number, driver, interval, stint, lap))
        })
        .collect();

    rows.sort_by_key(|row| (row.position, row.driver_number));
    rows
}

fn build_row(
    position: u32,
    number: u32,
    driver: Option<&DriverRecord>,
    interval: Option<&IntervalRecord>,
    stint: Option<&StintRecord>,
    lap: Option<&LapRecord>,
) -> DriverViewRow {
    let acronym = driver.and_then(|d| non_empty(d.name_acronym.as_deref()));
    let full_name = driver.and_then(|d| non_empty(d.full_name.as_deref()));
    let team_name = driver.and_then(|d| non_empty(d.team_name.as_deref()));

    DriverViewRow {
        position,
        driver_number: number,
        code: acronym.map_or_else(|| format!("#{number}"), str::to_string),
        name: full_name
            .or(acronym)
            .map_or_else(|| format!("Driver {number}"), str::to_string),
        team: resolve_team(team_name),
        team_name: team_name.unwrap_or("Unknown").to_string(),
        team_colour: driver
            .and_then(|d| non_empty(d.team_colour.as_deref()))
            .map(|hex| format!("#{}", hex.trim_start_matches('#'))),
        gap: format_gap(interval.and_then(|i| i.gap_to_leader.as_ref()), position == 1),
        interval: format_interval(interval.and_then(|i| i.interval.as_ref())),
        last_lap: format_lap_time(lap.and_then(|l| l.lap_duration)),
        tyre: TyreCompound::parse(stint.and_then(|s| s.compound.as_deref())),
        tyre_age: stint.and_then(tyre_age),
        pit_count: stint
            .and_then(|s| s.stint_number)
            .map_or(0, |n| n.saturating_sub(1)),
    }
}

/// Age at fitting plus laps completed in the stint, from whichever parts exist.
fn tyre_age(stint: &StintRecord) -> Option<u32> {
    let run = match (stint.lap_start, stint.lap_end) {
        (Some(start), Some(end)) => Some(end.saturating_sub(start)),
        _ => None,
    };
    match (stint.tyre_age_at_start, run) {
        (None, None) => None,
        (at_start, run) => Some(at_start.unwrap_or(0) + run.unwrap_or(0)),
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "timing_test.rs"]
mod tests;
