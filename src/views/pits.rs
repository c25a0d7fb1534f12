//! Pit stop table, fastest stop first.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::openf1::{DriverRecord, PitRecord};
use crate::views::format::{format_clock_short, format_pit_duration};
use crate::views::latest::parse_timestamp;
use crate::views::timing::non_empty;

#[derive(Debug, Clone, PartialEq)]
pub struct PitStopRow {
    pub driver_number: Option<u32>,
    pub code: String,
    pub team_colour: Option<String>,
    pub lap: Option<u32>,
    pub duration_secs: Option<f64>,
    pub duration: String,
    /// `HH:MM` UTC.
    pub time: String,
}

/// Stops sorted by duration ascending; stops without a usable duration sort
/// last, keeping their input order.
#[must_use]
pub fn pit_stops(pits: &[PitRecord], drivers: &[DriverRecord]) -> Vec<PitStopRow> {
    let roster: HashMap<u32, &DriverRecord> = drivers
        .iter()
        .filter_map(|d| d.driver_number.map(|n| (n, d)))
        .collect();

    let mut rows: Vec<PitStopRow> = pits
        .iter()
        .map(|pit| {
            let driver = pit.driver_number.and_then(|n| roster.get(&n).copied());
            let duration_secs = pit.pit_duration.filter(|d| d.is_finite() && *d >= 0.0);
            PitStopRow {
                driver_number: pit.driver_number,
                code: driver
                    .and_then(|d| non_empty(d.name_acronym.as_deref()))
                    .map(str::to_string)
                    .or_else(|| pit.driver_number.map(|n| format!("#{n}")))
                    .unwrap_or_else(|| "—".to_string()),
                team_colour: driver
                    .and_then(|d| non_empty(d.team_colour.as_deref()))
                    .map(|hex| format!("#{}", hex.trim_start_matches('#'))),
                lap: pit.lap_number,
                duration_secs,
                duration: format_pit_duration(duration_secs),
                time: format_clock_short(parse_timestamp(pit.date.as_deref())),
            }
        })
        .collect();

    rows.sort_by(|a, b| match (a.duration_secs, b.duration_secs) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}
