//! Plain-text rendering of derived views for the terminal.
//!
//! Every renderer returns a `String` so the CLI decides where it goes.
//! Sections with no data print a one-line notice instead of an empty table.

use std::fmt::Write;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::store::{DashboardView, LastResultView};
use crate::views::format::{PLACEHOLDER, format_clock};
use crate::views::meetings::MeetingRow;
use crate::views::schedule::{EventStatus, ScheduleEntry};
use crate::views::standings::StandingsRow;
use crate::views::weather::WeatherView;

const NO_SESSION: &str = "No live session data available.";
const UNAVAILABLE: &str = "Unavailable.";

// `write!` into a `String` cannot fail, so results are discarded throughout.

#[must_use]
pub fn render_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let label = view.session_label.as_deref().unwrap_or("No session");
    let key = view.session_key.map(|k| format!("session {k}, ")).unwrap_or_default();
    let _ = writeln!(out, "== {label} == ({key}updated {})", format_clock(view.updated_at));

    if let Some(weather) = &view.weather {
        let _ = writeln!(out, "{}", weather_line(weather));
    }

    let _ = writeln!(out);
    if view.timing.is_empty() {
        let _ = writeln!(out, "{NO_SESSION}");
    } else {
        let _ = writeln!(
            out,
            "{:>3}  {:<5} {:<22} {:<10} {:>10} {:>10} {:>9}  {:<4} {:>4}",
            "POS", "CODE", "DRIVER", "TEAM", "GAP", "INT", "LAST", "TYRE", "PIT"
        );
        for row in &view.timing {
            let tyre = match row.tyre_age {
                Some(age) => format!("{}{age}", row.tyre.label()),
                None => row.tyre.label().to_string(),
            };
            let _ = writeln!(
                out,
                "{:>3}  {:<5} {:<22} {:<10} {:>10} {:>10} {:>9}  {:<4} {:>4}",
                row.position,
                row.code,
                truncate(&row.name, 22),
                row.team.theme().short,
                row.gap,
                row.interval,
                row.last_lap,
                tyre,
                row.pit_count
            );
        }
    }

    if !view.race_control.is_empty() {
        let _ = writeln!(out, "\n-- Race control --");
        for msg in view.race_control.iter().take(8) {
            let _ = writeln!(out, "{}  {}", msg.time, msg.message);
        }
    }

    if !view.pit_stops.is_empty() {
        let _ = writeln!(out, "\n-- Fastest stops --");
        for stop in view.pit_stops.iter().take(5) {
            let lap = stop.lap.map_or_else(|| PLACEHOLDER.to_string(), |l| format!("L{l}"));
            let _ = writeln!(out, "{:<5} {:>5}  {:>5}s  {}", stop.code, lap, stop.duration, stop.time);
        }
    }

    if let Some(entry) = view.schedule.iter().find(|e| e.status == EventStatus::Next) {
        let _ = writeln!(out, "\nNext: {}", schedule_line(entry));
        if !entry.sessions.is_empty() {
            let _ = writeln!(out, "      {}", sessions_line(entry));
        }
    }

    if !view.meetings.is_empty() {
        let _ = writeln!(out, "\n-- Meetings --");
        out.push_str(&render_meetings(&view.meetings));
    }
    out
}

fn weather_line(weather: &WeatherView) -> String {
    let temp = |value: Option<f64>| value.map_or_else(|| PLACEHOLDER.to_string(), |t| format!("{t:.1}°C"));
    let humidity = weather
        .humidity
        .map_or_else(|| PLACEHOLDER.to_string(), |h| format!("{h:.0}%"));
    format!(
        "Air {}  Track {}  Humidity {}  {}",
        temp(weather.air_temperature),
        temp(weather.track_temperature),
        humidity,
        if weather.raining { "RAIN" } else { "Dry" }
    )
}

#[must_use]
pub fn render_standings(drivers: &[StandingsRow], constructors: &[StandingsRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-- Drivers --");
    standings_table(&mut out, drivers);
    let _ = writeln!(out, "\n-- Constructors --");
    standings_table(&mut out, constructors);
    out
}

fn standings_table(out: &mut String, rows: &[StandingsRow]) {
    if rows.is_empty() {
        let _ = writeln!(out, "{UNAVAILABLE}");
        return;
    }
    for row in rows {
        let name = match &row.code {
            Some(code) => format!("{code}  {}", row.name),
            None => row.name.clone(),
        };
        let _ = writeln!(
            out,
            "{:>3}  {:<28} {:<4} {:>7} pts {:>3} wins",
            row.rank,
            truncate(&name, 28),
            row.team.theme().short,
            format_points(row.points),
            row.wins
        );
    }
}

#[must_use]
pub fn render_schedule(entries: &[ScheduleEntry]) -> String {
    if entries.is_empty() {
        return format!("{UNAVAILABLE}\n");
    }
    let mut out = String::new();
    for entry in entries {
        let marker = match entry.status {
            EventStatus::Past => " ",
            EventStatus::Next => ">",
            EventStatus::Upcoming => "·",
        };
        let _ = writeln!(out, "{marker} {}", schedule_line(entry));
        if entry.status == EventStatus::Next && !entry.sessions.is_empty() {
            let _ = writeln!(out, "       {}", sessions_line(entry));
        }
    }
    out
}

fn schedule_line(entry: &ScheduleEntry) -> String {
    let round = entry.round.map_or_else(|| "R?".to_string(), |r| format!("R{r:02}"));
    let place = match (&entry.locality, &entry.country) {
        (Some(locality), Some(country)) => format!("{locality}, {country}"),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => entry.circuit.clone(),
    };
    format!("{round}  {:<28} {:<24} {}", entry.race_name, place, format_date(entry.starts_at))
}

fn sessions_line(entry: &ScheduleEntry) -> String {
    entry
        .sessions
        .iter()
        .map(|session| format!("{} {}", session.kind.label(), format_date(session.starts_at)))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[must_use]
pub fn render_meetings(rows: &[MeetingRow]) -> String {
    if rows.is_empty() {
        return format!("{UNAVAILABLE}\n");
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{:>2}  {:<32} {:<28} {}", row.index, truncate(&row.name, 32), truncate(&row.place, 28), row.date);
    }
    out
}

#[must_use]
pub fn render_result(result: Option<&LastResultView>) -> String {
    let Some(result) = result else {
        return format!("{UNAVAILABLE}\n");
    };
    let mut out = String::new();
    let round = result.round.map(|r| format!("Round {r} · ")).unwrap_or_default();
    let _ = writeln!(out, "{round}{}", result.race_name);
    if result.rows.is_empty() {
        let _ = writeln!(out, "No classification.");
        return out;
    }
    for row in &result.rows {
        let pos = row.position.map_or_else(|| PLACEHOLDER.to_string(), |p| p.to_string());
        let _ = writeln!(
            out,
            "{:>3}  {:<4} {:<24} {:<4} {:>5}  {}",
            pos,
            row.code,
            truncate(&row.driver_name, 24),
            row.team.theme().short,
            format_points(row.points),
            row.status
        );
    }
    out
}

fn format_points(points: f64) -> String {
    if points.fract().abs() < f64::EPSILON {
        format!("{points:.0}")
    } else {
        format!("{points:.1}")
    }
}

fn format_date(at: Option<OffsetDateTime>) -> String {
    at.and_then(|t| t.format(format_description!("[year]-[month]-[day] [hour]:[minute]Z")).ok())
        .unwrap_or_else(|| "TBA".to_string())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        text.chars().take(width.saturating_sub(1)).chain(std::iter::once('…')).collect()
    }
}
