//! Season calendar with past / next / upcoming classification.
//!
//! DESIGN
//! ======
//! An event is a *candidate* for "next" when its whole-day distance from now,
//! rounded up, lies inside `[-grace_days, lead_days]`. The grace side keeps a
//! race weekend marked as next for a couple of days after it starts. Among
//! candidates the chronologically first wins, so at most one event is next.
//!
//! Everything else splits on `now`: started events are past, the rest upcoming.
//! An event whose date cannot be parsed cannot be placed and stays upcoming.
//!
//! Each entry also lists the weekend's earlier sessions (practice, sprint,
//! qualifying) that the calendar carries, in start order.

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::jolpica::{ProviderNumber, Race, SessionSlot};
use crate::views::timing::non_empty;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    /// How many days ahead an event may be and still count as next.
    pub lead_days: i64,
    /// How many days after its start an event still counts as next.
    pub grace_days: i64,
}

impl Default for ScheduleWindow {
    fn default() -> Self {
        Self { lead_days: 14, grace_days: 2 }
    }
}

impl ScheduleWindow {
    #[must_use]
    pub fn contains(&self, diff_days: i64) -> bool {
        (-self.grace_days..=self.lead_days).contains(&diff_days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Past,
    Next,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    FirstPractice,
    SecondPractice,
    ThirdPractice,
    Sprint,
    Qualifying,
}

impl SessionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstPractice => "FP1",
            Self::SecondPractice => "FP2",
            Self::ThirdPractice => "FP3",
            Self::Sprint => "Sprint",
            Self::Qualifying => "Qualifying",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekendSession {
    pub kind: SessionKind,
    pub starts_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub round: Option<u32>,
    pub race_name: String,
    pub circuit: String,
    pub locality: Option<String>,
    pub country: Option<String>,
    pub starts_at: Option<OffsetDateTime>,
    pub status: EventStatus,
    /// Sessions before the race, earliest first; unplaceable ones last.
    pub sessions: Vec<WeekendSession>,
}

/// Start instant from an Ergast `date` (`YYYY-MM-DD`) and optional `time`
/// (`HH:MM:SSZ`). Without a time the event starts at UTC midnight.
#[must_use]
pub fn event_instant(date: Option<&str>, time: Option<&str>) -> Option<OffsetDateTime> {
    let date = Date::parse(non_empty(date)?, format_description!("[year]-[month]-[day]")).ok()?;
    let time = match non_empty(time) {
        Some(raw) => {
            let raw = raw.trim_end_matches('Z');
            Time::parse(raw, format_description!("[hour]:[minute]:[second]"))
                .or_else(|_| Time::parse(raw, format_description!("[hour]:[minute]")))
                .ok()?
        }
        None => Time::MIDNIGHT,
    };
    Some(PrimitiveDateTime::new(date, time).assume_utc())
}

/// Whole days from `now` to `at`, rounded up.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn days_until(at: OffsetDateTime, now: OffsetDateTime) -> i64 {
    ((at - now).as_seconds_f64() / SECONDS_PER_DAY).ceil() as i64
}

/// Classify event instants against `now`. The output lines up with the input.
#[must_use]
pub fn classify(instants: &[Option<OffsetDateTime>], now: OffsetDateTime, window: ScheduleWindow) -> Vec<EventStatus> {
    let next = instants
        .iter()
        .enumerate()
        .filter_map(|(idx, at)| at.map(|at| (idx, at)))
        .filter(|(_, at)| window.contains(days_until(*at, now)))
        .min_by_key(|(idx, at)| (*at, *idx))
        .map(|(idx, _)| idx);

    instants
        .iter()
        .enumerate()
        .map(|(idx, at)| match at {
            _ if Some(idx) == next => EventStatus::Next,
            Some(at) if *at < now => EventStatus::Past,
            _ => EventStatus::Upcoming,
        })
        .collect()
}

/// The weekend sessions a calendar round lists, earliest first.
#[must_use]
pub fn weekend_sessions(race: &Race) -> Vec<WeekendSession> {
    let slots: [(SessionKind, Option<&SessionSlot>); 5] = [
        (SessionKind::FirstPractice, race.first_practice.as_ref()),
        (SessionKind::SecondPractice, race.second_practice.as_ref()),
        (SessionKind::ThirdPractice, race.third_practice.as_ref()),
        (SessionKind::Sprint, race.sprint.as_ref()),
        (SessionKind::Qualifying, race.qualifying.as_ref()),
    ];
    let mut sessions: Vec<_> = slots
        .into_iter()
        .filter_map(|(kind, slot)| {
            slot.map(|slot| WeekendSession {
                kind,
                starts_at: event_instant(slot.date.as_deref(), slot.time.as_deref()),
            })
        })
        .collect();
    sessions.sort_by_key(|session| (session.starts_at.is_none(), session.starts_at));
    sessions
}

/// Build the classified calendar in provider order.
#[must_use]
pub fn schedule(races: &[Race], now: OffsetDateTime, window: ScheduleWindow) -> Vec<ScheduleEntry> {
    let instants: Vec<_> = races
        .iter()
        .map(|race| event_instant(race.date.as_deref(), race.time.as_deref()))
        .collect();
    let statuses = classify(&instants, now, window);

    races
        .iter()
        .zip(instants)
        .zip(statuses)
        .map(|((race, starts_at), status)| {
            let circuit = race.circuit.as_ref();
            let location = circuit.and_then(|c| c.location.as_ref());
            ScheduleEntry {
                round: race.round.as_ref().and_then(ProviderNumber::as_u32),
                race_name: non_empty(race.race_name.as_deref()).unwrap_or("TBA").to_string(),
                circuit: circuit
                    .and_then(|c| non_empty(c.circuit_name.as_deref()))
                    .unwrap_or("—")
                    .to_string(),
                locality: location
                    .and_then(|l| non_empty(l.locality.as_deref()))
                    .map(str::to_string),
                country: location
                    .and_then(|l| non_empty(l.country.as_deref()))
                    .map(str::to_string),
                starts_at,
                status,
                sessions: weekend_sessions(race),
            }
        })
        .collect()
}

#[must_use]
pub fn next_event(entries: &[ScheduleEntry]) -> Option<&ScheduleEntry> {
    entries.iter().find(|e| e.status == EventStatus::Next)
}

/// Most recently started event that is no longer next.
#[must_use]
pub fn last_completed(entries: &[ScheduleEntry]) -> Option<&ScheduleEntry> {
    entries
        .iter()
        .filter(|e| e.status == EventStatus::Past)
        .max_by_key(|e| e.starts_at)
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
