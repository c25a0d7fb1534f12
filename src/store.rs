//! View store — the dashboard's in-memory snapshot of raw API data.
//!
//! DESIGN
//! ======
//! The poller is the only writer. Each write applies one whole batch under a
//! single lock acquisition, so readers never see half a refresh. Readers call
//! [`ViewStore::view`], which derives display rows from the raw records on
//! demand; nothing derived is cached.
//!
//! Two guards keep late results out:
//!
//! - **generation**: bumped by every `activate`/`deactivate`. A batch fetched
//!   under an older generation belongs to a torn-down view and is dropped.
//! - **sequence**: live batches carry an increasing sequence number. A batch
//!   whose number is not above the last applied one is dropped.
//!
//! A `None` field in a batch means that fetch failed or came back empty; the
//! previous value is kept so one bad poll does not blank a section.
//!
//! Subscribers are woken through a `watch` channel carrying a revision counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tokio::sync::{RwLock, watch};
use tracing::debug;

use crate::jolpica::{ConstructorStanding, DriverStanding, ProviderNumber, Race};
use crate::openf1::{
    DriverRecord, IntervalRecord, LapRecord, MeetingRecord, PitRecord, PositionRecord, RaceControlRecord,
    SessionRecord, StintRecord, WeatherRecord,
};
use crate::views::laps::{LapChart, lap_chart};
use crate::views::meetings::{MeetingRow, meetings};
use crate::views::pits::{PitStopRow, pit_stops};
use crate::views::race_control::{RaceControlFeed, RaceControlRow};
use crate::views::schedule::{ScheduleEntry, ScheduleWindow, schedule};
use crate::views::session::session_label;
use crate::views::standings::{
    RaceResultRow, StandingsRow, constructor_standings, driver_standings, race_result,
};
use crate::views::timing::{DriverViewRow, TimingInputs, race_order};
use crate::views::weather::{WeatherView, latest_weather};

// =============================================================================
// BATCHES
// =============================================================================

/// Everything fetched once when the dashboard activates.
#[derive(Debug, Clone, Default)]
pub struct LiveBatch {
    pub session: Option<SessionRecord>,
    pub positions: Option<Vec<PositionRecord>>,
    pub weather: Option<Vec<WeatherRecord>>,
    pub race_control: Option<Vec<RaceControlRecord>>,
    pub intervals: Option<Vec<IntervalRecord>>,
    pub stints: Option<Vec<StintRecord>>,
    pub pit_stops: Option<Vec<PitRecord>>,
    pub drivers: Option<Vec<DriverRecord>>,
    pub laps: Option<Vec<LapRecord>>,
    /// Season calendar from the live API, loaded with the session.
    pub meetings: Option<Vec<MeetingRecord>>,
}

/// The subset refreshed on every poll tick.
#[derive(Debug, Clone, Default)]
pub struct VolatileBatch {
    pub positions: Option<Vec<PositionRecord>>,
    pub weather: Option<Vec<WeatherRecord>>,
    pub race_control: Option<Vec<RaceControlRecord>>,
    pub intervals: Option<Vec<IntervalRecord>>,
}

impl From<VolatileBatch> for LiveBatch {
    fn from(batch: VolatileBatch) -> Self {
        Self {
            positions: batch.positions,
            weather: batch.weather,
            race_control: batch.race_control,
            intervals: batch.intervals,
            ..Self::default()
        }
    }
}

/// Season-level data from the historical API.
#[derive(Debug, Clone, Default)]
pub struct HistoryBatch {
    pub schedule: Option<Vec<Race>>,
    pub driver_standings: Option<Vec<DriverStanding>>,
    pub constructor_standings: Option<Vec<ConstructorStanding>>,
    pub last_result: Option<Race>,
}

// =============================================================================
// STATE
// =============================================================================

/// Raw records for one activation.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub session: Option<SessionRecord>,
    pub positions: Vec<PositionRecord>,
    pub weather: Vec<WeatherRecord>,
    pub intervals: Vec<IntervalRecord>,
    pub stints: Vec<StintRecord>,
    pub pit_stops: Vec<PitRecord>,
    pub drivers: Vec<DriverRecord>,
    pub laps: Vec<LapRecord>,
    pub meetings: Vec<MeetingRecord>,
    pub race_control: RaceControlFeed,
    pub schedule: Vec<Race>,
    pub driver_standings: Vec<DriverStanding>,
    pub constructor_standings: Vec<ConstructorStanding>,
    pub last_result: Option<Race>,
    /// Sequence number of the last applied live batch; 0 before the first.
    pub last_seq: u64,
    pub updated_at: Option<OffsetDateTime>,
}

impl DashboardState {
    #[must_use]
    pub fn new(race_control_limit: usize) -> Self {
        Self {
            session: None,
            positions: Vec::new(),
            weather: Vec::new(),
            intervals: Vec::new(),
            stints: Vec::new(),
            pit_stops: Vec::new(),
            drivers: Vec::new(),
            laps: Vec::new(),
            meetings: Vec::new(),
            race_control: RaceControlFeed::new(race_control_limit),
            schedule: Vec::new(),
            driver_standings: Vec::new(),
            constructor_standings: Vec::new(),
            last_result: None,
            last_seq: 0,
            updated_at: None,
        }
    }

    fn merge_live(&mut self, batch: LiveBatch) {
        replace(&mut self.session, batch.session);
        replace_vec(&mut self.positions, batch.positions);
        replace_vec(&mut self.weather, batch.weather);
        replace_vec(&mut self.intervals, batch.intervals);
        replace_vec(&mut self.stints, batch.stints);
        replace_vec(&mut self.pit_stops, batch.pit_stops);
        replace_vec(&mut self.drivers, batch.drivers);
        replace_vec(&mut self.laps, batch.laps);
        replace_vec(&mut self.meetings, batch.meetings);
        if let Some(messages) = batch.race_control {
            self.race_control.merge(&messages);
        }
    }

    fn merge_history(&mut self, batch: HistoryBatch) {
        replace_vec(&mut self.schedule, batch.schedule);
        replace_vec(&mut self.driver_standings, batch.driver_standings);
        replace_vec(&mut self.constructor_standings, batch.constructor_standings);
        replace(&mut self.last_result, batch.last_result);
    }
}

fn replace<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn replace_vec<T>(slot: &mut Vec<T>, value: Option<Vec<T>>) {
    if let Some(value) = value {
        *slot = value;
    }
}

// =============================================================================
// DERIVED VIEW
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LastResultView {
    pub race_name: String,
    pub round: Option<u32>,
    pub rows: Vec<RaceResultRow>,
}

impl LastResultView {
    #[must_use]
    pub fn from_race(race: &Race) -> Self {
        Self {
            race_name: race.race_name.clone().unwrap_or_else(|| "Race".to_string()),
            round: race.round.as_ref().and_then(ProviderNumber::as_u32),
            rows: race_result(race),
        }
    }
}

/// Display-ready snapshot. Built fresh by every [`ViewStore::view`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub session_key: Option<u32>,
    pub session_label: Option<String>,
    pub timing: Vec<DriverViewRow>,
    pub weather: Option<WeatherView>,
    pub race_control: Vec<RaceControlRow>,
    pub pit_stops: Vec<PitStopRow>,
    pub lap_chart: Option<LapChart>,
    pub meetings: Vec<MeetingRow>,
    pub schedule: Vec<ScheduleEntry>,
    pub driver_standings: Vec<StandingsRow>,
    pub constructor_standings: Vec<StandingsRow>,
    pub last_result: Option<LastResultView>,
    pub updated_at: Option<OffsetDateTime>,
}

impl DashboardView {
    fn derive(state: &DashboardState, now: OffsetDateTime, window: ScheduleWindow) -> Self {
        Self {
            session_key: state.session.as_ref().and_then(|s| s.session_key),
            session_label: state.session.as_ref().map(session_label),
            timing: race_order(TimingInputs {
                positions: &state.positions,
                drivers: &state.drivers,
                intervals: &state.intervals,
                stints: &state.stints,
                laps: &state.laps,
            }),
            weather: latest_weather(&state.weather),
            race_control: state.race_control.rows(),
            pit_stops: pit_stops(&state.pit_stops, &state.drivers),
            lap_chart: lap_chart(&state.laps),
            meetings: meetings(&state.meetings),
            schedule: schedule(&state.schedule, now, window),
            driver_standings: driver_standings(&state.driver_standings),
            constructor_standings: constructor_standings(&state.constructor_standings),
            last_result: state.last_result.as_ref().map(LastResultView::from_race),
            updated_at: state.updated_at,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Shared handle to the dashboard state. Clones share the same store.
#[derive(Clone)]
pub struct ViewStore {
    state: Arc<RwLock<DashboardState>>,
    generation: Arc<AtomicU64>,
    revision: Arc<watch::Sender<u64>>,
    race_control_limit: usize,
    window: ScheduleWindow,
}

impl ViewStore {
    #[must_use]
    pub fn new(race_control_limit: usize, window: ScheduleWindow) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(DashboardState::new(race_control_limit))),
            generation: Arc::new(AtomicU64::new(0)),
            revision: Arc::new(revision),
            race_control_limit,
            window,
        }
    }

    /// Start a new activation: clear all data and return its generation.
    pub async fn activate(&self) -> u64 {
        let mut state = self.state.write().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = DashboardState::new(self.race_control_limit);
        drop(state);
        self.bump_revision();
        generation
    }

    /// End `generation` if it is still the current one. Data stays readable;
    /// further batches for that generation are discarded.
    pub fn deactivate(&self, generation: u64) -> bool {
        self.generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply a full live batch. Returns whether it was applied.
    pub async fn apply_live(&self, generation: u64, seq: u64, batch: LiveBatch) -> bool {
        let mut state = self.state.write().await;
        if !self.is_current(generation) {
            debug!(generation, seq, "discarding live batch from stale generation");
            return false;
        }
        if seq <= state.last_seq {
            debug!(generation, seq, last_seq = state.last_seq, "discarding out-of-order live batch");
            return false;
        }
        state.merge_live(batch);
        state.last_seq = seq;
        state.updated_at = Some(OffsetDateTime::now_utc());
        drop(state);
        debug!(generation, seq, "live batch applied");
        self.bump_revision();
        true
    }

    pub async fn apply_volatile(&self, generation: u64, seq: u64, batch: VolatileBatch) -> bool {
        self.apply_live(generation, seq, batch.into()).await
    }

    /// Apply season data. History is fetched once per activation, so only
    /// the generation is checked.
    pub async fn apply_history(&self, generation: u64, batch: HistoryBatch) -> bool {
        let mut state = self.state.write().await;
        if !self.is_current(generation) {
            debug!(generation, "discarding history batch from stale generation");
            return false;
        }
        state.merge_history(batch);
        drop(state);
        debug!(generation, "history batch applied");
        self.bump_revision();
        true
    }

    /// Receiver that changes whenever a batch is applied or the store resets.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Derive the display snapshot as of `now`.
    pub async fn view(&self, now: OffsetDateTime) -> DashboardView {
        let state = self.state.read().await;
        DashboardView::derive(&state, now, self.window)
    }

    /// Sequence number of the last applied live batch.
    pub async fn last_seq(&self) -> u64 {
        self.state.read().await.last_seq
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
