//! Polling scheduler — one-shot load plus periodic live refresh.
//!
//! DESIGN
//! ======
//! [`activate_dashboard`] starts a new store generation and spawns one task
//! that first loads everything (season data, the meetings calendar and the
//! full live batch), then refreshes the volatile live endpoints on a fixed
//! interval.
//!
//! Each batch fans its requests out with `tokio::join!` and writes the
//! results to the store in one call. The loop awaits each batch before
//! waiting for the next tick, so batches never overlap; ticks missed while a
//! slow batch was in flight are skipped rather than bunched.
//!
//! TRADE-OFFS
//! ==========
//! Teardown aborts the task, which cancels in-flight requests at their next
//! suspension point. A batch that completes in the gap between `stop` and the
//! abort is still rejected by the store's generation check.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::jolpica::HistoryClient;
use crate::openf1::{LATEST_SESSION, LiveClient};
use crate::store::{HistoryBatch, LiveBatch, ViewStore, VolatileBatch};

/// Both upstream clients.
pub struct DataSources {
    pub live: LiveClient,
    pub history: HistoryClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub schedule_season: i32,
    pub standings_season: i32,
    /// OpenF1 session key; `latest` follows the current session.
    pub session_key: String,
}

impl PollSettings {
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            interval: config.poll_interval,
            schedule_season: config.schedule_season,
            standings_season: config.standings_season,
            session_key: LATEST_SESSION.to_string(),
        }
    }
}

// =============================================================================
// BATCHES
// =============================================================================

pub async fn fetch_live_batch(live: &LiveClient, settings: &PollSettings) -> LiveBatch {
    let session_key = settings.session_key.as_str();
    let (session, positions, weather, race_control, intervals, stints, pit_stops, drivers, laps, meetings) = tokio::join!(
        live.session(session_key),
        live.positions(session_key),
        live.weather(session_key),
        live.race_control(session_key),
        live.intervals(session_key),
        live.stints(session_key),
        live.pit_stops(session_key),
        live.drivers(session_key),
        live.laps(session_key),
        live.meetings(settings.schedule_season),
    );
    LiveBatch { session, positions, weather, race_control, intervals, stints, pit_stops, drivers, laps, meetings }
}

pub async fn fetch_volatile_batch(live: &LiveClient, session_key: &str) -> VolatileBatch {
    let (positions, weather, race_control, intervals) = tokio::join!(
        live.positions(session_key),
        live.weather(session_key),
        live.race_control(session_key),
        live.intervals(session_key),
    );
    VolatileBatch { positions, weather, race_control, intervals }
}

pub async fn fetch_history_batch(history: &HistoryClient, settings: &PollSettings) -> HistoryBatch {
    let (schedule, driver_standings, constructor_standings, last_result) = tokio::join!(
        history.schedule(settings.schedule_season),
        history.driver_standings(settings.standings_season),
        history.constructor_standings(settings.standings_season),
        history.last_result(),
    );
    HistoryBatch { schedule, driver_standings, constructor_standings, last_result }
}

// =============================================================================
// ACTIVATION
// =============================================================================

/// Running dashboard. Dropping the handle aborts polling; [`PollerHandle::stop`]
/// also retires the store generation.
pub struct PollerHandle {
    store: ViewStore,
    generation: u64,
    task: JoinHandle<()>,
}

impl PollerHandle {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(self) {
        let retired = self.store.deactivate(self.generation);
        info!(generation = self.generation, retired, "dashboard deactivated");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Reset the store, then load and keep refreshing it in the background.
pub async fn activate_dashboard(sources: Arc<DataSources>, store: ViewStore, settings: PollSettings) -> PollerHandle {
    let generation = store.activate().await;
    info!(
        generation,
        session_key = %settings.session_key,
        interval_secs = settings.interval.as_secs(),
        "dashboard activated"
    );
    let task = tokio::spawn(run_poller(sources, store.clone(), settings, generation));
    PollerHandle { store, generation, task }
}

async fn run_poller(sources: Arc<DataSources>, store: ViewStore, settings: PollSettings, generation: u64) {
    let mut ticker = tokio::time::interval_at(Instant::now() + settings.interval, settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let (history, live) = tokio::join!(
        fetch_history_batch(&sources.history, &settings),
        fetch_live_batch(&sources.live, &settings),
    );
    store.apply_history(generation, history).await;
    let mut seq = 1;
    store.apply_live(generation, seq, live).await;

    loop {
        ticker.tick().await;
        if !store.is_current(generation) {
            break;
        }
        seq += 1;
        let started = Instant::now();
        let batch = fetch_volatile_batch(&sources.live, &settings.session_key).await;
        let elapsed = started.elapsed();
        if elapsed > settings.interval {
            warn!(
                generation,
                seq,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "live refresh outlasted poll interval; skipping missed ticks"
            );
        }
        store.apply_volatile(generation, seq, batch).await;
    }
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
