use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use time::macros::datetime;

use crate::gateway::test_helpers::MockSource;
use crate::gateway::{FetchError, Gateway, JsonSource};
use crate::views::schedule::ScheduleWindow;

const INTERVAL: Duration = Duration::from_secs(30);

fn settings() -> PollSettings {
    PollSettings {
        interval: INTERVAL,
        schedule_season: 2026,
        standings_season: 2025,
        session_key: LATEST_SESSION.to_string(),
    }
}

fn sources(source: Arc<dyn JsonSource>) -> (Arc<DataSources>, Arc<Gateway>) {
    let gateway = Arc::new(Gateway::new(source, None));
    let sources = DataSources {
        live: LiveClient::new(gateway.clone(), "https://openf1.test/v1"),
        history: HistoryClient::new(gateway.clone(), "https://jolpica.test/ergast/f1"),
    };
    (Arc::new(sources), gateway)
}

fn store() -> ViewStore {
    ViewStore::new(30, ScheduleWindow::default())
}

fn seeded_source() -> Arc<MockSource> {
    let source = Arc::new(MockSource::new());
    source.route(
        "/sessions?",
        json!([{ "session_key": 9158, "session_name": "Race", "location": "Monza" }]),
    );
    source.route(
        "/position?",
        json!([
            { "driver_number": 16, "position": 1, "date": "2024-09-01T13:00:00+00:00" },
            { "driver_number": 81, "position": 2, "date": "2024-09-01T13:00:00+00:00" }
        ]),
    );
    source.route(
        "/drivers?",
        json!([{ "driver_number": 16, "name_acronym": "LEC", "full_name": "Charles LECLERC", "team_name": "Ferrari" }]),
    );
    source.route("/weather?", json!([{ "air_temperature": 24.1, "rainfall": 0, "date": "2024-09-01T13:00:00+00:00" }]));
    source.route("/race_control?", json!([]));
    source.route("/intervals?", json!([]));
    source.route("/stints?", json!([]));
    source.route("/pit?", json!([]));
    source.route("/laps?", json!([]));
    source.route(
        "/meetings?",
        json!([{ "meeting_key": 1279, "meeting_name": "Australian Grand Prix", "date_start": "2026-03-06T01:30:00+00:00" }]),
    );
    source.route(
        "/2026.json",
        json!({ "MRData": { "RaceTable": { "Races": [{ "round": "1", "raceName": "Australian Grand Prix", "date": "2026-03-08" }] } } }),
    );
    source.route(
        "/driverStandings.json",
        json!({ "MRData": { "StandingsTable": { "StandingsLists": [{ "DriverStandings": [
            { "points": "437", "wins": "9", "Driver": { "code": "VER" }, "Constructors": [{ "constructorId": "red_bull" }] }
        ] }] } } }),
    );
    source.route("/constructorStandings.json", json!({ "MRData": { "StandingsTable": { "StandingsLists": [] } } }));
    source.route("/current/last/results.json", json!({ "MRData": { "RaceTable": { "Races": [] } } }));
    source
}

/// Delegates to a mock after a fixed delay and records peak concurrency of
/// position requests.
struct SlowSource {
    inner: Arc<MockSource>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait::async_trait]
impl JsonSource for SlowSource {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let tracked = url.contains("/position?");
        if tracked {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }
        tokio::time::sleep(self.delay).await;
        if tracked {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        self.inner.get_json(url).await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn activation_loads_everything_once() {
    let source = seeded_source();
    let (sources, _) = sources(source.clone());
    let store = store();

    let handle = activate_dashboard(sources, store.clone(), settings()).await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    let view = store.view(datetime!(2026-03-01 00:00 UTC)).await;
    assert_eq!(view.session_label.as_deref(), Some("Race — Monza"));
    assert_eq!(view.session_key, Some(9158));
    assert_eq!(view.timing.len(), 2);
    assert_eq!(view.timing[0].code, "LEC");
    assert_eq!(view.weather.map(|w| w.air_temperature), Some(Some(24.1)));
    assert_eq!(view.schedule.len(), 1);
    assert_eq!(view.driver_standings[0].code.as_deref(), Some("VER"));
    assert_eq!(view.meetings.len(), 1);
    assert_eq!(source.calls().iter().filter(|url| url.ends_with("/meetings?year=2026")).count(), 1);

    for endpoint in ["/sessions?", "/position?", "/drivers?", "/laps?", "/2026.json", "/2025/driverStandings.json"] {
        assert_eq!(source.count(endpoint), 1, "{endpoint}");
    }
    assert_eq!(store.last_seq().await, 1);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn ticks_refresh_only_volatile_endpoints() {
    let source = seeded_source();
    let (sources, _) = sources(source.clone());
    let store = store();

    let handle = activate_dashboard(sources, store.clone(), settings()).await;
    tokio::time::sleep(INTERVAL * 2 + Duration::from_millis(1)).await;

    for endpoint in ["/position?", "/weather?", "/race_control?", "/intervals?"] {
        assert_eq!(source.count(endpoint), 3, "{endpoint}");
    }
    for endpoint in ["/sessions?", "/stints?", "/pit?", "/drivers?", "/laps?", "/meetings?", "/2026.json"] {
        assert_eq!(source.count(endpoint), 1, "{endpoint}");
    }
    assert_eq!(store.last_seq().await, 3);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_halts_polling() {
    let source = seeded_source();
    let (sources, _) = sources(source.clone());
    let store = store();

    let handle = activate_dashboard(sources, store.clone(), settings()).await;
    let generation = handle.generation();
    tokio::time::sleep(Duration::from_millis(1)).await;
    handle.stop();

    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(source.count("/position?"), 1);
    assert!(!store.is_current(generation));
    // Data loaded before teardown stays readable.
    assert_eq!(store.view(datetime!(2026-03-01 00:00 UTC)).await.timing.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_keeps_previous_rows() {
    let source = seeded_source();
    let (sources, gateway) = sources(source.clone());
    let store = store();

    let handle = activate_dashboard(sources, store.clone(), settings()).await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    source.reroute("/position?", json!({ "detail": "No results found." }));

    tokio::time::sleep(INTERVAL).await;
    assert_eq!(source.count("/position?"), 2);
    assert!(gateway.failure_count() >= 1);
    assert_eq!(store.view(datetime!(2026-03-01 00:00 UTC)).await.timing.len(), 2);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn slow_batches_never_overlap() {
    let slow = Arc::new(SlowSource {
        inner: seeded_source(),
        delay: Duration::from_secs(45),
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let (sources, _) = sources(slow.clone());
    let store = store();

    let handle = activate_dashboard(sources, store.clone(), settings()).await;
    tokio::time::sleep(Duration::from_secs(300)).await;

    assert_eq!(slow.peak.load(Ordering::SeqCst), 1);
    let polls = slow.inner.count("/position?");
    // One-shot plus back-to-back refreshes of 45 s each.
    assert!((4..=7).contains(&polls), "{polls}");
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn reactivation_supersedes_previous_poller() {
    let source = seeded_source();
    let (sources, _) = sources(source.clone());
    let store = store();

    let first = activate_dashboard(sources.clone(), store.clone(), settings()).await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    let second = activate_dashboard(sources, store.clone(), settings()).await;
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(store.is_current(second.generation()));
    // Stopping the superseded handle leaves the live one alone.
    first.stop();
    assert!(store.is_current(second.generation()));

    tokio::time::sleep(INTERVAL).await;
    assert!(!second.is_finished());
    second.stop();
}

#[test]
fn settings_follow_config() {
    let config = DashboardConfig::from_lookup(|_| None, 2026).unwrap();
    let settings = PollSettings::from_config(&config);
    assert_eq!(settings.interval, Duration::from_secs(30));
    assert_eq!(settings.schedule_season, 2026);
    assert_eq!(settings.standings_season, 2025);
    assert_eq!(settings.session_key, "latest");
}
