use super::*;
use serde_json::json;
use time::Duration;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2026-06-01 12:00 UTC);

fn at_days(days: i64) -> Option<OffsetDateTime> {
    Some(NOW + Duration::days(days))
}

// =============================================================================
// classify
// =============================================================================

#[test]
fn five_days_out_is_next_forty_is_upcoming() {
    let statuses = classify(&[at_days(5), at_days(40)], NOW, ScheduleWindow::default());
    assert_eq!(statuses, vec![EventStatus::Next, EventStatus::Upcoming]);
}

#[test]
fn only_the_earliest_candidate_is_next() {
    let statuses = classify(&[at_days(10), at_days(3), at_days(-30)], NOW, ScheduleWindow::default());
    assert_eq!(statuses, vec![EventStatus::Upcoming, EventStatus::Next, EventStatus::Past]);
}

#[test]
fn recently_started_event_stays_next_within_grace() {
    let statuses = classify(&[at_days(-1), at_days(6)], NOW, ScheduleWindow::default());
    assert_eq!(statuses, vec![EventStatus::Next, EventStatus::Upcoming]);
}

#[test]
fn grace_boundary_uses_rounded_up_days() {
    // -2.5 days rounds up to -2: still inside the default grace.
    let inside = NOW - Duration::hours(60);
    // -3.5 days rounds up to -3.
    let outside = NOW - Duration::hours(84);
    assert_eq!(classify(&[Some(inside)], NOW, ScheduleWindow::default()), vec![EventStatus::Next]);
    assert_eq!(classify(&[Some(outside)], NOW, ScheduleWindow::default()), vec![EventStatus::Past]);
}

#[test]
fn lead_boundary_is_inclusive() {
    let window = ScheduleWindow::default();
    assert_eq!(classify(&[at_days(14)], NOW, window), vec![EventStatus::Next]);
    assert_eq!(classify(&[at_days(15)], NOW, window), vec![EventStatus::Upcoming]);
}

#[test]
fn nothing_in_window_means_no_next() {
    let statuses = classify(&[at_days(-40), at_days(30)], NOW, ScheduleWindow::default());
    assert_eq!(statuses, vec![EventStatus::Past, EventStatus::Upcoming]);
}

#[test]
fn unplaceable_events_are_upcoming() {
    let statuses = classify(&[None, at_days(2)], NOW, ScheduleWindow::default());
    assert_eq!(statuses, vec![EventStatus::Upcoming, EventStatus::Next]);
}

#[test]
fn classification_is_idempotent() {
    let instants = [at_days(-60), at_days(-1), at_days(4), None, at_days(90)];
    let first = classify(&instants, NOW, ScheduleWindow::default());
    let second = classify(&instants, NOW, ScheduleWindow::default());
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|s| **s == EventStatus::Next).count(), 1);
}

#[test]
fn custom_window() {
    let window = ScheduleWindow { lead_days: 3, grace_days: 0 };
    assert_eq!(classify(&[at_days(5)], NOW, window), vec![EventStatus::Upcoming]);
    assert_eq!(classify(&[at_days(-1)], NOW, window), vec![EventStatus::Past]);
}

// =============================================================================
// event_instant
// =============================================================================

#[test]
fn instant_with_and_without_time() {
    assert_eq!(event_instant(Some("2026-03-08"), Some("04:00:00Z")), Some(datetime!(2026-03-08 04:00 UTC)));
    assert_eq!(event_instant(Some("2026-03-08"), None), Some(datetime!(2026-03-08 00:00 UTC)));
    assert_eq!(event_instant(Some("2026-03-08"), Some("15:30")), Some(datetime!(2026-03-08 15:30 UTC)));
}

#[test]
fn invalid_instants() {
    assert_eq!(event_instant(None, Some("04:00:00Z")), None);
    assert_eq!(event_instant(Some("March 8th"), None), None);
    assert_eq!(event_instant(Some("2026-03-08"), Some("late")), None);
}

// =============================================================================
// schedule
// =============================================================================

#[test]
fn schedule_builds_entries() {
    let races: Vec<Race> = serde_json::from_value(json!([
        {
            "round": "7", "raceName": "Monaco Grand Prix", "date": "2026-05-10", "time": "13:00:00Z",
            "Circuit": { "circuitName": "Circuit de Monaco",
                         "Location": { "locality": "Monte-Carlo", "country": "Monaco" } }
        },
        { "round": "8", "raceName": "Spanish Grand Prix", "date": "2026-06-05", "time": "13:00:00Z" },
        { "round": "9", "raceName": "Canadian Grand Prix", "date": "2026-07-20" }
    ]))
    .unwrap();

    let entries = schedule(&races, NOW, ScheduleWindow::default());
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].round, Some(7));
    assert_eq!(entries[0].circuit, "Circuit de Monaco");
    assert_eq!(entries[0].locality.as_deref(), Some("Monte-Carlo"));
    assert_eq!(entries[0].status, EventStatus::Past);
    assert_eq!(entries[1].status, EventStatus::Next);
    assert_eq!(entries[1].circuit, "—");
    assert_eq!(entries[2].status, EventStatus::Upcoming);

    assert_eq!(next_event(&entries).map(|e| e.race_name.as_str()), Some("Spanish Grand Prix"));
    assert_eq!(last_completed(&entries).map(|e| e.race_name.as_str()), Some("Monaco Grand Prix"));
}

#[test]
fn empty_calendar() {
    let entries = schedule(&[], NOW, ScheduleWindow::default());
    assert!(entries.is_empty());
    assert!(next_event(&entries).is_none());
    assert!(last_completed(&entries).is_none());
}

#[test]
fn weekend_sessions_in_start_order() {
    let race: Race = serde_json::from_value(json!({
        "round": "6", "raceName": "Miami Grand Prix", "date": "2026-05-03", "time": "20:00:00Z",
        "Qualifying": { "date": "2026-05-02", "time": "20:00:00Z" },
        "Sprint": { "date": "2026-05-02", "time": "16:00:00Z" },
        "FirstPractice": { "date": "2026-05-01", "time": "16:30:00Z" }
    }))
    .unwrap();

    let sessions = weekend_sessions(&race);
    let kinds: Vec<_> = sessions.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SessionKind::FirstPractice, SessionKind::Sprint, SessionKind::Qualifying]);
    assert_eq!(sessions[2].starts_at, Some(datetime!(2026-05-02 20:00 UTC)));
    assert_eq!(SessionKind::FirstPractice.label(), "FP1");
}

#[test]
fn undated_sessions_sort_last() {
    let race: Race = serde_json::from_value(json!({
        "raceName": "Test Grand Prix", "date": "2026-05-03",
        "SecondPractice": { "date": "TBC" },
        "ThirdPractice": { "date": "2026-05-02", "time": "10:30:00Z" }
    }))
    .unwrap();

    let sessions = weekend_sessions(&race);
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].kind, SessionKind::ThirdPractice);
    assert_eq!(sessions[1].kind, SessionKind::SecondPractice);
    assert_eq!(sessions[1].starts_at, None);
}

#[test]
fn schedule_entries_carry_sessions() {
    let races: Vec<Race> = serde_json::from_value(json!([
        { "round": "1", "raceName": "Australian Grand Prix", "date": "2026-03-08",
          "Qualifying": { "date": "2026-03-07", "time": "05:00:00Z" } },
        { "round": "2", "raceName": "Chinese Grand Prix", "date": "2026-03-15" }
    ]))
    .unwrap();

    let entries = schedule(&races, NOW, ScheduleWindow::default());
    assert_eq!(entries[0].sessions.len(), 1);
    assert_eq!(entries[0].sessions[0].kind, SessionKind::Qualifying);
    assert!(entries[1].sessions.is_empty());
}
