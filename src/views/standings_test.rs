use super::*;
use serde_json::json;

fn driver_entries(value: serde_json::Value) -> Vec<DriverStanding> {
    serde_json::from_value(value).unwrap()
}

fn constructor_entries(value: serde_json::Value) -> Vec<ConstructorStanding> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn driver_rows_rank_by_provider_order() {
    let entries = driver_entries(json!([
        {
            "position": "1", "points": "437", "wins": "9",
            "Driver": { "driverId": "max_verstappen", "code": "VER", "givenName": "Max",
                        "familyName": "Verstappen", "nationality": "Dutch" },
            "Constructors": [{ "constructorId": "red_bull", "name": "Red Bull" }]
        },
        {
            "position": "2", "points": 374, "wins": "4",
            "Driver": { "driverId": "norris", "code": "NOR", "givenName": "Lando", "familyName": "Norris" },
            "Constructors": [{ "constructorId": "mclaren", "name": "McLaren" }]
        }
    ]));

    let rows = driver_standings(&entries);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[0].name, "Max Verstappen");
    assert_eq!(rows[0].code.as_deref(), Some("VER"));
    assert_eq!(rows[0].nationality.as_deref(), Some("Dutch"));
    assert_eq!(rows[0].team, TeamKey::RedBull);
    assert!((rows[0].points - 437.0).abs() < f64::EPSILON);
    assert_eq!(rows[0].wins, 9);

    assert_eq!(rows[1].rank, 2);
    assert_eq!(rows[1].team, TeamKey::McLaren);
    assert!((rows[1].points - 374.0).abs() < f64::EPSILON);
    assert_eq!(rows[1].nationality, None);
}

#[test]
fn mid_season_transfer_uses_latest_constructor() {
    let entries = driver_entries(json!([{
        "points": "30", "wins": "0",
        "Driver": { "code": "LAW", "givenName": "Liam", "familyName": "Lawson" },
        "Constructors": [
            { "constructorId": "red_bull", "name": "Red Bull" },
            { "constructorId": "rb", "name": "RB F1 Team" }
        ]
    }]));
    let rows = driver_standings(&entries);
    assert_eq!(rows[0].team, TeamKey::RacingBulls);
    assert_eq!(rows[0].team_name, "RB F1 Team");
}

#[test]
fn unparseable_numbers_become_zero() {
    let entries = driver_entries(json!([{ "points": "n/a", "Driver": { "driverId": "mystery" } }]));
    let rows = driver_standings(&entries);
    assert!(rows[0].points.abs() < f64::EPSILON);
    assert_eq!(rows[0].wins, 0);
    assert_eq!(rows[0].name, "mystery");
    assert_eq!(rows[0].team, TeamKey::Neutral);
    assert_eq!(rows[0].team_name, "Unknown");
}

#[test]
fn constructor_rows_resolve_theme_from_id() {
    let entries = constructor_entries(json!([
        { "position": "1", "points": "666", "wins": "6",
          "Constructor": { "constructorId": "mclaren", "name": "McLaren", "nationality": "British" } },
        { "position": "2", "points": "652", "wins": "5",
          "Constructor": { "constructorId": "ferrari", "name": "Ferrari" } },
        { "position": "3", "points": "0", "wins": "0",
          "Constructor": { "constructorId": "acme", "name": "Acme Racing Experimental" } }
    ]));
    let rows = constructor_standings(&entries);
    assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(rows[0].team, TeamKey::McLaren);
    assert_eq!(rows[0].name, "McLaren");
    assert_eq!(rows[0].code, None);
    assert_eq!(rows[1].team, TeamKey::Ferrari);
    assert_eq!(rows[2].team, TeamKey::Neutral);
}

#[test]
fn constructor_name_backs_up_unknown_id() {
    let entries = constructor_entries(json!([
        { "Constructor": { "constructorId": "team_x", "name": "Aston Martin Aramco" } }
    ]));
    assert_eq!(constructor_standings(&entries)[0].team, TeamKey::AstonMartin);
}

#[test]
fn empty_tables_are_empty() {
    assert!(driver_standings(&[]).is_empty());
    assert!(constructor_standings(&[]).is_empty());
}

#[test]
fn race_result_rows() {
    let race: Race = serde_json::from_value(json!({
        "season": "2025", "round": "24", "raceName": "Abu Dhabi Grand Prix", "date": "2025-12-07",
        "Results": [
            { "position": "1", "points": "25", "status": "Finished",
              "Driver": { "code": "VER", "givenName": "Max", "familyName": "Verstappen" },
              "Constructor": { "constructorId": "red_bull", "name": "Red Bull" } },
            { "position": "20", "points": "0", "status": "Retired",
              "Driver": { "givenName": "Nico", "familyName": "Hulkenberg" },
              "Constructor": { "constructorId": "sauber", "name": "Sauber" } }
        ]
    }))
    .unwrap();

    let rows = race_result(&race);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].position, Some(1));
    assert_eq!(rows[0].code, "VER");
    assert_eq!(rows[0].team, TeamKey::RedBull);
    assert!((rows[0].points - 25.0).abs() < f64::EPSILON);
    assert_eq!(rows[1].code, "—");
    assert_eq!(rows[1].driver_name, "Nico Hulkenberg");
    assert_eq!(rows[1].team, TeamKey::Audi);
    assert_eq!(rows[1].status, "Retired");
}
