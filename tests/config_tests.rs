use std::fs;
use std::path::PathBuf;

use hockey_schedule_ics::config::Config;

fn write_config(body: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, body).expect("write config");
    (dir, path)
}

#[test]
fn loads_a_full_config() {
    let (_dir, path) = write_config(
        r#"{
            "team_name": "Beavers",
            "team_page_url": "https://truenorthhockey.com/team/beavers",
            "game_duration_hours": 1.5,
            "output_file": "docs/beavers.ics"
        }"#,
    );
    let config = Config::load(&path).expect("config should load");

    assert_eq!(config.team_name, "Beavers");
    assert_eq!(config.team_page_url, "https://truenorthhockey.com/team/beavers");
    assert_eq!(config.game_duration_hours, 1.5);
    assert_eq!(config.output_file, PathBuf::from("docs/beavers.ics"));
}

#[test]
fn optional_keys_take_defaults() {
    let (_dir, path) =
        write_config(r#"{"team_page_url": "https://truenorthhockey.com/team/beavers"}"#);
    let config = Config::load(&path).expect("config should load");

    assert_eq!(config.game_duration_hours, 1.0);
    assert_eq!(config.output_file, PathBuf::from("docs/hockey_schedule.ics"));
}

#[test]
fn missing_team_page_url_is_fatal() {
    let (_dir, path) = write_config(r#"{"team_name": "Beavers"}"#);
    let err = Config::load(&path).unwrap_err();
    assert!(err.contains("team_page_url"), "error was: {}", err);
}

#[test]
fn blank_team_page_url_is_fatal() {
    let (_dir, path) = write_config(r#"{"team_page_url": "   "}"#);
    assert!(Config::load(&path).is_err());
}

#[test]
fn non_positive_duration_is_fatal() {
    let (_dir, path) = write_config(
        r#"{"team_page_url": "https://truenorthhockey.com/team/beavers", "game_duration_hours": 0}"#,
    );
    let err = Config::load(&path).unwrap_err();
    assert!(err.contains("game_duration_hours"), "error was: {}", err);
}

#[test]
fn unrecognized_keys_are_ignored() {
    let (_dir, path) = write_config(
        r#"{"team_page_url": "https://truenorthhockey.com/team/beavers", "league": "TNH"}"#,
    );
    assert!(Config::load(&path).is_ok());
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(Config::load(&dir.path().join("nope.json")).is_err());
}
