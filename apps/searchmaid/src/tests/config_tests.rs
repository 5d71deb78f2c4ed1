use super::{apply_env_overrides, apply_file_settings, load_settings, Settings};

use std::{collections::HashMap, fs};

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file_settings(
        &mut settings,
        r#"
listing_url = "https://maids.example.com/maid/api/maids/"
viewport_width = 1920.0
request_timeout_secs = 15
"#,
    )
    .expect("parse config");

    assert_eq!(settings.listing_url, "https://maids.example.com/maid/api/maids/");
    assert_eq!(settings.viewport_width, 1920.0);
    assert_eq!(settings.request_timeout_secs, Some(15));
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn malformed_file_is_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file_settings(&mut settings, "viewport_width = \"wide\"").is_err());
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SEARCHMAID_LISTING_URL", "http://plain.example/api/"),
        ("APP__LISTING_URL", "http://app.example/api/"),
        ("APP__VIEWPORT_WIDTH", "800"),
        ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ("RUST_LOG", "client_core=debug"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

    assert_eq!(settings.listing_url, "http://app.example/api/");
    assert_eq!(settings.viewport_width, 800.0);
    assert_eq!(settings.request_timeout_secs, None, "unparsable values are ignored");
    assert_eq!(settings.log_filter, "client_core=debug");
}

#[test]
fn reads_config_file_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("searchmaid.toml");
    fs::write(&path, "viewport_width = 1024.0\nlog_filter = \"warn\"\n").expect("write config");

    let settings = load_settings(&path).expect("load settings");
    assert_eq!(settings.viewport_width, 1024.0);
    if std::env::var("RUST_LOG").is_err() {
        assert_eq!(settings.log_filter, "warn");
    }
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings(&dir.path().join("absent.toml")).expect("load settings");
    if std::env::var("APP__VIEWPORT_WIDTH").is_err() {
        assert_eq!(settings.viewport_width, Settings::default().viewport_width);
    }
}

#[test]
fn searchmaid_env_covers_every_setting() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SEARCHMAID_LISTING_URL", "http://plain.example/api/"),
        ("SEARCHMAID_VIEWPORT_WIDTH", "1600"),
        ("SEARCHMAID_REQUEST_TIMEOUT_SECS", "20"),
        ("SEARCHMAID_LOG_FILTER", "client_core=trace"),
        ("APP__REQUEST_TIMEOUT_SECS", "5"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

    assert_eq!(settings.listing_url, "http://plain.example/api/");
    assert_eq!(settings.viewport_width, 1600.0);
    assert_eq!(settings.request_timeout_secs, Some(5), "APP__ is applied last");
    assert_eq!(settings.log_filter, "client_core=trace");
}
