use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("activity_roster_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        Path::new("roster.toml"),
        "server_url = \"http://school.example:9000\"\n",
    )
    .expect("parse");

    assert_eq!(settings.server_url, "http://school.example:9000");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let mut settings = Settings::default();
    let err = apply_file(&mut settings, Path::new("roster.toml"), "server_url = [")
        .expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn prefixed_env_wins_over_short_names() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ROSTER_SERVER_URL", "http://short.example"),
        ("APP__SERVER_URL", "http://prefixed.example"),
        ("ROSTER_LOG", "debug"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_url, "http://prefixed.example");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn cli_overrides_take_precedence() {
    let settings = Settings::default().with_overrides(
        Some("http://cli.example/".into()),
        None,
    );
    assert_eq!(settings.server_url, "http://cli.example/");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn validation_normalizes_url_and_blank_filter() {
    let settings = Settings {
        server_url: " http://127.0.0.1:8000/ ".into(),
        log_filter: "  ".into(),
    }
    .validated()
    .expect("valid");
    assert_eq!(settings.server_url, "http://127.0.0.1:8000");
    assert_eq!(settings.log_filter, "info");

    let err = Settings {
        server_url: "localhost".into(),
        log_filter: "info".into(),
    }
    .validated()
    .expect_err("should fail");
    assert!(matches!(err, ConfigError::InvalidServerUrl(_)));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let path = env::temp_dir().join("activity_roster_missing_config.toml");
    let err = load_settings(Some(&path)).expect_err("should fail");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn explicit_file_is_loaded() {
    let path = temp_config("log_filter = \"activity_roster=debug\"\n");
    let settings = load_settings(Some(&path)).expect("settings");
    fs::remove_file(&path).expect("cleanup");

    if env::var("APP__LOG_FILTER").is_err() && env::var("ROSTER_LOG").is_err() {
        assert_eq!(settings.log_filter, "activity_roster=debug");
    }
}
