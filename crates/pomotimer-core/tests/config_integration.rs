//! Integration tests for loading configuration files from disk.

use std::fs;

use pomotimer_core::{Config, ConfigError, TimerEngine, TimerMode};
use tempfile::TempDir;

#[test]
fn missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg, Config::default());
    assert!(!dir.path().join("absent.toml").exists());
}

#[test]
fn file_values_seed_the_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[timer]
pomodoro_time = 50
short_break_time = 10
long_break_time = 30
pomodoros_before_long_break = 2
auto_start_breaks = false

[log]
level = "debug"
"#,
    )
    .unwrap();

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.log.level, "debug");
    assert!(!cfg.timer.auto_start_breaks);

    let mut engine = TimerEngine::new(cfg.timer);
    assert_eq!(engine.time_left_secs(), 50 * 60);
    engine.skip();
    engine.skip();
    engine.skip();
    assert_eq!(engine.mode(), TimerMode::LongBreak);
    assert_eq!(engine.time_left_secs(), 30 * 60);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[timer]\npomodoro_time = \"long\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed(_)));
}

#[test]
fn directory_instead_of_file_is_load_failure() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::LoadFailed { .. }));
}
