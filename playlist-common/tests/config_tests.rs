//! Configuration resolution tests
//!
//! Tests that touch PLAYLIST_DATABASE or PLAYLIST_CONFIG are marked
//! #[serial] so they never race on the process environment.

use playlist_common::config::{
    default_database_path, resolve_database_path, TomlConfig, CONFIG_ENV, DATABASE_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_argument_wins() {
    env::set_var(DATABASE_ENV, "/tmp/playlist-env.db");
    let file = TomlConfig {
        database: Some(PathBuf::from("/tmp/playlist-file.db")),
        ..Default::default()
    };

    let path = resolve_database_path(Some(Path::new("/tmp/playlist-cli.db")), &file);
    assert_eq!(path, PathBuf::from("/tmp/playlist-cli.db"));

    env::remove_var(DATABASE_ENV);
}

#[test]
#[serial]
fn test_env_var_beats_config_file() {
    env::set_var(DATABASE_ENV, "/tmp/playlist-env.db");
    let file = TomlConfig {
        database: Some(PathBuf::from("/tmp/playlist-file.db")),
        ..Default::default()
    };

    assert_eq!(
        resolve_database_path(None, &file),
        PathBuf::from("/tmp/playlist-env.db")
    );

    env::remove_var(DATABASE_ENV);
}

#[test]
#[serial]
fn test_config_file_beats_default() {
    env::remove_var(DATABASE_ENV);
    let file = TomlConfig {
        database: Some(PathBuf::from("/tmp/playlist-file.db")),
        ..Default::default()
    };

    assert_eq!(
        resolve_database_path(None, &file),
        PathBuf::from("/tmp/playlist-file.db")
    );
}

#[test]
#[serial]
fn test_falls_back_to_compiled_default() {
    env::remove_var(DATABASE_ENV);
    assert_eq!(
        resolve_database_path(None, &TomlConfig::default()),
        default_database_path()
    );
}

#[test]
fn test_load_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "port = 6001\ndatabase = \"/srv/playlist.db\"\ntick_ms = 250\nlog_level = \"debug\"\n",
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.port, Some(6001));
    assert_eq!(config.database, Some(PathBuf::from("/srv/playlist.db")));
    assert_eq!(config.tick_ms, Some(250));
    assert_eq!(config.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    assert!(matches!(
        TomlConfig::load(&path),
        Err(playlist_common::Error::Config(_))
    ));
}

#[test]
#[serial]
fn test_load_or_default_tolerates_bad_file() {
    env::remove_var(CONFIG_ENV);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not toml [").unwrap();

    assert_eq!(TomlConfig::load_or_default(Some(&path)), TomlConfig::default());
}

#[test]
#[serial]
fn test_config_env_var_selects_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "port = 7007\n").unwrap();
    env::set_var(CONFIG_ENV, &path);

    let config = TomlConfig::load_or_default(None);
    assert_eq!(config.port, Some(7007));

    env::remove_var(CONFIG_ENV);
}
