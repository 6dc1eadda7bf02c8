//! playlist-server specific configuration
//!
//! Command-line flags (with environment fallbacks via clap) are layered over
//! the optional TOML config file and the compiled defaults.

use crate::{Error, Result};
use clap::Parser;
use playlist_common::config::{resolve_database_path, TomlConfig, DEFAULT_PORT, DEFAULT_TICK_MS};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments for playlist-server
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "playlist-server")]
#[command(about = "Playlist playback service")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PLAYLIST_PORT")]
    pub port: Option<u16>,

    /// Path to the SQLite database file
    #[arg(short, long, env = "PLAYLIST_DATABASE")]
    pub database: Option<PathBuf>,

    /// Milliseconds per playback tick (one tick advances one second of track time)
    #[arg(long, env = "PLAYLIST_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Explicit config file
    #[arg(short, long, env = "PLAYLIST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub tick: Duration,
    pub log_level: Option<String>,
}

impl Config {
    /// Load the config file named by `args` (or found on disk) and resolve
    pub fn load(args: &Args) -> Result<Self> {
        let file = TomlConfig::load_or_default(args.config.as_deref());
        Self::resolve(args, &file)
    }

    /// Combine arguments with file settings; arguments win
    pub fn resolve(args: &Args, file: &TomlConfig) -> Result<Self> {
        let port = args.port.or(file.port).unwrap_or(DEFAULT_PORT);

        let tick_ms = args.tick_ms.or(file.tick_ms).unwrap_or(DEFAULT_TICK_MS);
        if tick_ms == 0 {
            return Err(Error::Config("tick_ms must be greater than zero".to_string()));
        }

        Ok(Self {
            port,
            db_path: resolve_database_path(args.database.as_deref(), file),
            tick: Duration::from_millis(tick_ms),
            log_level: file.log_level.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_args_or_file() {
        let config = Config::resolve(&Args::default(), &TomlConfig::default()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.tick, Duration::from_secs(1));
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_args_override_file() {
        let args = Args::try_parse_from([
            "playlist-server",
            "--port",
            "6001",
            "--database",
            "/tmp/cli.db",
            "--tick-ms",
            "10",
        ])
        .unwrap();
        let file = TomlConfig {
            port: Some(7000),
            database: Some(PathBuf::from("/tmp/file.db")),
            tick_ms: Some(500),
            log_level: Some("info".to_string()),
        };

        let config = Config::resolve(&args, &file).unwrap();
        assert_eq!(config.port, 6001);
        assert_eq!(config.db_path, PathBuf::from("/tmp/cli.db"));
        assert_eq!(config.tick, Duration::from_millis(10));
        assert_eq!(config.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn test_file_fills_missing_args() {
        let file = TomlConfig {
            port: Some(7000),
            tick_ms: Some(250),
            ..TomlConfig::default()
        };

        let config = Config::resolve(&Args::default(), &file).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.tick, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_tick_is_rejected() {
        let args = Args {
            tick_ms: Some(0),
            ..Args::default()
        };
        assert!(matches!(
            Config::resolve(&args, &TomlConfig::default()),
            Err(Error::Config(_))
        ));
    }
}
