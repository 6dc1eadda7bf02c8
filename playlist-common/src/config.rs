//! Configuration loading and database path resolution
//!
//! Every setting follows the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the database file
pub const DATABASE_ENV: &str = "PLAYLIST_DATABASE";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "PLAYLIST_CONFIG";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 50051;

/// Default tick interval of the time-advance loop
pub const DEFAULT_TICK_MS: u64 = 1000;

/// Optional settings read from `config.toml`
///
/// Missing keys fall through to the compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub tick_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a config file, failing on unreadable or malformed content
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the config file if one can be found
    ///
    /// A missing file is normal and yields the defaults. A malformed file
    /// is logged and also yields the defaults, so a bad edit never keeps the
    /// service from starting.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(find_config_file) {
            Some(path) => path,
            None => {
                debug!("No config file found, using defaults");
                return Self::default();
            }
        };

        match Self::load(&path) {
            Ok(config) => {
                debug!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Locate the platform config file
///
/// Linux also checks `/etc/playlist/config.toml` after the user config dir.
fn find_config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("playlist").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/playlist/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default database path
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("playlist").join("playlist.db"))
        .unwrap_or_else(|| PathBuf::from("./playlist_data/playlist.db"))
}

/// Resolve the database path
pub fn resolve_database_path(cli_arg: Option<&Path>, file: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &file.database {
        return path.clone();
    }

    // Priority 4: compiled default
    default_database_path()
}
