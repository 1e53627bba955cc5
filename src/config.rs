//! Settings and data directory resolution
//!
//! ## Path Resolution Order
//!
//! 1. Explicit directory (the `--data-dir` flag)
//! 2. `IMS_DATA_DIR` environment variable
//! 3. `$XDG_CONFIG_HOME/imscore` or `~/.config/imscore`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DATABASE_FILENAME;
use crate::error::{InventoryError, Result};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "IMS_DATA_DIR";

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "IMS_LOG";

const APP_DIR_NAME: &str = "imscore";
const SETTINGS_FILENAME: &str = "config.json";

/// Locations of everything the tool keeps on disk
#[derive(Debug, Clone)]
pub struct DataPaths {
    base_dir: PathBuf,
}

impl DataPaths {
    /// Resolve the data directory, preferring `explicit` when given
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let base_dir = match explicit {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var(DATA_DIR_ENV) {
                Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
                _ => default_base_dir()?,
            },
        };

        debug!(dir = %base_dir.display(), "Resolved data directory");
        Ok(Self { base_dir })
    }

    /// Use a fixed directory (tests)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILENAME)
    }

    /// Database file named by the settings
    pub fn database_file(&self, settings: &Settings) -> PathBuf {
        self.base_dir.join(&settings.database_filename)
    }

    /// Create the base directory if needed
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }
}

fn default_base_dir() -> Result<PathBuf> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.trim().is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                InventoryError::ConfigError("HOME environment variable not set".to_string())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR_NAME))
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Database file name inside the data directory
    #[serde(default = "default_database_filename")]
    pub database_filename: String,

    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Minimum quantity offered when adding an item
    #[serde(default = "default_min_quantity")]
    pub default_min_quantity: u32,
}

fn default_database_filename() -> String {
    DATABASE_FILENAME.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_min_quantity() -> u32 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_filename: default_database_filename(),
            log_level: default_log_level(),
            default_min_quantity: default_min_quantity(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults when the file does not exist
    pub fn load_or_default(paths: &DataPaths) -> Result<Self> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)?;
        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            let path = settings_path.display();
            InventoryError::ConfigError(format!("Failed to parse {}: {}", path, e))
        })?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DataPaths) -> Result<()> {
        paths.ensure_directories()?;
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.settings_file(), contents)?;
        Ok(())
    }
}
