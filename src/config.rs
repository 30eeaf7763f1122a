//! User configuration loaded from `config.toml`.
//!
//! ```toml
//! [engine]
//! precision = 28
//! cache_capacity = 1000
//!
//! [history]
//! path = "/home/me/.local/share/deskcalc/calculator_db.db"
//! recent_limit = 10
//! ```
//!
//! Every key is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::calculator::{
    ArithmeticEngine, DEFAULT_CACHE_CAPACITY, MAX_PRECISION, Precision, PrecisionError,
};

const APP_DIR: &str = "deskcalc";
const CONFIG_FILE: &str = "config.toml";
const HISTORY_FILE: &str = "calculator_db.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Precision(#[from] PrecisionError),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub history: HistoryConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Significant digits kept in engine results.
    pub precision: u32,
    /// Memoized results; 0 disables the cache.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: MAX_PRECISION,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Database file. Defaults to the user data directory.
    pub path: Option<PathBuf>,
    /// Records listed by `deskcalc history`.
    pub recent_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            recent_limit: 10,
        }
    }
}

impl Config {
    /// `~/.config/deskcalc/config.toml` or the platform equivalent.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.precision()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn precision(&self) -> Result<Precision, ConfigError> {
        Ok(Precision::new(self.engine.precision)?)
    }

    pub fn build_engine(&self) -> Result<ArithmeticEngine, ConfigError> {
        Ok(ArithmeticEngine::with_cache(
            self.precision()?,
            self.engine.cache_capacity,
        ))
    }

    /// Configured history file, else `<data_dir>/deskcalc/calculator_db.db`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history
            .path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR).join(HISTORY_FILE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.precision, 28);
        assert_eq!(config.engine.cache_capacity, 1000);
        assert_eq!(config.history.recent_limit, 10);
        assert!(config.history.path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[engine]\nprecision = 12\n").unwrap();
        assert_eq!(config.engine.precision, 12);
        assert_eq!(config.engine.cache_capacity, 1000);
        assert_eq!(config.history, HistoryConfig::default());
    }

    #[test]
    fn test_history_path_override() {
        let config: Config = toml::from_str("[history]\npath = \"/tmp/calc.db\"\n").unwrap();
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/calc.db")));
    }

    #[test]
    fn test_invalid_precision_rejected() {
        let config: Config = toml::from_str("[engine]\nprecision = 40\n").unwrap();
        assert!(matches!(
            config.build_engine(),
            Err(ConfigError::Precision(PrecisionError(40)))
        ));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine\nprecision = ").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
