//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the JSON document holding timesheets and entries.
    pub data_path: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_path", &self.data_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_path: data_dir.join("chronos.json"),
        }
    }
}

impl Config {
    /// Environment variable prefix; `CHRONOS_DATA_PATH` sets `data_path`.
    pub const ENV_PREFIX: &'static str = "CHRONOS_";

    /// Layers the configuration sources, later ones winning: defaults,
    /// `<config dir>/chronos/config.toml`, the given file, then
    /// `CHRONOS_*` environment variables.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(Self::ENV_PREFIX))
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(config_path).extract()?;
        if config.data_path.as_os_str().is_empty() {
            return Err(figment::Error::from("data_path cannot be empty".to_string()));
        }
        Ok(config)
    }
}

/// Returns the platform-specific config directory for chronos.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chronos"))
}

/// Returns the platform-specific data directory for chronos.
///
/// On Linux: `~/.local/share/chronos`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("chronos"))
}
