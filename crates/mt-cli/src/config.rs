//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the medications database.
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("data"));
        Self {
            database_path: data_dir.join("medications.db"),
        }
    }
}

impl Config {
    /// Loads configuration, layering the user config file, `config_path`
    /// and `MEDTRACK_*` variables over the defaults.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MEDTRACK_*)
        figment = figment.merge(Env::prefixed("MEDTRACK_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for medtrack.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("medtrack"))
}

/// Returns the platform-specific data directory for medtrack.
///
/// On Linux: `~/.local/share/medtrack`
fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("medtrack"))
}
