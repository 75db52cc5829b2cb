//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cradle_core::InsightConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Price of a single diaper, used for the monthly cost estimate.
    pub diaper_cost: f64,

    /// Thresholds for the insight engine.
    pub insights: InsightConfig,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("cradle.db"),
            diaper_cost: 1.5,
            insights: InsightConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Nested keys can be set from the environment with a double underscore,
    /// e.g. `CRADLE_INSIGHTS__AWAKE_CEILING_MINUTES=90`.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CRADLE_*)
        figment = figment.merge(Env::prefixed("CRADLE_").split("__"));

        figment.extract()
    }

    /// Rejects values the insight engine cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.diaper_cost.is_finite() || self.diaper_cost < 0.0 {
            anyhow::bail!("diaper_cost must be a non-negative number, got {}", self.diaper_cost);
        }
        self.insights
            .validate()
            .context("invalid [insights] configuration")
    }
}

/// Returns the platform-specific config directory for cradle.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cradle"))
}

/// Returns the platform-specific data directory for cradle.
///
/// On Linux: `~/.local/share/cradle`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("cradle"))
}
