//! TOML configuration.
//!
//! ```toml
//! [storage]
//! path = "./data/lexigrove.json"
//!
//! [growth]
//! utc_offset_minutes = 540   # calendar days roll over at JST midnight
//!
//! [study]
//! deck_size = 10
//!
//! [import]
//! id_policy = "winner"       # or "local"
//!
//! [logging]
//! filter = "warn"
//! ```
//!
//! Every section except `[storage]` may be omitted.

use anyhow::{Context, Result};
use lexigrove_core::backup::IdPolicy;
use lexigrove_core::growth::CalendarPolicy;
use lexigrove_core::study::DEFAULT_DECK_SIZE;
use lexigrove_core::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted offset from UTC, in minutes (UTC+14:00 exists).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    #[serde(default)]
    pub growth: GrowthConfig,
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the whole learning state.
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GrowthConfig {
    /// Offset from UTC used to decide where one calendar day ends.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StudyConfig {
    #[serde(default = "default_deck_size")]
    pub deck_size: usize,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            deck_size: default_deck_size(),
        }
    }
}

fn default_deck_size() -> usize {
    DEFAULT_DECK_SIZE
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ImportConfig {
    #[serde(default)]
    pub id_policy: IdPolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Config {
    /// Defaults with the state file under the platform data directory
    /// (e.g. `~/.local/share/lexigrove/state.json`).
    pub fn minimal() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            storage: StorageConfig {
                path: base.join("lexigrove").join("state.json"),
            },
            growth: GrowthConfig::default(),
            study: StudyConfig::default(),
            import: ImportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn calendar(&self) -> CalendarPolicy {
        // load_config has already range-checked the offset.
        CalendarPolicy::with_offset_minutes(self.growth.utc_offset_minutes).unwrap_or_default()
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            calendar: self.calendar(),
            id_policy: self.import.id_policy,
        }
    }

    /// Render as TOML, for `grove init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to render config")
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.storage.path.as_os_str().is_empty() {
        anyhow::bail!("storage.path must not be empty");
    }

    if config.study.deck_size == 0 {
        anyhow::bail!("study.deck_size must be >= 1");
    }

    if config.growth.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
        anyhow::bail!(
            "growth.utc_offset_minutes must be within ±{} (got {})",
            MAX_OFFSET_MINUTES,
            config.growth.utc_offset_minutes
        );
    }

    Ok(())
}

/// Load `path` if it exists; otherwise fall back to [`Config::minimal`].
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(Config::minimal())
    }
}
