//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::catalog::CustomExercise;
use crate::units::WeightUnit;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    /// Extra exercises merged into the built-in catalog
    #[serde(default)]
    pub exercises: Vec<CustomExercise>,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Progression engine parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionConfig {
    /// Heaviest load per hand for dumbbell-class exercises
    #[serde(default = "default_per_limb_cap")]
    pub per_limb_cap: f64,

    /// Highest rep count reps are raised to before a set is added instead
    #[serde(default = "default_substitution_rep_ceiling")]
    pub substitution_rep_ceiling: u32,

    /// Sessions scanned for the best AMRAP set
    #[serde(default = "default_amrap_lookback")]
    pub amrap_lookback: usize,

    /// Most recent sessions handed to the engine per exercise
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            per_limb_cap: default_per_limb_cap(),
            substitution_rep_ceiling: default_substitution_rep_ceiling(),
            amrap_lookback: default_amrap_lookback(),
            history_window: default_history_window(),
        }
    }
}

impl ProgressionConfig {
    /// Check values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.per_limb_cap.is_finite() || self.per_limb_cap <= 0.0 {
            return Err(Error::Config(format!(
                "per_limb_cap must be a positive number, got {}",
                self.per_limb_cap
            )));
        }
        if self.substitution_rep_ceiling == 0 {
            return Err(Error::Config(
                "substitution_rep_ceiling must be at least 1".into(),
            ));
        }
        if self.history_window == 0 {
            return Err(Error::Config("history_window must be at least 1".into()));
        }
        Ok(())
    }
}

/// Output formatting configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub unit: WeightUnit,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("lift")
}

fn default_per_limb_cap() -> f64 {
    90.0
}

fn default_substitution_rep_ceiling() -> u32 {
    12
}

fn default_amrap_lookback() -> usize {
    10
}

fn default_history_window() -> usize {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.progression.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
