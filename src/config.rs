//! Configuration Module
//! Dashboard settings read from `config/dashboard.json`.

use crate::data::NullDatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_FILE: &str = "config/dashboard.json";
pub const TEMPLATE_FILE: &str = "config/dashboard.template.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where the data files live, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub external_dir: PathBuf,
    pub processed_file: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
            external_dir: PathBuf::from("data/external"),
            processed_file: "steam_clean.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetInfo {
    pub filename: String,
    pub url: String,
    pub description: String,
}

impl Default for DatasetInfo {
    fn default() -> Self {
        Self {
            filename: "steam_dataset.csv".to_string(),
            url: "https://www.kaggle.com/datasets".to_string(),
            description: "Steam game statistics dataset from Kaggle".to_string(),
        }
    }
}

/// Chart settings shared by the interactive plots and the PNG export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub histogram_bins: usize,
    pub top_genres: usize,
    pub top_developers: usize,
    pub export_width: u32,
    pub export_height: u32,
    pub dark_mode: bool,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            top_genres: crate::data::TOP_GENRES,
            top_developers: crate::data::TOP_DEVELOPERS,
            export_width: 1200,
            export_height: 800,
            dark_mode: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
    pub icon: String,
    pub sidebar_expanded: bool,
    pub preview_rows: usize,
    pub sample_size: usize,
    pub sample_seed: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Steam Stats Dashboard".to_string(),
            icon: "🎮".to_string(),
            sidebar_expanded: true,
            preview_rows: 10,
            sample_size: 1000,
            sample_seed: 42,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub null_release_dates: NullDatePolicy,
}

/// Complete dashboard configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataPaths,
    pub dataset: DatasetInfo,
    pub plot: PlotSettings,
    pub dashboard: DashboardSettings,
    pub filters: FilterSettings,
}

impl DashboardConfig {
    /// Read a config file. A missing file is an error here; see `load_or_default`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a config file, using defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json()?).map_err(io_err)
    }

    /// Cleaned dataset the dashboard reads.
    pub fn processed_path(&self) -> PathBuf {
        self.data.processed_dir.join(&self.data.processed_file)
    }

    /// Raw dataset as downloaded.
    pub fn raw_path(&self) -> PathBuf {
        self.data.raw_dir.join(&self.dataset.filename)
    }

    pub fn window_title(&self) -> String {
        format!("{} {}", self.dashboard.icon, self.dashboard.title)
            .trim()
            .to_string()
    }
}
