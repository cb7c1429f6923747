// Config service
// Optional config.toml in the platform config directory

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::display::{BackgroundStyle, GridShape};
use crate::models::settings::GlobalSettings;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_FILE_NAME: &str = "timelapse.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub appearance: AppearanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the database location; defaults to the data directory.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub background_style: BackgroundStyle,
    pub grid_shape: GridShape,
    pub follow_system_appearance: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            background_style: BackgroundStyle::default(),
            grid_shape: GridShape::default(),
            follow_system_appearance: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Timelapse", "Timelapse")
}

/// Default location of `config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl AppConfig {
    /// Parses a config file. A missing file is not an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads `path`, falling back to defaults when it is unreadable or
    /// invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e:#}, using default configuration");
                Self::default()
            }
        }
    }

    /// Loads the config file from the platform config directory.
    pub fn load() -> Self {
        match default_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => {
                log::warn!("No config directory available, using default configuration");
                Self::default()
            }
        }
    }

    /// Database location: the configured path, else `timelapse.db` in the
    /// platform data directory, else the working directory.
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.database_path {
            return path.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }

    /// Creates the parent directory of [`AppConfig::database_path`].
    pub fn ensure_database_dir(&self) -> Result<PathBuf> {
        let path = self.database_path();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory {}", parent.display())
            })?;
        }
        Ok(path)
    }

    /// Initial global settings. `system_is_dark` is only consulted when
    /// following the system appearance.
    pub fn global_settings(&self, system_is_dark: Option<bool>) -> GlobalSettings {
        let mut settings =
            GlobalSettings::new(self.appearance.background_style, self.appearance.grid_shape);
        if self.appearance.follow_system_appearance {
            if let Some(is_dark) = system_is_dark {
                settings.update_system_appearance(is_dark);
            }
        }
        settings
    }
}
