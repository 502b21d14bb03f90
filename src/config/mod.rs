//! Configuration management module.
//!
//! This module handles loading, saving, and managing application
//! configuration: where data is stored, the origin used for share links,
//! autosave timing, reorder behaviour, and log verbosity.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::state::ReorderPolicy;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/form-builder";
const DATA_DIRECTORY_NAME: &str = "form-builder";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub origin: String,
    pub autosave_delay_ms: u64,
    pub reorder_policy: ReorderPolicy,
    pub log_level: String,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
    #[serde(default)]
    pub reorder_policy: ReorderPolicy,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_autosave_delay_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the defaults.
    ///
    pub fn new() -> Config {
        Config {
            data_dir: None,
            origin: default_origin(),
            autosave_delay_ms: default_autosave_delay_ms(),
            reorder_policy: ReorderPolicy::default(),
            log_level: default_log_level(),
            file_path: None,
        }
    }

    /// Load the configuration from the default directory, or the custom one
    /// if provided. A missing file is created holding the defaults.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.data_dir = data.data_dir;
            self.origin = data.origin;
            self.autosave_delay_ms = data.autosave_delay_ms;
            self.reorder_policy = data.reorder_policy;
            self.log_level = data.log_level;
        } else {
            self.save()?;
        }
        self.log_level_filter()?;

        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileSpec {
            data_dir: self.data_dir.clone(),
            origin: self.origin.clone(),
            autosave_delay_ms: self.autosave_delay_ms,
            reorder_policy: self.reorder_policy,
            log_level: self.log_level.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Directory holding persisted forms: the configured one, or the
    /// platform data directory.
    ///
    pub fn data_dir(&self) -> Result<PathBuf, AppError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => match dirs::data_dir() {
                Some(dir) => Ok(dir.join(DATA_DIRECTORY_NAME)),
                None => Err(ConfigError::HomeDirectoryNotFound.into()),
            },
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "log_level".to_string(),
                message: format!("unknown level '{}'", self.log_level),
            })
    }

    /// Returns the path buffer for the default path to the configuration
    /// directory or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
