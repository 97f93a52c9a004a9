use crate::shared::fs_atomic::atomic_write_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATE_ROOT_ENV: &str = "RAGFORGE_STATE_ROOT";
pub const GLOBAL_STATE_DIR: &str = ".ragforge";
pub const SETTINGS_FILE_NAME: &str = "config.yaml";
pub const DATABASE_FILE_NAME: &str = "configurations.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode yaml for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("settings validation failed: {0}")]
    Settings(String),
    #[error("failed to resolve home directory for state root")]
    HomeDirectoryUnavailable,
}

/// Filesystem layout under the state root: settings, database, logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    /// `RAGFORGE_STATE_ROOT` wins; otherwise `~/.ragforge`. The root is
    /// created eagerly so later opens fail loudly here, not mid-wizard.
    pub fn resolve() -> Result<Self, ConfigError> {
        let root = match std::env::var_os(STATE_ROOT_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => {
                let home =
                    std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
                PathBuf::from(home).join(GLOBAL_STATE_DIR)
            }
        };
        fs::create_dir_all(&root).map_err(|source| ConfigError::CreateDir {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE_NAME)
    }

    pub fn database_path(&self, settings: &Settings) -> PathBuf {
        self.root.join(&settings.database_file)
    }
}

fn default_database_file() -> String {
    DATABASE_FILE_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_database_file")]
    pub database_file: String,
    /// When set, the wizard talks to a remote persistence service at this
    /// base URL instead of the local database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            remote_url: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_file.trim().is_empty() {
            return Err(ConfigError::Settings(
                "database_file must be non-empty".to_string(),
            ));
        }
        if let Some(url) = &self.remote_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Settings(format!(
                    "remote_url must start with http:// or https://, got `{url}`"
                )));
            }
        }
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Missing settings file means defaults; a present but invalid one is an
/// error the user has to fix.
pub fn load_settings(paths: &StatePaths) -> Result<Settings, ConfigError> {
    let path = paths.settings_path();
    if !path.exists() {
        return Ok(Settings::default());
    }
    let settings = Settings::from_path(&path)?;
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(paths: &StatePaths, settings: &Settings) -> Result<PathBuf, ConfigError> {
    settings.validate()?;
    let path = paths.settings_path();
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(&path, body.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}
