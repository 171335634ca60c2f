use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_DIR_NAME: &str = "config";
const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "cashflow";

/// Reads and writes the forecast preferences file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Manager for `<base>/config/config.json`, creating the directory when needed.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join(CONFIG_DIR_NAME);
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join(CONFIG_FILE_NAME)))
    }

    /// Manager rooted at the platform configuration directory (`~/.config/cashflow`).
    pub fn default_location() -> Result<Self, ConfigError> {
        let platform_dir = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::with_base_dir(platform_dir.join(APP_DIR_NAME))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Current settings; defaults when nothing has been saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read_to_string(&self.config_path) {
            Ok(data) => {
                serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the settings next to the target first, then renames over it.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let staging = self.config_path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }

    /// Loads the current config, applies one `key = value` change and persists it.
    pub fn update(&self, key: &str, value: &str) -> Result<Config, ConfigError> {
        let mut config = self.load()?;
        config.set_value(key, value)?;
        self.save(&config)?;
        Ok(config)
    }
}
