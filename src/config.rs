use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::sound::DEFAULT_THROTTLE_WINDOW;

/// Read access to the user's sound setting
pub trait SettingsSource {
    fn sound_enabled(&self) -> bool;
}

impl SettingsSource for bool {
    fn sound_enabled(&self) -> bool {
        *self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Play sound effects
    pub sound: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self { sound: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralSettings,

    /// Directory containing the `sounds/` folder (relative to the config directory)
    pub sounds_dir: String,

    /// Volume multiplier for the software backend (0.0-1.0)
    pub volume: f32,

    /// Throttle window in milliseconds for move/capture bursts
    pub throttle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            sounds_dir: "assets".to_string(),
            volume: 1.0,
            throttle_ms: DEFAULT_THROTTLE_WINDOW.as_millis() as u64,
        }
    }
}

impl SettingsSource for Config {
    fn sound_enabled(&self) -> bool {
        self.general.sound
    }
}

impl Config {
    /// Load configuration from the platform-specific config directory.
    /// Creates default config if file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!("Created default config at: {}", path.display());
            return Ok(config);
        }

        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Invalid(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }
        if self.sounds_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("sounds_dir is empty".to_string()));
        }
        Ok(())
    }

    /// Base directory for all app data
    pub fn app_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("SoundCues"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::app_dir()?.join("config.json"))
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Directory the `sounds/<id><ext>` paths are resolved against
    pub fn sounds_root(&self) -> Result<PathBuf, ConfigError> {
        let dir = Path::new(&self.sounds_dir);
        if dir.is_absolute() {
            Ok(dir.to_path_buf())
        } else {
            Ok(Self::app_dir()?.join(dir))
        }
    }
}
