use thiserror::Error;

use crate::sound::{Platform, SoundCue};

/// Sound errors using thiserror for structured error handling.
///
/// Only initialization surfaces these to callers. Playback failures are
/// logged and dropped by the dispatcher.

#[derive(Error, Debug)]
pub enum SoundError {
    #[error("Failed to load sound '{id}' from {path}")]
    LoadFailed {
        id: String,
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No sound loaded for '{0}'")]
    NotLoaded(String),

    #[error("Sound playback failed for '{id}'")]
    PlaybackFailed {
        id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Audio output is not available")]
    OutputUnavailable,

    #[error("Failed to start audio output thread")]
    ThreadSpawnFailed(#[source] std::io::Error),

    #[error("Platform {0} needs a native sound plugin bridge")]
    BridgeMissing(Platform),

    #[error("Unknown sound cue: {0}")]
    UnknownCue(String),

    #[error("Sound cue '{0}' has no throttled playback")]
    NotThrottled(SoundCue),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = SoundError::NotLoaded("move".to_string());
        assert_eq!(err.to_string(), "No sound loaded for 'move'");

        let err = SoundError::BridgeMissing(Platform::Ios);
        assert_eq!(err.to_string(), "Platform ios needs a native sound plugin bridge");

        let err = SoundError::NotThrottled(SoundCue::Explosion);
        assert_eq!(err.to_string(), "Sound cue 'explosion' has no throttled playback");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = SoundError::LoadFailed {
            id: "dong".to_string(),
            path: "sounds/dong.mp3".to_string(),
            source: Box::new(io_err),
        };

        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Failed to load sound 'dong' from sounds/dong.mp3"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid("volume out of range".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: volume out of range");
    }
}
