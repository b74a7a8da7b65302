//! Platform variant detection
//!
//! Decides which sound container the client ships and which backend plays it.
use std::fmt;
use std::str::FromStr;

use crate::error::SoundError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Android,
    Web,
    Desktop,
}

impl Platform {
    /// Detect the platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Desktop
        }
    }

    /// File extension of the bundled sound files
    pub fn sound_extension(&self) -> &'static str {
        match self {
            Platform::Ios => ".aifc",
            _ => ".mp3",
        }
    }

    /// Whether sounds are played by the host's native sound-effect plugin
    pub fn uses_native_plugin(&self) -> bool {
        matches!(self, Platform::Ios | Platform::Android)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
            Platform::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "web" => Ok(Platform::Web),
            "desktop" => Ok(Platform::Desktop),
            other => Err(SoundError::UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_extension() {
        assert_eq!(Platform::Ios.sound_extension(), ".aifc");
        assert_eq!(Platform::Android.sound_extension(), ".mp3");
        assert_eq!(Platform::Web.sound_extension(), ".mp3");
        assert_eq!(Platform::Desktop.sound_extension(), ".mp3");
    }

    #[test]
    fn test_native_plugin_platforms() {
        assert!(Platform::Ios.uses_native_plugin());
        assert!(Platform::Android.uses_native_plugin());
        assert!(!Platform::Web.uses_native_plugin());
        assert!(!Platform::Desktop.uses_native_plugin());
    }

    #[test]
    fn test_platform_parse_roundtrip() {
        for platform in [Platform::Ios, Platform::Android, Platform::Web, Platform::Desktop] {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
        assert_eq!("IOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert!("symbian".parse::<Platform>().is_err());
    }

    #[test]
    fn test_current_platform_on_host() {
        #[cfg(not(any(target_os = "ios", target_os = "android")))]
        assert_eq!(Platform::current(), Platform::Desktop);
    }
}
