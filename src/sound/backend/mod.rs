//! Sound backends
//!
//! A backend loads a named sound from a relative path and plays it by name.
//! Two implementations exist:
//! - [`SoftwareBackend`] decodes and mixes in-process with rodio
//! - [`NativeBackend`] forwards calls to the host's native sound-effect plugin
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::SoundError;
use crate::sound::platform::Platform;

pub mod native;
pub mod software;

pub use native::{NativeBackend, PluginBridge};
pub use software::SoftwareBackend;

/// Capability set the dispatcher needs from the platform layer
pub trait SoundBackend: Send + Sync {
    /// Load the sound at `path` and register it under `id`
    fn load_sound(&self, id: &str, path: &str) -> Result<(), SoundError>;

    /// Play a previously loaded sound. Does not wait for playback to finish.
    fn play(&self, id: &str) -> Result<(), SoundError>;

    /// Number of sounds registered so far
    fn loaded_count(&self) -> usize;

    /// Wait until every sound handed to `play` has finished, up to `timeout`.
    /// Backends that do not track playback report idle right away.
    fn wait_idle(&self, _timeout: Duration) -> bool {
        true
    }
}

/// Pick the backend for `platform`.
///
/// Native platforms need the host's plugin bridge; everything else plays
/// sounds from `sounds_root` in-process.
pub fn select_backend(
    platform: Platform,
    sounds_root: &Path,
    volume: f32,
    bridge: Option<Arc<dyn PluginBridge>>,
) -> Result<Arc<dyn SoundBackend>, SoundError> {
    if platform.uses_native_plugin() {
        let bridge = bridge.ok_or(SoundError::BridgeMissing(platform))?;
        tracing::info!("Using native sound plugin on {}", platform);
        Ok(Arc::new(NativeBackend::new(bridge)))
    } else {
        tracing::info!(
            "Using software sound backend on {} (sounds root: {})",
            platform,
            sounds_root.display()
        );
        let backend = SoftwareBackend::new(sounds_root)?.with_volume(volume);
        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    struct NullBridge;

    impl PluginBridge for NullBridge {
        fn call(
            &self,
            _plugin: &str,
            _method: &str,
            _payload: Value,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
    }

    #[test]
    fn test_native_platform_requires_bridge() {
        let result = select_backend(Platform::Ios, Path::new("."), 1.0, None);
        assert!(matches!(result, Err(SoundError::BridgeMissing(Platform::Ios))));
    }

    #[test]
    fn test_native_platform_with_bridge() {
        let bridge: Arc<dyn PluginBridge> = Arc::new(NullBridge);
        let backend = select_backend(Platform::Android, Path::new("."), 1.0, Some(bridge)).unwrap();
        backend.load_sound("move", "sounds/move.mp3").unwrap();
        assert_eq!(backend.loaded_count(), 1);
    }

    #[test]
    fn test_software_platform_ignores_bridge() {
        let backend = select_backend(Platform::Web, Path::new("."), 0.5, None).unwrap();
        assert_eq!(backend.loaded_count(), 0);
    }
}
