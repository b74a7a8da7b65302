//! Native sound plugin delegate
//!
//! On mobile hosts the sounds are owned by the platform's sound-effect
//! plugin. This backend only encodes plugin calls and hands them over.
use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use super::SoundBackend;
use crate::error::SoundError;

/// Name the host registers its sound plugin under
pub const PLUGIN_NAME: &str = "SoundEffect";

const METHOD_LOAD: &str = "loadSound";
const METHOD_PLAY: &str = "play";

/// Call channel into the host application's plugin layer
pub trait PluginBridge: Send + Sync {
    fn call(
        &self,
        plugin: &str,
        method: &str,
        payload: Value,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Serialize)]
struct LoadSoundArgs<'a> {
    id: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct PlayArgs<'a> {
    id: &'a str,
}

pub struct NativeBackend {
    bridge: Arc<dyn PluginBridge>,
    loaded: RwLock<HashSet<String>>,
}

impl NativeBackend {
    pub fn new(bridge: Arc<dyn PluginBridge>) -> Self {
        Self {
            bridge,
            loaded: RwLock::new(HashSet::new()),
        }
    }

    fn invoke<T: Serialize>(
        &self,
        method: &str,
        args: &T,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let payload = serde_json::to_value(args)?;
        self.bridge.call(PLUGIN_NAME, method, payload)
    }
}

impl SoundBackend for NativeBackend {
    fn load_sound(&self, id: &str, path: &str) -> Result<(), SoundError> {
        self.invoke(METHOD_LOAD, &LoadSoundArgs { id, path })
            .map_err(|source| SoundError::LoadFailed {
                id: id.to_string(),
                path: path.to_string(),
                source,
            })?;

        self.loaded.write().insert(id.to_string());
        tracing::debug!("Native plugin loaded '{}' from {}", id, path);
        Ok(())
    }

    fn play(&self, id: &str) -> Result<(), SoundError> {
        self.invoke(METHOD_PLAY, &PlayArgs { id })
            .map_err(|source| SoundError::PlaybackFailed {
                id: id.to_string(),
                source,
            })
    }

    fn loaded_count(&self) -> usize {
        self.loaded.read().len()
    }
}
