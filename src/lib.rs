//! Sound cue dispatcher for the game client.
//!
//! Preloads a fixed set of sound effects and plays them on demand, gated by
//! the user's sound setting, with throttling on the `move` and `capture`
//! cues.

pub mod config;
pub mod error;
pub mod sound;

pub use config::{Config, SettingsSource};
pub use error::{ConfigError, SoundError};
pub use sound::{CueDispatcher, Platform, SoundBackend, SoundCue, ThrottledCue};
