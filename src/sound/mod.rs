//! Sound cue system
//!
//! Plays the game's short sound effects on demand:
//! - A fixed set of cues preloaded once at startup
//! - Playback gated by the user's sound setting
//! - Leading-edge throttling for cues that fire in bursts
//!
//! ## Architecture
//!
//! ```text
//! CueDispatcher
//!   ├── gating flag (sound on/off)
//!   ├── Throttled (move)     ─┐ independent
//!   ├── Throttled (capture)  ─┘ 50ms windows
//!   └── SoundBackend
//!       ├── SoftwareBackend  (web / desktop, rodio)
//!       └── NativeBackend    (ios / android, host plugin)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sound_cues::sound::{select_backend, CueDispatcher, Platform, SoundCue};
//!
//! let platform = Platform::current();
//! let backend = select_backend(platform, &config.sounds_root()?, config.volume, None)?;
//!
//! let dispatcher = CueDispatcher::new(backend, config.throttle_window());
//! dispatcher.initialize(platform, &config)?;
//!
//! dispatcher.play(SoundCue::Dong);
//! dispatcher.throttled_move();
//! dispatcher.on_sound_setting_changed(false);
//! ```

pub mod backend;
pub mod cue;
pub mod dispatcher;
pub mod platform;
pub mod throttle;

// Re-export commonly used types
pub use backend::{select_backend, NativeBackend, PluginBridge, SoftwareBackend, SoundBackend};
pub use cue::{SoundCue, ThrottledCue};
pub use dispatcher::{CueDispatcher, DEFAULT_THROTTLE_WINDOW};
pub use platform::Platform;
pub use throttle::{Throttle, ThrottleState, Throttled};
