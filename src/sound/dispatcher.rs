//! Sound cue dispatcher
//!
//! Loads the cue set into a backend and plays cues on demand, gated by the
//! user's sound setting. `move` and `capture` can fire many times per frame
//! during premove chains and replays, so each gets its own throttle.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;

use super::backend::SoundBackend;
use super::cue::{SoundCue, ThrottledCue};
use super::platform::Platform;
use super::throttle::{ThrottleState, Throttled};
use crate::config::SettingsSource;
use crate::error::SoundError;

/// Default throttle window for burst cues
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_millis(50);

type CueAction = Box<dyn Fn() + Send + Sync>;

pub struct CueDispatcher {
    backend: Arc<dyn SoundBackend>,
    enabled: Arc<AtomicBool>,
    throttled_move: Throttled<CueAction>,
    throttled_capture: Throttled<CueAction>,
}

impl CueDispatcher {
    /// Create a dispatcher. Playback stays off until [`initialize`](Self::initialize)
    /// reads the sound setting.
    pub fn new(backend: Arc<dyn SoundBackend>, throttle_window: Duration) -> Self {
        let enabled = Arc::new(AtomicBool::new(false));

        let throttled_move = Throttled::new(
            throttle_window,
            gated_play(Arc::clone(&backend), Arc::clone(&enabled), SoundCue::Move),
        );
        let throttled_capture = Throttled::new(
            throttle_window,
            gated_play(Arc::clone(&backend), Arc::clone(&enabled), SoundCue::Capture),
        );

        Self {
            backend,
            enabled,
            throttled_move,
            throttled_capture,
        }
    }

    /// Load every cue for `platform` and cache the current sound setting.
    ///
    /// Loads run concurrently; the first failure fails the whole call. Cues
    /// that finished loading before the failure stay registered.
    pub fn initialize(
        &self,
        platform: Platform,
        settings: &dyn SettingsSource,
    ) -> Result<(), SoundError> {
        self.enabled.store(settings.sound_enabled(), Ordering::Relaxed);

        let ext = platform.sound_extension();
        let backend = &self.backend;
        SoundCue::ALL.par_iter().try_for_each(|cue| {
            backend.load_sound(cue.id(), &cue.resource_path(ext))
        })?;

        tracing::info!(
            "Loaded {} sound cues for {} (sound {})",
            SoundCue::ALL.len(),
            platform,
            if self.is_sound_enabled() { "on" } else { "off" }
        );
        Ok(())
    }

    /// Play `cue` if sound is enabled. Never blocks, never fails.
    pub fn play(&self, cue: SoundCue) {
        play_if_enabled(self.backend.as_ref(), &self.enabled, cue);
    }

    /// Play a burst cue through its throttle
    pub fn throttled_play(&self, cue: ThrottledCue) {
        let fired = match cue {
            ThrottledCue::Move => self.throttled_move.call(),
            ThrottledCue::Capture => self.throttled_capture.call(),
        };
        if !fired {
            tracing::trace!("Throttled '{}'", SoundCue::from(cue));
        }
    }

    pub fn throttle_state(&self, cue: ThrottledCue) -> ThrottleState {
        match cue {
            ThrottledCue::Move => self.throttled_move.state(),
            ThrottledCue::Capture => self.throttled_capture.state(),
        }
    }

    /// Update the cached sound setting. Applies to every later play call.
    pub fn on_sound_setting_changed(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        tracing::debug!("Sound {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Block until cues already handed to the backend have finished, or
    /// `timeout` passes. Returns false on timeout.
    pub fn wait_for_playback(&self, timeout: Duration) -> bool {
        self.backend.wait_idle(timeout)
    }

    pub fn play_move(&self) {
        self.play(SoundCue::Move);
    }

    pub fn play_capture(&self) {
        self.play(SoundCue::Capture);
    }

    pub fn play_explosion(&self) {
        self.play(SoundCue::Explosion);
    }

    pub fn play_lowtime(&self) {
        self.play(SoundCue::Lowtime);
    }

    pub fn play_dong(&self) {
        self.play(SoundCue::Dong);
    }

    pub fn play_berserk(&self) {
        self.play(SoundCue::Berserk);
    }

    pub fn play_clock(&self) {
        self.play(SoundCue::Clock);
    }

    pub fn play_confirmation(&self) {
        self.play(SoundCue::Confirmation);
    }

    pub fn throttled_move(&self) {
        self.throttled_play(ThrottledCue::Move);
    }

    pub fn throttled_capture(&self) {
        self.throttled_play(ThrottledCue::Capture);
    }
}

fn play_if_enabled(backend: &dyn SoundBackend, enabled: &AtomicBool, cue: SoundCue) {
    if !enabled.load(Ordering::Relaxed) {
        return;
    }
    if let Err(e) = backend.play(cue.id()) {
        tracing::debug!("Ignoring playback failure for '{}': {}", cue, e);
    }
}

fn gated_play(backend: Arc<dyn SoundBackend>, enabled: Arc<AtomicBool>, cue: SoundCue) -> CueAction {
    Box::new(move || play_if_enabled(backend.as_ref(), &enabled, cue))
}
