//! Leading-edge throttle
//!
//! The first call in a burst fires immediately, calls inside the window are
//! dropped, and the first call after the window has elapsed fires again.
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// State of a throttle gate at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// Next call fires
    Idle,

    /// Calls are dropped until `remaining` has elapsed
    CoolingDown { remaining: Duration },
}

/// Throttle gate with a stored last-fired timestamp
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    /// Create a throttle with a window in milliseconds
    pub fn from_millis(window_ms: u64) -> Self {
        Self::new(Duration::from_millis(window_ms))
    }

    /// Returns true and records `now` if the gate is idle at `now`
    pub fn try_fire_at(&mut self, now: Instant) -> bool {
        match self.state_at(now) {
            ThrottleState::Idle => {
                self.last_fired = Some(now);
                true
            }
            ThrottleState::CoolingDown { .. } => false,
        }
    }

    /// Check the monotonic clock and fire if idle
    pub fn try_fire(&mut self) -> bool {
        self.try_fire_at(Instant::now())
    }

    pub fn state_at(&self, now: Instant) -> ThrottleState {
        match self.last_fired {
            None => ThrottleState::Idle,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                if elapsed >= self.window {
                    ThrottleState::Idle
                } else {
                    ThrottleState::CoolingDown {
                        remaining: self.window - elapsed,
                    }
                }
            }
        }
    }

    pub fn state(&self) -> ThrottleState {
        self.state_at(Instant::now())
    }

    /// Forget the last fire so the next call goes through
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

/// A zero-argument action wrapped in a [`Throttle`]
pub struct Throttled<F> {
    gate: Mutex<Throttle>,
    action: F,
}

impl<F: Fn()> Throttled<F> {
    pub fn new(window: Duration, action: F) -> Self {
        Self {
            gate: Mutex::new(Throttle::new(window)),
            action,
        }
    }

    /// Run the action unless the window is still cooling down.
    /// Returns whether the action ran.
    pub fn call(&self) -> bool {
        self.call_at(Instant::now())
    }

    pub fn call_at(&self, now: Instant) -> bool {
        // Gate lock is released before the action runs
        let fire = self.gate.lock().try_fire_at(now);
        if fire {
            (self.action)();
        }
        fire
    }

    pub fn state(&self) -> ThrottleState {
        self.gate.lock().state()
    }
}
