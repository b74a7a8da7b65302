//! Sound cue identifiers
//!
//! The fixed set of short effects the game client can trigger.
use std::fmt;
use std::str::FromStr;

use crate::error::SoundError;

/// Sound cue categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A piece moved
    Move,

    /// A piece was captured
    Capture,

    /// Atomic capture
    Explosion,

    /// Clock is running low
    Lowtime,

    /// Game start / end
    Dong,

    /// A player went berserk
    Berserk,

    Clock,

    Confirmation,
}

impl SoundCue {
    /// Every cue, in registration order
    pub const ALL: [SoundCue; 8] = [
        SoundCue::Move,
        SoundCue::Capture,
        SoundCue::Explosion,
        SoundCue::Lowtime,
        SoundCue::Dong,
        SoundCue::Berserk,
        SoundCue::Clock,
        SoundCue::Confirmation,
    ];

    /// Identifier shared with the sound backend
    pub fn id(&self) -> &'static str {
        match self {
            SoundCue::Move => "move",
            SoundCue::Capture => "capture",
            SoundCue::Explosion => "explosion",
            SoundCue::Lowtime => "lowtime",
            SoundCue::Dong => "dong",
            SoundCue::Berserk => "berserk",
            SoundCue::Clock => "clock",
            SoundCue::Confirmation => "confirmation",
        }
    }

    /// Relative resource locator, e.g. `sounds/move.mp3`
    pub fn resource_path(&self, ext: &str) -> String {
        format!("sounds/{}{}", self.id(), ext)
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SoundCue {
    type Err = SoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SoundCue::ALL
            .into_iter()
            .find(|cue| cue.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SoundError::UnknownCue(wanted.to_string()))
    }
}

/// Cues that fire in bursts and are played through a throttle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottledCue {
    Move,
    Capture,
}

impl From<ThrottledCue> for SoundCue {
    fn from(cue: ThrottledCue) -> Self {
        match cue {
            ThrottledCue::Move => SoundCue::Move,
            ThrottledCue::Capture => SoundCue::Capture,
        }
    }
}

impl TryFrom<SoundCue> for ThrottledCue {
    type Error = SoundError;

    fn try_from(cue: SoundCue) -> Result<Self, Self::Error> {
        match cue {
            SoundCue::Move => Ok(ThrottledCue::Move),
            SoundCue::Capture => Ok(ThrottledCue::Capture),
            other => Err(SoundError::NotThrottled(other)),
        }
    }
}
