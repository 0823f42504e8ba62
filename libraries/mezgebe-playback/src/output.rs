//! Audio output abstraction
//!
//! The coordinator never touches a platform audio API directly. It drives
//! a single [`AudioOutput`] created on first use and reacts to the
//! [`AudioEvent`]s the platform feeds back through
//! [`Coordinator::handle_event`](crate::Coordinator::handle_event).

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Identifies one `load` request
///
/// Ids increase monotonically per coordinator; events tagged with an older
/// id than the latest load are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadId(u64);

impl LoadId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// As a JS number, for handing through callbacks
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// From a JS number; anything that is not a whole non-negative number
    /// maps to the default id, which never matches a live load
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
            Self(value as u64)
        } else {
            Self::default()
        }
    }
}

/// Platform audio output
///
/// Implementations are expected to be cheap to command; anything slow
/// (network, decoding) happens on the platform side and is reported back
/// as [`AudioEvent`]s.
pub trait AudioOutput {
    /// Point the output at `url`, tagging follow-up events with `load`
    fn load(&mut self, url: &str, load: LoadId);

    /// Start or resume playback
    ///
    /// `Err` means the command was refused synchronously. Asynchronous
    /// refusals arrive as [`AudioEvent::PlayRejected`].
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Seek to `position` seconds
    fn seek(&mut self, position: f64);

    fn set_volume(&mut self, volume: f64);

    fn set_playback_rate(&mut self, rate: f64);

    /// Enable native looping of the current source
    fn set_looping(&mut self, looping: bool);
}

/// Creates the output on first use
pub type OutputFactory = Box<dyn FnMut() -> Result<Box<dyn AudioOutput>>>;

/// Notifications from the audio output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AudioEvent {
    /// Playback position moved (seconds)
    TimeUpdate { position: f64 },

    /// Duration became known (seconds)
    LoadedMetadata { duration: f64 },

    /// Output started playing
    Play,

    /// Output paused
    Pause,

    /// Output playback rate changed
    RateChange { rate: f64 },

    /// Current source played to the end
    Ended { load: LoadId },

    /// Buffering stalled
    Waiting,

    /// Buffering recovered
    Playing,

    /// Enough data to start
    CanPlay { load: LoadId },

    /// Source failed to load
    Error { load: LoadId, message: String },

    /// A play command was refused asynchronously
    PlayRejected { load: LoadId, reason: String },
}

impl AudioEvent {
    /// Load the event belongs to, for the tagged variants
    pub fn load(&self) -> Option<LoadId> {
        match self {
            Self::Ended { load }
            | Self::CanPlay { load }
            | Self::Error { load, .. }
            | Self::PlayRejected { load, .. } => Some(*load),
            _ => None,
        }
    }
}
