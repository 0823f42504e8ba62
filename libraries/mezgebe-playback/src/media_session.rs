//! OS media-session and wake-lock integration
//!
//! The lock-screen / notification surface is reached through the
//! [`MediaSession`] trait. [`MediaSessionSync`] owns one and translates
//! coordinator state into the calls the platform expects.

use mezgebe_core::Track;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Artwork entry for the media session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Default for Artwork {
    fn default() -> Self {
        Self {
            src: "/icon.svg".to_string(),
            sizes: "512x512".to_string(),
            mime_type: "image/svg+xml".to_string(),
        }
    }
}

/// Now-playing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Vec<Artwork>,
}

/// Session playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPlaybackState {
    Playing,
    Paused,
}

/// Position report; all values finite, `position <= duration`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionState {
    pub duration: f64,
    pub playback_rate: f64,
    pub position: f64,
}

impl PositionState {
    /// Build a report, or `None` while the duration is unknown
    pub fn new(position: f64, duration: f64, playback_rate: f64) -> Option<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return None;
        }
        let position = if position.is_finite() {
            position.clamp(0.0, duration)
        } else {
            0.0
        };
        Some(Self {
            duration,
            playback_rate,
            position,
        })
    }
}

/// Transport actions the session can deliver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum MediaAction {
    Play,
    Pause,
    #[serde(rename = "nexttrack")]
    NextTrack,
    #[serde(rename = "previoustrack")]
    PreviousTrack,
    #[serde(rename = "seekto", rename_all = "camelCase")]
    SeekTo { seek_time: f64 },
}

impl MediaAction {
    /// Action names registered with the session
    pub const NAMES: [&'static str; 5] = ["play", "pause", "nexttrack", "previoustrack", "seekto"];

    /// Parse a session action name; `seekto` needs a time
    pub fn from_name(name: &str, seek_time: Option<f64>) -> Option<Self> {
        match name {
            "play" => Some(Self::Play),
            "pause" => Some(Self::Pause),
            "nexttrack" => Some(Self::NextTrack),
            "previoustrack" => Some(Self::PreviousTrack),
            "seekto" => seek_time.map(|seek_time| Self::SeekTo { seek_time }),
            _ => None,
        }
    }
}

/// OS media session
pub trait MediaSession {
    /// Register handlers for `actions` (see [`MediaAction::NAMES`])
    fn set_action_handlers(&mut self, actions: &[&'static str]);

    fn clear_action_handlers(&mut self);

    fn set_metadata(&mut self, metadata: MediaMetadata);

    fn set_playback_state(&mut self, state: SessionPlaybackState);

    fn set_position_state(&mut self, position: PositionState);
}

/// Screen wake lock held while playing
pub trait WakeLock {
    fn request(&mut self);

    /// Must tolerate being called without a held lock
    fn release(&mut self);
}

/// Media session for hosts without one
#[derive(Debug, Default)]
pub struct NoMediaSession;

impl MediaSession for NoMediaSession {
    fn set_action_handlers(&mut self, _actions: &[&'static str]) {}
    fn clear_action_handlers(&mut self) {}
    fn set_metadata(&mut self, _metadata: MediaMetadata) {}
    fn set_playback_state(&mut self, _state: SessionPlaybackState) {}
    fn set_position_state(&mut self, _position: PositionState) {}
}

/// Wake lock for hosts without one
#[derive(Debug, Default)]
pub struct NoWakeLock;

impl WakeLock for NoWakeLock {
    fn request(&mut self) {}
    fn release(&mut self) {}
}

/// Keeps a [`MediaSession`] consistent with player state
pub struct MediaSessionSync {
    session: Box<dyn MediaSession>,
    artist: String,
    artwork: Artwork,
    attached: bool,
}

impl MediaSessionSync {
    pub fn new(session: Box<dyn MediaSession>, artist: impl Into<String>, artwork: Artwork) -> Self {
        Self {
            session,
            artist: artist.into(),
            artwork,
            attached: false,
        }
    }

    /// Register transport handlers (once)
    pub fn attach(&mut self) {
        if !self.attached {
            self.session.set_action_handlers(&MediaAction::NAMES);
            self.attached = true;
        }
    }

    /// Remove transport handlers if registered
    pub fn detach(&mut self) {
        if self.attached {
            self.session.clear_action_handlers();
            self.attached = false;
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn update_metadata(&mut self, track: &Track) {
        let metadata = MediaMetadata {
            title: track.title().to_string(),
            artist: self.artist.clone(),
            album: format!("Day {}", track.part_or_day()),
            artwork: vec![self.artwork.clone()],
        };
        self.session.set_metadata(metadata);
    }

    /// Push playback state and, when the duration is known, position
    pub fn update_playback(&mut self, is_playing: bool, position: f64, duration: f64, rate: f64) {
        self.session.set_playback_state(if is_playing {
            SessionPlaybackState::Playing
        } else {
            SessionPlaybackState::Paused
        });

        match PositionState::new(position, duration, rate) {
            Some(state) => self.session.set_position_state(state),
            None => trace!("Skipping position state, duration unknown ({})", duration),
        }
    }
}

impl std::fmt::Debug for MediaSessionSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSessionSync")
            .field("artist", &self.artist)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
