//! Core types for playback coordination

use crate::media_session::Artwork;
use crate::queue::Queue;
use mezgebe_core::Track;
use serde::{Deserialize, Serialize};

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the current track ends
    #[default]
    Off,

    /// Repeat the current track (native looping)
    One,

    /// Advance through the queue, wrapping at the end
    All,
}

impl RepeatMode {
    /// Next mode in the user-facing cycle: off → one → all → off
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }

    /// Whether the audio output should loop natively
    pub fn uses_native_loop(self) -> bool {
        self == Self::One
    }

    /// Stable lowercase name, as used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }
}

/// Where the visible track list came from
///
/// The payload of `Day` and `Playlist` identifies the originating list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum PlaybackSource {
    /// Ad-hoc queue built by the listener
    #[default]
    Queue,

    /// Search results
    Search,

    /// A day (part) of a month, e.g. "3-12"
    Day(String),

    /// A saved playlist
    Playlist(String),
}

impl PlaybackSource {
    /// Lowercase kind label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Search => "search",
            Self::Day(_) => "day",
            Self::Playlist(_) => "playlist",
        }
    }

    /// Identifier of the originating list, when there is one
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Day(id) | Self::Playlist(id) => Some(id),
            Self::Queue | Self::Search => None,
        }
    }
}

/// Named, possibly user-edited view of the track list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackContext {
    /// Display name
    pub name: String,

    /// Origin of the list
    pub source: PlaybackSource,

    /// Tracks as shown to the listener
    pub tracks: Vec<Track>,
}

impl PlaybackContext {
    /// Empty context with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: PlaybackSource::Queue,
            tracks: Vec::new(),
        }
    }
}

/// Observable player state
///
/// Owned by the coordinator and handed out read-only. `current_time` and
/// `duration` are seconds; `duration` stays 0 until metadata arrives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub current_track: Option<Track>,
    pub queue: Queue,
    pub playback_context: PlaybackContext,
    pub is_playing: bool,
    pub is_loading: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub playback_rate: f64,
    pub repeat_mode: RepeatMode,
    pub is_offline_mode: bool,
}

impl PlayerState {
    pub(crate) fn from_config(config: &PlayerConfig) -> Self {
        Self {
            current_track: None,
            queue: Queue::new(),
            playback_context: PlaybackContext::named(config.default_context_name.clone()),
            is_playing: false,
            is_loading: false,
            current_time: 0.0,
            duration: 0.0,
            volume: crate::volume::clamp_volume(config.volume),
            playback_rate: crate::volume::clamp_playback_rate(config.playback_rate),
            repeat_mode: config.repeat_mode,
            is_offline_mode: false,
        }
    }

    /// Index of the current track in the queue
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }
}

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Initial volume, 0.0 – 1.0
    pub volume: f64,

    /// Initial playback rate, 0.2 – 2.0
    pub playback_rate: f64,

    /// Initial repeat mode
    pub repeat_mode: RepeatMode,

    /// `previous` restarts the current track when more than this many
    /// seconds have played
    pub restart_threshold_secs: f64,

    /// Context name used when nothing better is known
    pub default_context_name: String,

    /// Artist label reported to the media session
    pub artist_label: String,

    /// Artwork reported to the media session
    pub artwork: Artwork,

    /// Origin the app is served from (e.g. `https://app.example`).
    /// `None` disables proxying.
    pub app_origin: Option<String>,

    /// Path of the same-origin audio proxy
    pub proxy_path: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            playback_rate: 1.0,
            repeat_mode: RepeatMode::Off,
            restart_threshold_secs: 3.0,
            default_context_name: "Queue".to_string(),
            artist_label: "Ethiopian Orthodox Church".to_string(),
            artwork: Artwork::default(),
            app_origin: None,
            proxy_path: "/audio-proxy".to_string(),
        }
    }
}
