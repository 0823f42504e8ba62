//! Player Events
//!
//! Events are queued by the coordinator as state changes and handed to the
//! UI layer through [`Coordinator::drain_events`](crate::Coordinator::drain_events).

use crate::types::{PlaybackSource, RepeatMode};
use serde::Serialize;

/// Events emitted by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// A new track became current
    #[serde(rename_all = "camelCase")]
    TrackChanged {
        track_id: String,
        previous_track_id: Option<String>,
    },

    /// Playing or loading flag changed
    #[serde(rename_all = "camelCase")]
    PlaybackStateChanged { is_playing: bool, is_loading: bool },

    /// Position or duration changed (seconds)
    PositionChanged { position: f64, duration: f64 },

    VolumeChanged { volume: f64 },

    PlaybackRateChanged { rate: f64 },

    RepeatModeChanged { mode: RepeatMode },

    /// Queue replaced or cursor moved
    #[serde(rename_all = "camelCase")]
    QueueChanged {
        length: usize,
        current_index: Option<usize>,
    },

    /// Visible playlist renamed or edited
    ContextChanged {
        name: String,
        source: PlaybackSource,
        length: usize,
    },

    /// The current track ended
    #[serde(rename_all = "camelCase")]
    TrackFinished { track_id: String },

    /// The current source failed to load
    #[serde(rename_all = "camelCase")]
    LoadFailed { track_id: Option<String>, message: String },

    /// A play command was refused
    PlaybackRejected { reason: String },

    #[serde(rename_all = "camelCase")]
    OfflineModeChanged { is_offline: bool },
}
