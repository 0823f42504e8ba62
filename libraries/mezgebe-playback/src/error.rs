//! Error types for playback coordination

use thiserror::Error;

/// Playback errors
///
/// These never cross the coordinator's public operations; they are returned
/// by platform outputs and consumed by the coordinator as state changes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaybackError {
    /// The platform could not create an audio output
    #[error("Audio output unavailable: {0}")]
    OutputUnavailable(String),

    /// The output refused to start playback (autoplay policy, etc.)
    #[error("Play request rejected: {0}")]
    PlayRejected(String),

    /// The source could not be loaded
    #[error("Failed to load source: {0}")]
    LoadFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
