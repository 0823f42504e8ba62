//! Mezgebe - Playback Coordination
//!
//! Platform-agnostic playback queue and media-session coordinator.
//!
//! This crate provides:
//! - A circular playback queue plus a separately editable visible playlist
//! - Repeat modes (Off, One, All) with an end-of-track policy
//! - Volume and playback-rate clamping
//! - Same-origin proxy rewriting for cross-origin audio URLs
//! - Media-session (lock screen) and wake-lock synchronisation
//! - Load generations so late events from abandoned loads are ignored
//!
//! # Architecture
//!
//! The coordinator never touches a platform API. Audio playback goes through
//! the [`AudioOutput`] trait, the lock screen through [`MediaSession`], and
//! the screen lock through [`WakeLock`]. The `wasm` feature provides browser
//! implementations backed by `HTMLAudioElement`.
//!
//! # Example
//!
//! ```rust
//! use mezgebe_core::Track;
//! use mezgebe_playback::{AudioOutput, Coordinator, LoadId, PlayerConfig, Result};
//!
//! struct Silent;
//!
//! impl AudioOutput for Silent {
//!     fn load(&mut self, _url: &str, _load: LoadId) {}
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position: f64) {}
//!     fn set_volume(&mut self, _volume: f64) {}
//!     fn set_playback_rate(&mut self, _rate: f64) {}
//!     fn set_looping(&mut self, _looping: bool) {}
//! }
//!
//! let mut player = Coordinator::new(
//!     PlayerConfig::default(),
//!     Box::new(|| Ok(Box::new(Silent) as Box<dyn AudioOutput>)),
//! );
//!
//! let day = vec![
//!     Track::new("1", "Morning", "https://host.example/1.mp3"),
//!     Track::new("2", "Evening", "https://host.example/2.mp3"),
//! ];
//! player.play_from_day(day[0].clone(), day.clone(), "Day 1");
//! player.next();
//!
//! assert_eq!(player.state().current_index(), Some(1));
//! assert!(player.state().is_playing);
//! ```

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod error;
pub mod events;
pub mod media_session;
pub mod output;
pub mod queue;
pub mod repeat;
pub mod resolver;
pub mod types;
pub mod volume;

// WASM bindings (optional)
#[cfg(feature = "wasm")]
pub mod wasm;

pub use coordinator::Coordinator;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use media_session::{
    Artwork, MediaAction, MediaMetadata, MediaSession, MediaSessionSync, NoMediaSession,
    NoWakeLock, PositionState, SessionPlaybackState, WakeLock,
};
pub use output::{AudioEvent, AudioOutput, LoadId, OutputFactory};
pub use queue::Queue;
pub use repeat::EndOfTrack;
pub use resolver::UrlResolver;
pub use types::{PlaybackContext, PlaybackSource, PlayerConfig, PlayerState, RepeatMode};
