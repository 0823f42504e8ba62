//! Playback coordinator
//!
//! Owns [`PlayerState`], the single audio output and the media-session
//! surface. Every transport trigger (UI, lock screen, audio events) goes
//! through the same methods here, so state, output and session cannot
//! drift apart.

use crate::events::PlayerEvent;
use crate::media_session::{
    MediaAction, MediaSession, MediaSessionSync, NoMediaSession, NoWakeLock, WakeLock,
};
use crate::output::{AudioEvent, AudioOutput, LoadId, OutputFactory};
use crate::repeat::{self, EndOfTrack};
use crate::resolver::UrlResolver;
use crate::types::{PlaybackSource, PlayerConfig, PlayerState, RepeatMode};
use crate::volume::{clamp_playback_rate, clamp_volume};
use mezgebe_core::{Track, TrackId};
use tracing::{debug, warn};

/// Playback queue and media-session coordinator
///
/// Single-threaded: the platform calls into it from its UI thread, feeding
/// audio notifications through [`handle_event`](Self::handle_event) and lock
/// screen buttons through [`handle_media_action`](Self::handle_media_action).
/// Observers pick up changes with [`drain_events`](Self::drain_events).
pub struct Coordinator {
    config: PlayerConfig,
    state: PlayerState,

    // Created on first use, never replaced
    output: Option<Box<dyn AudioOutput>>,
    output_factory: OutputFactory,

    session: MediaSessionSync,
    wake_lock: Box<dyn WakeLock>,
    resolver: UrlResolver,

    // Latest load issued to the output
    current_load: LoadId,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl Coordinator {
    /// Create a coordinator; the output is built by `output_factory` on the
    /// first play request
    pub fn new(config: PlayerConfig, output_factory: OutputFactory) -> Self {
        let state = PlayerState::from_config(&config);
        let resolver = UrlResolver::new(config.app_origin.as_deref(), config.proxy_path.clone());
        let session = MediaSessionSync::new(
            Box::new(NoMediaSession),
            config.artist_label.clone(),
            config.artwork.clone(),
        );

        Self {
            config,
            state,
            output: None,
            output_factory,
            session,
            wake_lock: Box::new(NoWakeLock),
            resolver,
            current_load: LoadId::default(),
            pending_events: Vec::new(),
        }
    }

    /// Report to an OS media session
    pub fn with_media_session(mut self, session: Box<dyn MediaSession>) -> Self {
        self.session = MediaSessionSync::new(
            session,
            self.config.artist_label.clone(),
            self.config.artwork.clone(),
        );
        self
    }

    /// Hold a wake lock while playing
    pub fn with_wake_lock(mut self, wake_lock: Box<dyn WakeLock>) -> Self {
        self.wake_lock = wake_lock;
        self
    }

    // ===== Playback Control =====

    /// Play `track`, optionally switching to a new context
    ///
    /// A non-empty `context_tracks` replaces the queue wholesale; otherwise
    /// the existing queue is kept and the cursor re-located. The cursor is
    /// unset when `track` is not in the queue, which makes `next` and
    /// `previous` no-ops until a queued track is played.
    pub fn play_track(
        &mut self,
        track: Track,
        context_tracks: Option<Vec<Track>>,
        context_name: Option<&str>,
        context_source: Option<PlaybackSource>,
    ) {
        let supplied = context_tracks.filter(|tracks| !tracks.is_empty());
        let name = match (context_name.map(str::trim).filter(|n| !n.is_empty()), &supplied) {
            (Some(name), _) => name.to_string(),
            (None, Some(tracks)) => format!("{} tracks", tracks.len()),
            (None, None) => self.config.default_context_name.clone(),
        };

        match supplied {
            Some(tracks) => self.state.queue.replace(tracks, track.id()),
            None => self.state.queue.locate(track.id()),
        }

        let context = &mut self.state.playback_context;
        context.name = name;
        context.source = context_source.unwrap_or_default();
        context.tracks = self.state.queue.tracks().to_vec();

        self.emit_queue_changed();
        self.emit_context_changed();
        self.load_and_play(track);
    }

    /// Play a track from a day's listing
    pub fn play_from_day(&mut self, track: Track, tracks: Vec<Track>, day_name: &str) {
        self.play_track(
            track,
            Some(tracks),
            Some(day_name),
            Some(PlaybackSource::Day(day_name.to_string())),
        );
    }

    /// Play a track from search results
    pub fn play_from_search(&mut self, track: Track, results: Vec<Track>) {
        self.play_track(track, Some(results), Some("Search Results"), Some(PlaybackSource::Search));
    }

    /// Play a track from a saved playlist
    pub fn play_from_playlist(
        &mut self,
        track: Track,
        tracks: Vec<Track>,
        playlist_id: &str,
        playlist_name: &str,
    ) {
        self.play_track(
            track,
            Some(tracks),
            Some(playlist_name),
            Some(PlaybackSource::Playlist(playlist_id.to_string())),
        );
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if let Some(output) = self.output.as_deref_mut() {
            output.pause();
        }
        self.state.is_playing = false;
        self.wake_lock.release();
        self.emit_state_changed();
        self.sync_session();
    }

    /// Resume the loaded track without re-resolving its URL
    ///
    /// No-op when nothing has been loaded. A refused play command leaves
    /// `is_playing` set and is reported as [`PlayerEvent::PlaybackRejected`].
    pub fn resume(&mut self) {
        if self.state.current_track.is_none() || self.output.is_none() {
            debug!("Resume ignored: nothing loaded");
            return;
        }

        self.start_output();
        self.state.is_playing = true;
        self.wake_lock.request();
        self.emit_state_changed();
        self.sync_session();
    }

    /// Pause when playing, otherwise resume
    pub fn toggle_playback(&mut self) {
        if self.state.is_playing {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Seek to `time` seconds
    ///
    /// Not bounded by the duration; the output clamps. Negative and
    /// non-finite positions become 0.
    pub fn seek(&mut self, time: f64) {
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        if let Some(output) = self.output.as_deref_mut() {
            output.seek(time);
        }
        self.state.current_time = time;
        self.emit_position_changed();
        self.sync_session();
    }

    /// Skip to the next queued track, wrapping at the end
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) {
        let Some(track) = self.state.queue.advance().cloned() else {
            debug!("Next ignored: no queue position");
            return;
        };
        self.emit_queue_changed();
        self.load_and_play(track);
    }

    /// Restart the current track, or step back one track
    ///
    /// Restarts when more than the configured threshold has played.
    pub fn previous(&mut self) {
        if self.state.current_time > self.config.restart_threshold_secs {
            self.seek(0.0);
            return;
        }

        let Some(track) = self.state.queue.retreat().cloned() else {
            debug!("Previous ignored: no queue position");
            return;
        };
        self.emit_queue_changed();
        self.load_and_play(track);
    }

    // ===== Levels & Modes =====

    /// Set playback rate, clamped to 0.2 – 2.0
    pub fn set_playback_rate(&mut self, rate: f64) {
        let rate = clamp_playback_rate(rate);
        if let Some(output) = self.output.as_deref_mut() {
            output.set_playback_rate(rate);
        }
        self.state.playback_rate = rate;
        self.pending_events.push(PlayerEvent::PlaybackRateChanged { rate });
        self.sync_session();
    }

    /// Set volume, clamped to 0.0 – 1.0
    pub fn set_volume(&mut self, volume: f64) {
        let volume = clamp_volume(volume);
        if let Some(output) = self.output.as_deref_mut() {
            output.set_volume(volume);
        }
        self.state.volume = volume;
        self.pending_events.push(PlayerEvent::VolumeChanged { volume });
    }

    /// Cycle off → one → all → off, or set `mode` directly
    pub fn toggle_repeat_mode(&mut self, mode: Option<RepeatMode>) {
        let mode = mode.unwrap_or_else(|| self.state.repeat_mode.next());
        if let Some(output) = self.output.as_deref_mut() {
            output.set_looping(mode.uses_native_loop());
        }
        self.state.repeat_mode = mode;
        self.pending_events.push(PlayerEvent::RepeatModeChanged { mode });
    }

    // ===== Context =====

    /// Rename the visible playlist; blank names fall back to the default
    pub fn set_queue_name(&mut self, name: &str) {
        let name = name.trim();
        self.state.playback_context.name = if name.is_empty() {
            self.config.default_context_name.clone()
        } else {
            name.to_string()
        };
        self.emit_context_changed();
    }

    /// Append to the visible playlist unless already present
    ///
    /// The playback queue is unaffected until the next `play_track`.
    pub fn add_to_context(&mut self, track: Track) {
        let tracks = &mut self.state.playback_context.tracks;
        if tracks.iter().any(|t| t.id() == track.id()) {
            debug!("Track {} already in context", track.id());
            return;
        }
        tracks.push(track);
        self.emit_context_changed();
    }

    /// Remove a track from the visible playlist
    pub fn remove_from_context(&mut self, track_id: &TrackId) {
        let tracks = &mut self.state.playback_context.tracks;
        let before = tracks.len();
        tracks.retain(|t| t.id() != track_id);
        if tracks.len() != before {
            self.emit_context_changed();
        }
    }

    /// Record whether the app is running offline
    pub fn set_offline_mode(&mut self, is_offline: bool) {
        if self.state.is_offline_mode != is_offline {
            self.state.is_offline_mode = is_offline;
            self.pending_events.push(PlayerEvent::OfflineModeChanged { is_offline });
        }
    }

    // ===== Platform Input =====

    /// Dispatch a lock-screen / notification transport action
    pub fn handle_media_action(&mut self, action: MediaAction) {
        debug!("Media action: {:?}", action);
        match action {
            MediaAction::Play => self.resume(),
            MediaAction::Pause => self.pause(),
            MediaAction::NextTrack => self.next(),
            MediaAction::PreviousTrack => self.previous(),
            MediaAction::SeekTo { seek_time } => self.seek(seek_time),
        }
    }

    /// Apply a notification from the audio output
    pub fn handle_event(&mut self, event: AudioEvent) {
        if let Some(load) = event.load() {
            if load != self.current_load {
                debug!(
                    "Ignoring stale {:?} (load {} < {})",
                    event,
                    load.get(),
                    self.current_load.get()
                );
                return;
            }
        }

        match event {
            AudioEvent::TimeUpdate { position } => {
                if position.is_finite() {
                    self.state.current_time = position.max(0.0);
                }
                self.emit_position_changed();
                self.sync_session();
            }
            AudioEvent::LoadedMetadata { duration } => {
                self.state.duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
                self.emit_position_changed();
                self.sync_session();
            }
            AudioEvent::Play => {
                self.state.is_playing = true;
                self.emit_state_changed();
                self.sync_session();
            }
            AudioEvent::Pause => {
                self.state.is_playing = false;
                self.emit_state_changed();
                self.sync_session();
            }
            AudioEvent::RateChange { rate } => {
                let rate = clamp_playback_rate(rate);
                // Echoes of set_playback_rate are already published
                if rate != self.state.playback_rate {
                    self.state.playback_rate = rate;
                    self.pending_events.push(PlayerEvent::PlaybackRateChanged { rate });
                }
                self.sync_session();
            }
            AudioEvent::Ended { .. } => self.on_track_end(),
            AudioEvent::Waiting => self.set_loading(true),
            AudioEvent::Playing | AudioEvent::CanPlay { .. } => self.set_loading(false),
            AudioEvent::Error { message, .. } => {
                // Fail open: isPlaying stays as attempted, no retry
                let track_id = self.state.current_track.as_ref().map(|t| t.id().to_string());
                warn!("Failed to load {:?}: {}", track_id, message);
                self.set_loading(false);
                self.pending_events.push(PlayerEvent::LoadFailed { track_id, message });
            }
            AudioEvent::PlayRejected { reason, .. } => {
                warn!("Play request rejected: {}", reason);
                self.set_loading(false);
                self.pending_events.push(PlayerEvent::PlaybackRejected { reason });
            }
        }
    }

    // ===== State Queries =====

    /// Read-only view of the player state
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    /// Whether the audio output has been created
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Load id of the most recent load, for tagging platform events
    pub fn current_load(&self) -> LoadId {
        self.current_load
    }

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    /// Make `track` current, point the output at it and start playing
    fn load_and_play(&mut self, track: Track) {
        let url = self.resolver.resolve_track(&track).into_owned();
        let previous_track_id = self.state.current_track.as_ref().map(|t| t.id().to_string());
        debug!("Loading track {} from {}", track.id(), url);

        self.session.update_metadata(&track);
        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: track.id().to_string(),
            previous_track_id,
        });

        self.state.current_track = Some(track);
        self.state.is_playing = true;
        self.state.is_loading = true;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;

        if self.ensure_output() {
            self.current_load = self.current_load.next();
            let load = self.current_load;
            let rate = self.state.playback_rate;
            if let Some(output) = self.output.as_deref_mut() {
                output.load(&url, load);
                output.set_playback_rate(rate);
            }
            self.wake_lock.request();
            self.start_output();
        } else {
            self.state.is_playing = false;
            self.state.is_loading = false;
            self.pending_events.push(PlayerEvent::LoadFailed {
                track_id: self.state.current_track.as_ref().map(|t| t.id().to_string()),
                message: "audio output unavailable".to_string(),
            });
        }

        self.emit_state_changed();
        self.emit_position_changed();
        self.sync_session();
    }

    /// Create the output on first use
    fn ensure_output(&mut self) -> bool {
        if self.output.is_some() {
            return true;
        }

        match (self.output_factory)() {
            Ok(mut output) => {
                output.set_volume(self.state.volume);
                output.set_playback_rate(self.state.playback_rate);
                output.set_looping(self.state.repeat_mode.uses_native_loop());
                self.output = Some(output);
                self.session.attach();
                debug!("Audio output created");
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    /// Issue a play command, consuming a synchronous refusal
    fn start_output(&mut self) {
        let Some(output) = self.output.as_deref_mut() else {
            return;
        };
        if let Err(e) = output.play() {
            warn!("{}", e);
            self.state.is_loading = false;
            self.pending_events.push(PlayerEvent::PlaybackRejected {
                reason: e.to_string(),
            });
        }
    }

    fn on_track_end(&mut self) {
        if let Some(track) = &self.state.current_track {
            self.pending_events.push(PlayerEvent::TrackFinished {
                track_id: track.id().to_string(),
            });
        }

        match repeat::on_track_end(self.state.repeat_mode, &self.state.queue) {
            EndOfTrack::Restart => {
                if let Some(output) = self.output.as_deref_mut() {
                    output.seek(0.0);
                }
                self.state.current_time = 0.0;
                self.start_output();
                self.state.is_playing = true;
                self.emit_state_changed();
                self.emit_position_changed();
                self.sync_session();
            }
            EndOfTrack::Advance(index) => {
                self.state.queue.set_current(index);
                let Some(track) = self.state.queue.current_track().cloned() else {
                    return;
                };
                self.emit_queue_changed();
                self.load_and_play(track);
            }
            EndOfTrack::Stop => {
                self.state.is_playing = false;
                self.wake_lock.release();
                self.emit_state_changed();
                self.sync_session();
            }
        }
    }

    fn set_loading(&mut self, is_loading: bool) {
        if self.state.is_loading != is_loading {
            self.state.is_loading = is_loading;
            self.emit_state_changed();
        }
    }

    fn sync_session(&mut self) {
        self.session.update_playback(
            self.state.is_playing,
            self.state.current_time,
            self.state.duration,
            self.state.playback_rate,
        );
    }

    // ===== Event Emission =====

    fn emit_state_changed(&mut self) {
        self.pending_events.push(PlayerEvent::PlaybackStateChanged {
            is_playing: self.state.is_playing,
            is_loading: self.state.is_loading,
        });
    }

    fn emit_position_changed(&mut self) {
        self.pending_events.push(PlayerEvent::PositionChanged {
            position: self.state.current_time,
            duration: self.state.duration,
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.state.queue.len(),
            current_index: self.state.queue.current_index(),
        });
    }

    fn emit_context_changed(&mut self) {
        let context = &self.state.playback_context;
        self.pending_events.push(PlayerEvent::ContextChanged {
            name: context.name.clone(),
            source: context.source.clone(),
            length: context.tracks.len(),
        });
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.session.detach();
        self.wake_lock.release();
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("has_output", &self.output.is_some())
            .field("current_load", &self.current_load)
            .finish_non_exhaustive()
    }
}
