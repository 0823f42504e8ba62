//! WASM-compatible coordinator wrapper

use super::output::{EventSink, HtmlAudioOutput};
use super::session::{JsMediaSession, JsWakeLock, SharedCallbacks};
use super::types::{parse_repeat_mode, parse_source, track_from_js, tracks_from_js};
use crate::events::PlayerEvent;
use crate::media_session::MediaAction;
use crate::output::{AudioEvent, AudioOutput, OutputFactory};
use crate::types::PlayerConfig;
use crate::Coordinator;
use js_sys::Function;
use mezgebe_core::TrackId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::warn;
use wasm_bindgen::prelude::*;

/// Shared between the player and the element listeners
#[derive(Default)]
struct Bridge {
    on_event: RefCell<Option<Function>>,
    // Audio events raised while the coordinator was borrowed
    backlog: RefCell<VecDeque<AudioEvent>>,
    callbacks: SharedCallbacks,
}

impl Bridge {
    fn forward(&self, events: Vec<PlayerEvent>) {
        let Some(cb) = self.on_event.borrow().clone() else {
            return;
        };
        for event in events {
            match serde_wasm_bindgen::to_value(&event) {
                Ok(value) => {
                    if let Err(e) = cb.call1(&JsValue::NULL, &value) {
                        warn!("Event callback failed: {:?}", e);
                    }
                }
                Err(e) => warn!("Failed to convert event: {}", e),
            }
        }
    }
}

fn event_sink(coordinator: Weak<RefCell<Coordinator>>, bridge: Rc<Bridge>) -> EventSink {
    Rc::new(move |event: AudioEvent| {
        let Some(coordinator) = coordinator.upgrade() else {
            return;
        };
        let events = match coordinator.try_borrow_mut() {
            Ok(mut inner) => {
                inner.handle_event(event);
                inner.drain_events()
            }
            Err(_) => {
                bridge.backlog.borrow_mut().push_back(event);
                return;
            }
        };
        bridge.forward(events);
    })
}

/// Browser audio player
///
/// Owns the coordinator; the first play call creates the `<audio>` element.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: Rc<RefCell<Coordinator>>,
    bridge: Rc<Bridge>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player; `config` is an optional partial `PlayerConfig`
    ///
    /// The app origin defaults to `window.location.origin`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let mut config: PlayerConfig = if config.is_undefined() || config.is_null() {
            PlayerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        if config.app_origin.is_none() {
            config.app_origin = web_sys::window().and_then(|w| w.location().origin().ok());
        }

        let bridge = Rc::new(Bridge::default());

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<Coordinator>>| {
            let weak = weak.clone();
            let sink_bridge = Rc::clone(&bridge);
            let factory: OutputFactory = Box::new(move || {
                let sink = event_sink(weak.clone(), Rc::clone(&sink_bridge));
                HtmlAudioOutput::new(sink).map(|output| Box::new(output) as Box<dyn AudioOutput>)
            });

            RefCell::new(
                Coordinator::new(config, factory)
                    .with_media_session(Box::new(JsMediaSession::new(Rc::clone(
                        &bridge.callbacks,
                    ))))
                    .with_wake_lock(Box::new(JsWakeLock::new(Rc::clone(&bridge.callbacks)))),
            )
        });

        Ok(Self { inner, bridge })
    }

    // ===== Playback Control =====

    /// Play a track; `contextTracks` may be omitted to keep the queue
    #[wasm_bindgen(js_name = playTrack)]
    pub fn play_track(
        &self,
        track: JsValue,
        context_tracks: JsValue,
        context_name: Option<String>,
        source_kind: Option<String>,
        source_id: Option<String>,
    ) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let tracks = tracks_from_js(context_tracks)?;
        let source = source_kind
            .map(|kind| parse_source(&kind, source_id))
            .transpose()?;
        self.run(|c| c.play_track(track, tracks, context_name.as_deref(), source));
        Ok(())
    }

    #[wasm_bindgen(js_name = playFromDay)]
    pub fn play_from_day(&self, track: JsValue, tracks: JsValue, day_name: &str) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let tracks = tracks_from_js(tracks)?.unwrap_or_default();
        self.run(|c| c.play_from_day(track, tracks, day_name));
        Ok(())
    }

    #[wasm_bindgen(js_name = playFromSearch)]
    pub fn play_from_search(&self, track: JsValue, results: JsValue) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let results = tracks_from_js(results)?.unwrap_or_default();
        self.run(|c| c.play_from_search(track, results));
        Ok(())
    }

    #[wasm_bindgen(js_name = playFromPlaylist)]
    pub fn play_from_playlist(
        &self,
        track: JsValue,
        tracks: JsValue,
        playlist_id: &str,
        playlist_name: &str,
    ) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        let tracks = tracks_from_js(tracks)?.unwrap_or_default();
        self.run(|c| c.play_from_playlist(track, tracks, playlist_id, playlist_name));
        Ok(())
    }

    pub fn pause(&self) {
        self.run(Coordinator::pause);
    }

    pub fn resume(&self) {
        self.run(Coordinator::resume);
    }

    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) {
        self.run(Coordinator::toggle_playback);
    }

    /// Seek to position in seconds
    pub fn seek(&self, time: f64) {
        self.run(|c| c.seek(time));
    }

    pub fn next(&self) {
        self.run(Coordinator::next);
    }

    pub fn previous(&self) {
        self.run(Coordinator::previous);
    }

    // ===== Levels & Modes =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.run(|c| c.set_volume(volume));
    }

    /// Set playback rate (0.2 - 2.0)
    #[wasm_bindgen(js_name = setPlaybackRate)]
    pub fn set_playback_rate(&self, rate: f64) {
        self.run(|c| c.set_playback_rate(rate));
    }

    /// Cycle repeat mode, or set "off" | "one" | "all"
    #[wasm_bindgen(js_name = toggleRepeatMode)]
    pub fn toggle_repeat_mode(&self, mode: Option<String>) -> Result<(), JsValue> {
        let mode = mode.as_deref().map(parse_repeat_mode).transpose()?;
        self.run(|c| c.toggle_repeat_mode(mode));
        Ok(())
    }

    // ===== Context =====

    #[wasm_bindgen(js_name = setQueueName)]
    pub fn set_queue_name(&self, name: &str) {
        self.run(|c| c.set_queue_name(name));
    }

    #[wasm_bindgen(js_name = addToContext)]
    pub fn add_to_context(&self, track: JsValue) -> Result<(), JsValue> {
        let track = track_from_js(track)?;
        self.run(|c| c.add_to_context(track));
        Ok(())
    }

    #[wasm_bindgen(js_name = removeFromContext)]
    pub fn remove_from_context(&self, track_id: &str) {
        let id = TrackId::from(track_id);
        self.run(|c| c.remove_from_context(&id));
    }

    #[wasm_bindgen(js_name = setOfflineMode)]
    pub fn set_offline_mode(&self, is_offline: bool) {
        self.run(|c| c.set_offline_mode(is_offline));
    }

    /// Forward a media-session action ("play", "seekto", ...)
    #[wasm_bindgen(js_name = mediaAction)]
    pub fn media_action(&self, name: &str, seek_time: Option<f64>) -> Result<(), JsValue> {
        let action = MediaAction::from_name(name, seek_time)
            .ok_or_else(|| JsValue::from_str(&format!("Unsupported media action: {name}")))?;
        self.run(|c| c.handle_media_action(action));
        Ok(())
    }

    // ===== State Queries =====

    /// Snapshot of the player state
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> JsValue {
        self.inner
            .try_borrow()
            .ok()
            .and_then(|c| serde_wasm_bindgen::to_value(c.state()).ok())
            .unwrap_or(JsValue::NULL)
    }

    // ===== Event Listeners =====

    /// Register the player event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        *self.bridge.on_event.borrow_mut() = Some(callback);
    }

    #[wasm_bindgen(js_name = onMetadata)]
    pub fn on_metadata(&self, callback: Function) {
        self.bridge.callbacks.borrow_mut().on_metadata = Some(callback);
    }

    #[wasm_bindgen(js_name = onPlaybackState)]
    pub fn on_playback_state(&self, callback: Function) {
        self.bridge.callbacks.borrow_mut().on_playback_state = Some(callback);
    }

    #[wasm_bindgen(js_name = onPositionState)]
    pub fn on_position_state(&self, callback: Function) {
        self.bridge.callbacks.borrow_mut().on_position_state = Some(callback);
    }

    /// Receives the action names to register; an empty array clears them
    #[wasm_bindgen(js_name = onActions)]
    pub fn on_actions(&self, callback: Function) {
        self.bridge.callbacks.borrow_mut().on_actions = Some(callback);
    }

    /// Receives `true` to acquire the wake lock, `false` to release it
    #[wasm_bindgen(js_name = onWakeLock)]
    pub fn on_wake_lock(&self, callback: Function) {
        self.bridge.callbacks.borrow_mut().on_wake_lock = Some(callback);
    }
}

impl WasmPlayer {
    /// Run `op`, replay queued audio events, then forward player events
    ///
    /// Re-entrant calls (a JS callback calling back into the player) are
    /// dropped with a warning.
    fn run(&self, op: impl FnOnce(&mut Coordinator)) {
        let events = match self.inner.try_borrow_mut() {
            Ok(mut inner) => {
                op(&mut *inner);
                loop {
                    let next = self.bridge.backlog.borrow_mut().pop_front();
                    match next {
                        Some(event) => inner.handle_event(event),
                        None => break,
                    }
                }
                inner.drain_events()
            }
            Err(_) => {
                warn!("Player busy; ignoring re-entrant call");
                return;
            }
        };
        self.bridge.forward(events);
    }
}
