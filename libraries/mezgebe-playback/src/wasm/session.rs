//! Media session and wake lock delegated to JS
//!
//! `navigator.mediaSession` and the Screen Wake Lock API are thin enough
//! that the page wires them up itself; these types forward each call to a
//! registered callback. Unregistered callbacks are no-ops.

use crate::media_session::{MediaMetadata, MediaSession, PositionState, SessionPlaybackState, WakeLock};
use js_sys::{Array, Function};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::JsValue;

/// Callbacks registered from JS
#[derive(Default)]
pub struct SessionCallbacks {
    pub on_metadata: Option<Function>,
    pub on_playback_state: Option<Function>,
    pub on_position_state: Option<Function>,
    pub on_actions: Option<Function>,
    pub on_wake_lock: Option<Function>,
}

pub type SharedCallbacks = Rc<RefCell<SessionCallbacks>>;

fn call_with(callback: Option<Function>, arg: &JsValue) {
    if let Some(cb) = callback {
        if let Err(e) = cb.call1(&JsValue::NULL, arg) {
            warn!("Media session callback failed: {:?}", e);
        }
    }
}

fn to_js(value: &impl Serialize) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

pub struct JsMediaSession {
    callbacks: SharedCallbacks,
}

impl JsMediaSession {
    pub fn new(callbacks: SharedCallbacks) -> Self {
        Self { callbacks }
    }

    // Clone out so the callback may re-register without a borrow conflict
    fn callback(&self, pick: impl Fn(&SessionCallbacks) -> Option<Function>) -> Option<Function> {
        pick(&self.callbacks.borrow())
    }
}

impl MediaSession for JsMediaSession {
    fn set_action_handlers(&mut self, actions: &[&'static str]) {
        let names: Array = actions.iter().map(|a| JsValue::from_str(a)).collect();
        call_with(self.callback(|c| c.on_actions.clone()), &names);
    }

    fn clear_action_handlers(&mut self) {
        call_with(self.callback(|c| c.on_actions.clone()), &Array::new());
    }

    fn set_metadata(&mut self, metadata: MediaMetadata) {
        call_with(self.callback(|c| c.on_metadata.clone()), &to_js(&metadata));
    }

    fn set_playback_state(&mut self, state: SessionPlaybackState) {
        call_with(self.callback(|c| c.on_playback_state.clone()), &to_js(&state));
    }

    fn set_position_state(&mut self, position: PositionState) {
        call_with(self.callback(|c| c.on_position_state.clone()), &to_js(&position));
    }
}

/// Wake lock; the callback receives `true` to acquire, `false` to release
pub struct JsWakeLock {
    callbacks: SharedCallbacks,
    held: bool,
}

impl JsWakeLock {
    pub fn new(callbacks: SharedCallbacks) -> Self {
        Self {
            callbacks,
            held: false,
        }
    }

    fn notify(&self, acquire: bool) {
        let callback = self.callbacks.borrow().on_wake_lock.clone();
        call_with(callback, &JsValue::from_bool(acquire));
    }
}

impl WakeLock for JsWakeLock {
    fn request(&mut self) {
        if !self.held {
            self.held = true;
            self.notify(true);
        }
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            self.notify(false);
        }
    }
}
