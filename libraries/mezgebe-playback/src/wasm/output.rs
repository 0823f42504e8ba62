//! `HTMLAudioElement`-backed audio output

use super::types::js_error;
use crate::error::{PlaybackError, Result};
use crate::output::{AudioEvent, AudioOutput, LoadId};
use js_sys::{Function, Reflect};
use std::cell::Cell;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlAudioElement;

/// Receives events raised by the element
pub type EventSink = Rc<dyn Fn(AudioEvent)>;

type Listener = Closure<dyn FnMut()>;

/// Called as `(load, error)` when a play promise rejects
type RejectHandler = Closure<dyn FnMut(JsValue, JsValue)>;

/// Single `<audio>` element driven by the coordinator
///
/// DOM listeners are attached once at construction and tag load-scoped
/// events with the load id current at dispatch time.
pub struct HtmlAudioOutput {
    element: HtmlAudioElement,
    current_load: Rc<Cell<LoadId>>,
    sink: EventSink,
    listeners: Vec<(&'static str, Listener)>,
    on_reject: RejectHandler,
}

impl HtmlAudioOutput {
    pub fn new(sink: EventSink) -> Result<Self> {
        let element = HtmlAudioElement::new()
            .map_err(|e| PlaybackError::OutputUnavailable(js_error(&e)))?;
        element.set_cross_origin(Some("anonymous"));
        element.set_preload("auto");

        let reject_sink = Rc::clone(&sink);
        let on_reject = RejectHandler::new(move |load: JsValue, err: JsValue| {
            reject_sink(AudioEvent::PlayRejected {
                load: LoadId::from_f64(load.as_f64().unwrap_or(f64::NAN)),
                reason: js_error(&err),
            });
        });

        let mut output = Self {
            element,
            current_load: Rc::new(Cell::new(LoadId::default())),
            sink,
            listeners: Vec::new(),
            on_reject,
        };

        output.listen("timeupdate", |el, _| AudioEvent::TimeUpdate {
            position: el.current_time(),
        })?;
        output.listen("loadedmetadata", |el, _| AudioEvent::LoadedMetadata {
            duration: el.duration(),
        })?;
        output.listen("play", |_, _| AudioEvent::Play)?;
        output.listen("pause", |_, _| AudioEvent::Pause)?;
        output.listen("ratechange", |el, _| AudioEvent::RateChange {
            rate: el.playback_rate(),
        })?;
        output.listen("ended", |_, load| AudioEvent::Ended { load })?;
        output.listen("waiting", |_, _| AudioEvent::Waiting)?;
        output.listen("playing", |_, _| AudioEvent::Playing)?;
        output.listen("canplay", |_, load| AudioEvent::CanPlay { load })?;
        output.listen("error", |el, load| AudioEvent::Error {
            load,
            message: el.error().map_or_else(
                || "unknown media error".to_string(),
                |e| format!("media error code {}", e.code()),
            ),
        })?;

        Ok(output)
    }

    fn listen(
        &mut self,
        name: &'static str,
        make: impl Fn(&HtmlAudioElement, LoadId) -> AudioEvent + 'static,
    ) -> Result<()> {
        let element = self.element.clone();
        let load = Rc::clone(&self.current_load);
        let sink = Rc::clone(&self.sink);

        let listener = Listener::new(move || sink(make(&element, load.get())));
        self.element
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            .map_err(|e| PlaybackError::OutputUnavailable(js_error(&e)))?;
        self.listeners.push((name, listener));
        Ok(())
    }
}

impl AudioOutput for HtmlAudioOutput {
    fn load(&mut self, url: &str, load: LoadId) {
        self.current_load.set(load);
        self.element.set_src(url);
    }

    fn play(&mut self) -> Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::PlayRejected(js_error(&e)))?;

        // Autoplay refusals arrive through the promise, after this returns.
        // The shared handler is bound to this load; the bound function is
        // owned by JS.
        let load = JsValue::from_f64(self.current_load.get().as_f64());
        let handler: &Function = self.on_reject.as_ref().unchecked_ref();
        let bound = handler.bind1(&JsValue::NULL, &load);
        let attached = Reflect::get(&promise, &JsValue::from_str("catch"))
            .and_then(|catch| catch.dyn_into::<Function>())
            .and_then(|catch| catch.call1(&promise, &bound));
        if let Err(e) = attached {
            warn!("Could not watch play promise: {}", js_error(&e));
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            warn!("Pause failed: {}", js_error(&e));
        }
    }

    fn seek(&mut self, position: f64) {
        self.element.set_current_time(position);
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.element.set_playback_rate(rate);
    }

    fn set_looping(&mut self, looping: bool) {
        self.element.set_loop(looping);
    }
}

impl Drop for HtmlAudioOutput {
    fn drop(&mut self) {
        let _ = self.element.pause();
        for (name, listener) in &self.listeners {
            let _ = self
                .element
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
    }
}
