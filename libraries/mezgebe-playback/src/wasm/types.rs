//! Conversions between JS values and playback types

use crate::types::{PlaybackSource, RepeatMode};
use mezgebe_core::Track;
use wasm_bindgen::JsValue;

/// Best-effort message from a thrown JS value
pub fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Track from a catalog-shaped JS object
pub fn track_from_js(value: JsValue) -> Result<Track, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Optional track list; `undefined` and `null` mean "not supplied"
pub fn tracks_from_js(value: JsValue) -> Result<Option<Vec<Track>>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Source from its kind label and optional id ("day" + "3-12", ...)
pub fn parse_source(kind: &str, id: Option<String>) -> Result<PlaybackSource, JsValue> {
    match (kind, id) {
        ("queue", _) => Ok(PlaybackSource::Queue),
        ("search", _) => Ok(PlaybackSource::Search),
        ("day", Some(id)) => Ok(PlaybackSource::Day(id)),
        ("playlist", Some(id)) => Ok(PlaybackSource::Playlist(id)),
        ("day" | "playlist", None) => Err(JsValue::from_str("Source kind requires an id")),
        _ => Err(JsValue::from_str(
            "Invalid source. Use 'queue', 'search', 'day', or 'playlist'",
        )),
    }
}

pub fn parse_repeat_mode(mode: &str) -> Result<RepeatMode, JsValue> {
    match mode {
        "off" => Ok(RepeatMode::Off),
        "one" => Ok(RepeatMode::One),
        "all" => Ok(RepeatMode::All),
        _ => Err(JsValue::from_str("Invalid repeat mode. Use 'off', 'one', or 'all'")),
    }
}
