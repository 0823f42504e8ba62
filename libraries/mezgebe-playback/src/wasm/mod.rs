//! WASM bindings for mezgebe-playback
//!
//! Drives the coordinator from a browser: an `HTMLAudioElement` output,
//! a media session and wake lock delegated to JS callbacks, and the
//! exported [`WasmPlayer`].

pub mod output;
pub mod player;
pub mod session;
pub mod types;

pub use output::HtmlAudioOutput;
pub use player::WasmPlayer;
