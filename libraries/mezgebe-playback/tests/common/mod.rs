//! Shared test doubles for coordinator tests
#![allow(dead_code)]

use mezgebe_core::Track;
use mezgebe_playback::{
    AudioOutput, Coordinator, LoadId, MediaMetadata, MediaSession, PlaybackError, PlayerConfig,
    PositionState, Result, SessionPlaybackState, WakeLock,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Everything the mock output was told to do
#[derive(Debug, Default)]
pub struct OutputLog {
    pub created: usize,
    pub loads: Vec<(String, LoadId)>,
    pub plays: usize,
    pub pauses: usize,
    pub seeks: Vec<f64>,
    pub volume: Option<f64>,
    pub rate: Option<f64>,
    pub looping: bool,
    pub reject_play: Option<String>,
}

pub struct MockOutput {
    log: Rc<RefCell<OutputLog>>,
}

impl AudioOutput for MockOutput {
    fn load(&mut self, url: &str, load: LoadId) {
        self.log.borrow_mut().loads.push((url.to_string(), load));
    }

    fn play(&mut self) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.plays += 1;
        match &log.reject_play {
            Some(reason) => Err(PlaybackError::PlayRejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn pause(&mut self) {
        self.log.borrow_mut().pauses += 1;
    }

    fn seek(&mut self, position: f64) {
        self.log.borrow_mut().seeks.push(position);
    }

    fn set_volume(&mut self, volume: f64) {
        self.log.borrow_mut().volume = Some(volume);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.log.borrow_mut().rate = Some(rate);
    }

    fn set_looping(&mut self, looping: bool) {
        self.log.borrow_mut().looping = looping;
    }
}

#[derive(Debug, Default)]
pub struct SessionLog {
    pub actions: Vec<&'static str>,
    pub cleared: usize,
    pub metadata: Vec<MediaMetadata>,
    pub states: Vec<SessionPlaybackState>,
    pub positions: Vec<PositionState>,
}

pub struct RecordingSession(pub Rc<RefCell<SessionLog>>);

impl MediaSession for RecordingSession {
    fn set_action_handlers(&mut self, actions: &[&'static str]) {
        self.0.borrow_mut().actions = actions.to_vec();
    }

    fn clear_action_handlers(&mut self) {
        let mut log = self.0.borrow_mut();
        log.actions.clear();
        log.cleared += 1;
    }

    fn set_metadata(&mut self, metadata: MediaMetadata) {
        self.0.borrow_mut().metadata.push(metadata);
    }

    fn set_playback_state(&mut self, state: SessionPlaybackState) {
        self.0.borrow_mut().states.push(state);
    }

    fn set_position_state(&mut self, position: PositionState) {
        self.0.borrow_mut().positions.push(position);
    }
}

/// Tracks whether the lock is held
pub struct RecordingWakeLock(pub Rc<RefCell<bool>>);

impl WakeLock for RecordingWakeLock {
    fn request(&mut self) {
        *self.0.borrow_mut() = true;
    }

    fn release(&mut self) {
        *self.0.borrow_mut() = false;
    }
}

pub struct Harness {
    pub player: Coordinator,
    pub output: Rc<RefCell<OutputLog>>,
    pub session: Rc<RefCell<SessionLog>>,
    pub wake_lock: Rc<RefCell<bool>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        let output = Rc::new(RefCell::new(OutputLog::default()));
        let session = Rc::new(RefCell::new(SessionLog::default()));
        let wake_lock = Rc::new(RefCell::new(false));

        let factory_log = Rc::clone(&output);
        let player = Coordinator::new(
            config,
            Box::new(move || {
                factory_log.borrow_mut().created += 1;
                Ok(Box::new(MockOutput {
                    log: Rc::clone(&factory_log),
                }) as Box<dyn AudioOutput>)
            }),
        )
        .with_media_session(Box::new(RecordingSession(Rc::clone(&session))))
        .with_wake_lock(Box::new(RecordingWakeLock(Rc::clone(&wake_lock))));

        Self {
            player,
            output,
            session,
            wake_lock,
        }
    }

    /// Most recent load id handed to the output
    pub fn last_load(&self) -> LoadId {
        self.output.borrow().loads.last().map(|(_, id)| *id).unwrap_or_default()
    }

    pub fn last_url(&self) -> String {
        self.output
            .borrow()
            .loads
            .last()
            .map(|(url, _)| url.clone())
            .unwrap_or_default()
    }

    pub fn current_id(&self) -> Option<String> {
        self.player
            .state()
            .current_track
            .as_ref()
            .map(|t| t.id().to_string())
    }
}

pub fn track(id: &str) -> Track {
    Track::new(id, format!("Track {id}"), format!("https://www.ethiopianorthodox.org/audio/{id}.mp3"))
        .with_location(3, 12)
}

pub fn tracks(n: usize) -> Vec<Track> {
    (0..n).map(|i| track(&format!("t{i}"))).collect()
}
