//! Circular playback queue
//!
//! The queue is the ordered list `next`/`previous` walk. It is replaced
//! wholesale when playback starts from a new context and never edited in
//! place: the visible playlist lives in [`PlaybackContext`] instead.
//!
//! [`PlaybackContext`]: crate::types::PlaybackContext

use mezgebe_core::{Track, TrackId};
use serde::Serialize;

/// Ordered tracks plus a cursor
///
/// Invariant: `current` is `None` or a valid index into `tracks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents and point the cursor at `current_id`
    ///
    /// The cursor is `None` when the id is not in `tracks`.
    pub fn replace(&mut self, tracks: Vec<Track>, current_id: &TrackId) {
        self.tracks = tracks;
        self.locate(current_id);
    }

    /// Move the cursor to the first track with `id`
    pub fn locate(&mut self, id: &TrackId) {
        self.current = self.tracks.iter().position(|t| t.id() == id);
    }

    /// Point the cursor at `index`, or clear it when out of range
    pub fn set_current(&mut self, index: usize) {
        self.current = (index < self.tracks.len()).then_some(index);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Index after the cursor, wrapping to 0
    ///
    /// `None` when the queue is empty or the cursor is unset.
    pub fn next_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        self.current
            .filter(|_| len > 0)
            .map(|i| (i + 1) % len)
    }

    /// Index before the cursor, wrapping to the last track
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        self.current
            .filter(|_| len > 0)
            .map(|i| (i + len - 1) % len)
    }

    /// Move the cursor forward (circular) and return the new current track
    pub fn advance(&mut self) -> Option<&Track> {
        let index = self.next_index()?;
        self.current = Some(index);
        self.tracks.get(index)
    }

    /// Move the cursor backward (circular) and return the new current track
    pub fn retreat(&mut self) -> Option<&Track> {
        let index = self.previous_index()?;
        self.current = Some(index);
        self.tracks.get(index)
    }
}
