//! End-of-track policy

use crate::queue::Queue;
use crate::types::RepeatMode;

/// What to do when the output reports the current track ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTrack {
    /// Seek to 0 and play again
    ///
    /// Only reached when native looping did not take effect.
    Restart,

    /// Load and play the track at this queue index
    Advance(usize),

    /// Stop; the position stays where it is
    Stop,
}

/// Decide the end-of-track action for `mode` over `queue`
///
/// `All` needs a non-empty queue with a valid cursor; otherwise it
/// degrades to `Stop` like `Off`.
pub fn on_track_end(mode: RepeatMode, queue: &Queue) -> EndOfTrack {
    match mode {
        RepeatMode::One => EndOfTrack::Restart,
        RepeatMode::All => queue.next_index().map_or(EndOfTrack::Stop, EndOfTrack::Advance),
        RepeatMode::Off => EndOfTrack::Stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mezgebe_core::{Track, TrackId};

    fn queue_of(n: usize, current: &str) -> Queue {
        let tracks = (0..n)
            .map(|i| Track::new(format!("t{i}"), format!("T{i}"), format!("https://h/{i}.mp3")))
            .collect();
        let mut queue = Queue::new();
        queue.replace(tracks, &TrackId::from(current));
        queue
    }

    #[test]
    fn repeat_one_restarts() {
        assert_eq!(on_track_end(RepeatMode::One, &queue_of(3, "t1")), EndOfTrack::Restart);
    }

    #[test]
    fn repeat_all_advances_and_wraps() {
        assert_eq!(on_track_end(RepeatMode::All, &queue_of(3, "t1")), EndOfTrack::Advance(2));
        assert_eq!(on_track_end(RepeatMode::All, &queue_of(3, "t2")), EndOfTrack::Advance(0));
    }

    #[test]
    fn repeat_all_without_cursor_stops() {
        assert_eq!(on_track_end(RepeatMode::All, &queue_of(3, "missing")), EndOfTrack::Stop);
        assert_eq!(on_track_end(RepeatMode::All, &Queue::new()), EndOfTrack::Stop);
    }

    #[test]
    fn repeat_off_stops_even_mid_queue() {
        assert_eq!(on_track_end(RepeatMode::Off, &queue_of(3, "t0")), EndOfTrack::Stop);
    }
}
