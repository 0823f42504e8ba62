//! Property-based tests for the coordinator
//!
//! Uses proptest to check queue and repeat invariants across random queue
//! sizes, positions and inputs.

mod common;

use common::{tracks, Harness};
use mezgebe_playback::{AudioEvent, RepeatMode};
use proptest::prelude::*;

/// Harness playing track `start` of a queue of `len`
fn playing(len: usize, start: usize) -> Harness {
    let mut h = Harness::new();
    let list = tracks(len);
    h.player.play_track(list[start].clone(), Some(list), None, None);
    h
}

fn queue_and_start() -> impl Strategy<Value = (usize, usize)> {
    (1usize..40).prop_flat_map(|len| (Just(len), 0..len))
}

proptest! {
    /// Property: next() N times returns to the starting index
    #[test]
    fn next_is_circular((len, start) in queue_and_start()) {
        let mut h = playing(len, start);

        for step in 1..=len {
            h.player.next();
            prop_assert_eq!(h.player.state().current_index(), Some((start + step) % len));
        }
        prop_assert_eq!(h.player.state().current_index(), Some(start));
    }

    /// Property: previous() near the start walks backwards circularly
    #[test]
    fn previous_is_circular((len, start) in queue_and_start()) {
        let mut h = playing(len, start);

        h.player.previous();
        prop_assert_eq!(h.player.state().current_index(), Some((start + len - 1) % len));
    }

    /// Property: repeat-one endings never move the cursor and always rewind
    #[test]
    fn repeat_one_is_idempotent(
        (len, start) in queue_and_start(),
        endings in 1usize..20,
        position in 0.0f64..3600.0,
    ) {
        let mut h = playing(len, start);
        h.player.toggle_repeat_mode(Some(RepeatMode::One));

        for _ in 0..endings {
            h.player.handle_event(AudioEvent::TimeUpdate { position });
            let load = h.last_load();
            h.player.handle_event(AudioEvent::Ended { load });
            prop_assert_eq!(h.player.state().current_index(), Some(start));
            prop_assert_eq!(h.player.state().current_time, 0.0);
        }
    }

    /// Property: repeat-off ending stops without moving the cursor
    #[test]
    fn repeat_off_terminates((len, start) in queue_and_start()) {
        let mut h = playing(len, start);

        let load = h.last_load();
        h.player.handle_event(AudioEvent::Ended { load });

        prop_assert!(!h.player.state().is_playing);
        prop_assert_eq!(h.player.state().current_index(), Some(start));
    }

    /// Property: previous() restarts strictly above 3s, navigates otherwise
    #[test]
    fn previous_threshold(
        (len, start) in (2usize..20).prop_flat_map(|len| (Just(len), 0..len)),
        position in 0.0f64..10.0,
    ) {
        let mut h = playing(len, start);
        h.player.handle_event(AudioEvent::TimeUpdate { position });

        h.player.previous();

        if position > 3.0 {
            prop_assert_eq!(h.player.state().current_time, 0.0);
            prop_assert_eq!(h.player.state().current_index(), Some(start));
        } else {
            prop_assert_eq!(h.player.state().current_index(), Some((start + len - 1) % len));
        }
    }

    /// Property: stored volume and rate always land in range
    #[test]
    fn levels_always_in_range(volume in any::<f64>(), rate in any::<f64>()) {
        let mut h = playing(1, 0);
        h.player.set_volume(volume);
        h.player.set_playback_rate(rate);

        let state = h.player.state();
        prop_assert!((0.0..=1.0).contains(&state.volume));
        prop_assert!((0.2..=2.0).contains(&state.playback_rate));
    }

    /// Property: in-range volumes are stored unchanged
    #[test]
    fn in_range_volume_is_exact(volume in 0.0f64..=1.0) {
        let mut h = playing(1, 0);
        h.player.set_volume(volume);
        prop_assert_eq!(h.player.state().volume, volume);
    }
}

#[test]
fn clamping_examples() {
    let mut h = playing(1, 0);

    h.player.set_volume(-1.0);
    assert_eq!(h.player.state().volume, 0.0);
    h.player.set_volume(5.0);
    assert_eq!(h.player.state().volume, 1.0);
    h.player.set_playback_rate(10.0);
    assert_eq!(h.player.state().playback_rate, 2.0);
    h.player.set_playback_rate(0.0);
    assert_eq!(h.player.state().playback_rate, 0.2);
}
