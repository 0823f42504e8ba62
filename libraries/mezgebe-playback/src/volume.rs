//! Volume and playback-rate clamping
//!
//! Volume is linear gain in `[0.0, 1.0]`, handed straight to the audio
//! output. Rate is a speed multiplier in `[0.2, 2.0]`.

pub const MIN_VOLUME: f64 = 0.0;
pub const MAX_VOLUME: f64 = 1.0;
pub const MIN_PLAYBACK_RATE: f64 = 0.2;
pub const MAX_PLAYBACK_RATE: f64 = 2.0;

/// Clamp a requested volume into range
///
/// NaN maps to full volume so the output never receives a non-number.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return MAX_VOLUME;
    }
    volume.clamp(MIN_VOLUME, MAX_VOLUME)
}

/// Clamp a requested playback rate into range
///
/// NaN maps to normal speed.
pub fn clamp_playback_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 1.0;
    }
    rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_clamps_to_unit_range() {
        assert_eq!(clamp_volume(-0.5), 0.0);
        assert_eq!(clamp_volume(0.4), 0.4);
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(f64::INFINITY), 1.0);
        assert_eq!(clamp_volume(f64::NAN), 1.0);
    }

    #[test]
    fn rate_clamps_to_supported_speeds() {
        assert_eq!(clamp_playback_rate(0.0), 0.2);
        assert_eq!(clamp_playback_rate(1.25), 1.25);
        assert_eq!(clamp_playback_rate(5.0), 2.0);
        assert_eq!(clamp_playback_rate(f64::NEG_INFINITY), 0.2);
        assert_eq!(clamp_playback_rate(f64::NAN), 1.0);
    }
}
