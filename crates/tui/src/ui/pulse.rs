//! Idle pulse on inactive menu icons.

use std::f32::consts::PI;
use std::time::Duration;

pub const FIRST_PULSE: Duration = Duration::from_secs(2);
pub const PULSE_INTERVAL: Duration = Duration::from_secs(6);
pub const PULSE_LENGTH: Duration = Duration::from_secs(2);
pub const PULSE_STAGGER: Duration = Duration::from_millis(300);

/// Pulse intensity in `0.0..=1.0` for icon `index`, `elapsed` after start-up.
///
/// Each pulse rises and falls over [`PULSE_LENGTH`]; icons further right
/// start [`PULSE_STAGGER`] later than their left neighbour.
pub fn pulse_level(elapsed: Duration, index: usize) -> f32 {
    let stagger = PULSE_STAGGER.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
    let delay = FIRST_PULSE.saturating_add(stagger);
    let Some(since_first) = elapsed.checked_sub(delay) else {
        return 0.0;
    };
    let phase = since_first.as_millis() % PULSE_INTERVAL.as_millis();
    if phase >= PULSE_LENGTH.as_millis() {
        return 0.0;
    }
    (PI * phase as f32 / PULSE_LENGTH.as_millis() as f32).sin()
}

/// Whether any icon could be mid-pulse; used to keep the fast ticker running.
pub fn any_pulse_active(elapsed: Duration, icons: usize) -> bool {
    (0..icons).any(|index| pulse_level(elapsed, index) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn first_pulse_waits_two_seconds() {
        assert_eq!(pulse_level(ms(1_999), 0), 0.0);
        assert_eq!(pulse_level(ms(2_000), 0), 0.0);
        assert!((pulse_level(ms(3_000), 0) - 1.0).abs() < 1e-6);
        assert_eq!(pulse_level(ms(4_000), 0), 0.0);
        assert_eq!(pulse_level(ms(7_000), 0), 0.0);
    }

    #[test]
    fn repeats_every_six_seconds_with_stagger() {
        assert!((pulse_level(ms(9_000), 0) - 1.0).abs() < 1e-6);
        assert_eq!(pulse_level(ms(2_200), 1), 0.0);
        assert!((pulse_level(ms(3_300), 1) - 1.0).abs() < 1e-6);
        assert!((pulse_level(ms(3_600), 2) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn activity_covers_any_icon() {
        assert!(!any_pulse_active(ms(1_000), 4));
        assert!(any_pulse_active(ms(2_500), 4));
        assert!(!any_pulse_active(ms(5_000), 4));
    }
}
