//! Energy accounting — integrate a simulated load over elapsed time.

use crate::time::Timestamp;

/// kWh per load-unit-hour.
pub const DEFAULT_SCALING: f64 = 0.1;

/// Relative power draw: lights dominate, standby otherwise, door relay adds a
/// fixed share while energised.
#[must_use]
pub fn load_factor(lights_on: bool, door_open: bool) -> f64 {
    let lights = if lights_on { 1.0 } else { 0.2 };
    let door = if door_open { 0.5 } else { 0.0 };
    lights + door
}

/// Hours between two samples, never negative.
#[must_use]
pub fn elapsed_hours(since: Timestamp, now: Timestamp) -> f64 {
    let millis = (now - since).num_milliseconds().max(0);
    #[allow(clippy::cast_precision_loss)]
    let hours = millis as f64 / 3_600_000.0;
    hours
}

/// Energy added over `elapsed_hours` at `load`, never negative.
#[must_use]
pub fn increment(load: f64, elapsed_hours: f64, scaling: f64) -> f64 {
    (load * elapsed_hours * scaling).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;
    use chrono::TimeDelta;

    #[test]
    fn should_compute_load_for_every_combination() {
        assert!((load_factor(false, false) - 0.2).abs() < 1e-12);
        assert!((load_factor(true, false) - 1.0).abs() < 1e-12);
        assert!((load_factor(false, true) - 0.7).abs() < 1e-12);
        assert!((load_factor(true, true) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn should_convert_elapsed_time_to_hours() {
        let t0 = now();
        assert!((elapsed_hours(t0, t0 + TimeDelta::minutes(90)) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn should_clamp_negative_elapsed_time_to_zero() {
        let t0 = now();
        assert!(elapsed_hours(t0, t0 - TimeDelta::minutes(5)).abs() < f64::EPSILON);
    }

    #[test]
    fn should_scale_increment() {
        assert!((increment(1.5, 2.0, DEFAULT_SCALING) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn should_keep_standby_consumption_for_one_minute_tick() {
        let one_minute = 1.0 / 60.0;
        let inc = increment(load_factor(false, false), one_minute, DEFAULT_SCALING);
        assert!(inc > 0.0);
    }
}
