//! Property-based tests for the facility state invariants.
//!
//! Each property holds for arbitrary inputs, not just the hand-picked values
//! of the unit tests.

use chrono::TimeDelta;
use facility_domain::error::ValidationError;
use facility_domain::facility::FacilityState;
use facility_domain::policy::energy::DEFAULT_SCALING;
use facility_domain::time::{TimeOfDay, now};
use proptest::prelude::*;

/// Bounds that must be rejected: `min >= max`, or a non-finite value.
fn invalid_range() -> impl Strategy<Value = (f64, f64)> {
    prop_oneof![
        4 => (-1000.0f64..1000.0, 0.0f64..500.0).prop_map(|(max, gap)| (max + gap, max)),
        1 => (-1000.0f64..1000.0).prop_map(|t| (t, t)),
        1 => (-1000.0f64..1000.0).prop_map(|t| (f64::NAN, t)),
        1 => (-1000.0f64..1000.0).prop_map(|t| (t, f64::INFINITY)),
        1 => (-1000.0f64..1000.0).prop_map(|t| (f64::NEG_INFINITY, t)),
    ]
}

/// Text that is not a 24-hour `H:MM`/`HH:MM` time.
fn malformed_time() -> impl Strategy<Value = String> {
    prop_oneof![
        "(2[4-9]|[3-9][0-9]):[0-5][0-9]",
        "([01]?[0-9]|2[0-3]):[6-9][0-9]",
        "[0-9]{0,6}",
        "[0-9]{3,4}:[0-9]{1,2}",
        "[0-9]{1,2}:[0-9]{3,4}",
        "[0-9]{1,2}:",
        ":[0-9]{1,2}",
        "[0-9]{1,2}:[0-9]{1,2}[^0-9]{1,3}",
        "[^0-9]{1,3}[0-9]{1,2}:[0-9]{1,2}",
        "[0-9]{1,2}:[0-9]{1,2}:[0-9]{1,2}",
        "[a-zA-Z ]{0,8}",
    ]
}

/// One step of device activity followed by an energy sample.
#[derive(Debug, Clone)]
struct Step {
    lights_on: bool,
    door_open: bool,
    /// Seconds since the previous sample; negative means the clock stepped
    /// back.
    elapsed_secs: i64,
}

fn step() -> impl Strategy<Value = Step> {
    (any::<bool>(), any::<bool>(), -600i64..7200).prop_map(
        |(lights_on, door_open, elapsed_secs)| Step {
            lights_on,
            door_open,
            elapsed_secs,
        },
    )
}

proptest! {
    /// An invalid band is rejected and the previous band survives.
    #[test]
    fn should_reject_every_invalid_temperature_range((min, max) in invalid_range()) {
        let mut state = FacilityState::new(now());
        state.set_temperature_range(19.0, 24.0).unwrap();

        let result = state.set_temperature_range(min, max);

        prop_assert!(
            matches!(result, Err(ValidationError::InvalidRange { .. })),
            "accepted {min}..{max}"
        );
        prop_assert_eq!(state.temp_min(), 19.0);
        prop_assert_eq!(state.temp_max(), 24.0);
    }

    /// Every finite band with `min < max` is accepted as given.
    #[test]
    fn should_accept_every_ordered_range(min in -1000.0f64..1000.0, gap in 0.001f64..500.0) {
        let max = min + gap;
        prop_assume!(min < max);
        let mut state = FacilityState::new(now());
        prop_assert!(state.set_temperature_range(min, max).is_ok());
        prop_assert_eq!(state.temp_min(), min);
        prop_assert_eq!(state.temp_max(), max);
    }

    /// Malformed schedule times never parse.
    #[test]
    fn should_reject_every_malformed_time(text in malformed_time()) {
        prop_assert_eq!(
            text.parse::<TimeOfDay>(),
            Err(ValidationError::InvalidTimeFormat { value: text.clone() })
        );
    }

    /// Well-formed times parse and display zero-padded.
    #[test]
    fn should_parse_every_well_formed_time(hour in 0u8..24, minute in 0u8..60, pad in any::<bool>()) {
        let text = if pad {
            format!("{hour:02}:{minute:02}")
        } else {
            format!("{hour}:{minute}")
        };
        let parsed: TimeOfDay = text.parse().unwrap();
        prop_assert_eq!(parsed.to_string(), format!("{hour:02}:{minute:02}"));
    }

    /// Accrued energy never decreases, whatever the device activity and clock.
    #[test]
    fn should_never_decrease_energy(steps in prop::collection::vec(step(), 1..40)) {
        let start = now();
        let mut state = FacilityState::new(start);
        let mut clock = start;
        let mut previous = state.energy_usage_kwh();

        for step in steps {
            state.set_lights(step.lights_on);
            state.set_door(step.door_open, clock);
            clock += TimeDelta::seconds(step.elapsed_secs);
            let added = state.accrue_energy(clock, DEFAULT_SCALING);

            prop_assert!(added >= 0.0);
            prop_assert!(state.energy_usage_kwh() >= previous);
            previous = state.energy_usage_kwh();
        }
    }
}
