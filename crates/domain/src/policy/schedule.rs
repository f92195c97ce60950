//! Lighting schedule — exact-minute matching against the configured times.
//!
//! The comparison is deliberately an equality on the truncated minute, not a
//! range check: a minute that is never observed (process paused, tick
//! skipped) simply does not fire.

use chrono::{Local, NaiveDate};

use crate::facility::FacilityState;
use crate::time::{TimeOfDay, Timestamp};

/// A lighting transition driven by the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledSwitch {
    LightsOn,
    LightsOff,
}

impl ScheduledSwitch {
    #[must_use]
    pub fn lights_on(self) -> bool {
        matches!(self, Self::LightsOn)
    }
}

/// Identifies one firing so that the same minute is not acted on twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Firing {
    pub date: NaiveDate,
    pub minute: TimeOfDay,
    pub switch: ScheduledSwitch,
}

/// Switches due at `minute`. Both fire (on first) when the two times are
/// equal.
#[must_use]
pub fn due(minute: TimeOfDay, on: TimeOfDay, off: TimeOfDay) -> Vec<ScheduledSwitch> {
    let mut switches = Vec::new();
    if minute == on {
        switches.push(ScheduledSwitch::LightsOn);
    }
    if minute == off {
        switches.push(ScheduledSwitch::LightsOff);
    }
    switches
}

/// Firings due for `state` at wall-clock time `now`; empty unless scheduling
/// is enabled.
#[must_use]
pub fn due_firings(state: &FacilityState, now: Timestamp) -> Vec<Firing> {
    if !state.schedule_enabled() {
        return Vec::new();
    }
    let date = now.with_timezone(&Local).date_naive();
    let minute = TimeOfDay::local_minute_of(now);
    due(minute, state.lights_on_time(), state.lights_off_time())
        .into_iter()
        .map(|switch| Firing {
            date,
            minute,
            switch,
        })
        .collect()
}
