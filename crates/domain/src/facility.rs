//! Facility state — the single record of truth for lighting, door, climate,
//! energy and mode.
//!
//! Fields are private so that every mutation goes through a method that keeps
//! the cross-field invariants:
//!
//! - `temp_min < temp_max`, both finite
//! - `door_open` ⇔ `door_opened_at.is_some()`, with the timestamp taken on the
//!   closed → open transition only
//! - `energy_usage_kwh` never decreases
//! - `current_humidity` stays within the sensor band

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mode::OperatingMode;
use crate::policy::climate::ClimateReading;
use crate::policy::energy;
use crate::time::{TimeOfDay, Timestamp};

/// Temperature band forced when entering [`OperatingMode::EnergySaving`].
pub const ENERGY_SAVING_RANGE: (f64, f64) = (18.0, 23.0);

const DEFAULT_LIGHTS_ON: TimeOfDay = TimeOfDay::new(7, 0).unwrap();
const DEFAULT_LIGHTS_OFF: TimeOfDay = TimeOfDay::new(19, 0).unwrap();

/// Shared facility record. One instance lives for the whole process.
#[derive(Debug, Clone)]
pub struct FacilityState {
    lights_on: bool,
    door_open: bool,
    door_opened_at: Option<Timestamp>,
    current_temp: f64,
    current_humidity: f64,
    temp_min: f64,
    temp_max: f64,
    mode: OperatingMode,
    lights_on_time: TimeOfDay,
    lights_off_time: TimeOfDay,
    energy_usage_kwh: f64,
    last_energy_sample_at: Timestamp,
    connected: bool,
}

impl FacilityState {
    /// Start-up state: everything off, 22 °C / 45 %, band 20–25 °C,
    /// lights scheduled 07:00–19:00, manual mode.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self {
            lights_on: false,
            door_open: false,
            door_opened_at: None,
            current_temp: 22.0,
            current_humidity: 45.0,
            temp_min: 20.0,
            temp_max: 25.0,
            mode: OperatingMode::Manual,
            lights_on_time: DEFAULT_LIGHTS_ON,
            lights_off_time: DEFAULT_LIGHTS_OFF,
            energy_usage_kwh: 0.0,
            last_energy_sample_at: now,
            connected: false,
        }
    }

    #[must_use]
    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    #[must_use]
    pub fn door_open(&self) -> bool {
        self.door_open
    }

    #[must_use]
    pub fn door_opened_at(&self) -> Option<Timestamp> {
        self.door_opened_at
    }

    #[must_use]
    pub fn current_temp(&self) -> f64 {
        self.current_temp
    }

    #[must_use]
    pub fn current_humidity(&self) -> f64 {
        self.current_humidity
    }

    #[must_use]
    pub fn temp_min(&self) -> f64 {
        self.temp_min
    }

    #[must_use]
    pub fn temp_max(&self) -> f64 {
        self.temp_max
    }

    #[must_use]
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    #[must_use]
    pub fn lights_on_time(&self) -> TimeOfDay {
        self.lights_on_time
    }

    #[must_use]
    pub fn lights_off_time(&self) -> TimeOfDay {
        self.lights_off_time
    }

    /// Derived from the mode; never stored separately.
    #[must_use]
    pub fn schedule_enabled(&self) -> bool {
        self.mode.scheduling()
    }

    /// Derived from the mode; never stored separately.
    #[must_use]
    pub fn auto_regulation(&self) -> bool {
        self.mode.auto_regulation()
    }

    #[must_use]
    pub fn energy_usage_kwh(&self) -> f64 {
        self.energy_usage_kwh
    }

    #[must_use]
    pub fn last_energy_sample_at(&self) -> Timestamp {
        self.last_energy_sample_at
    }

    #[must_use]
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Current temperature and humidity as one reading.
    #[must_use]
    pub fn reading(&self) -> ClimateReading {
        ClimateReading {
            temperature: self.current_temp,
            humidity: self.current_humidity,
        }
    }

    pub fn set_lights(&mut self, on: bool) {
        self.lights_on = on;
    }

    /// Record the door relay position. The open timestamp is only taken on a
    /// closed → open transition, so re-opening an open door keeps the
    /// original deadline.
    pub fn set_door(&mut self, open: bool, now: Timestamp) {
        match (self.door_open, open) {
            (false, true) => self.door_opened_at = Some(now),
            (_, false) => self.door_opened_at = None,
            (true, true) => {}
        }
        self.door_open = open;
    }

    /// Store a new sensor reading; humidity is clamped to the sensor band.
    pub fn record_reading(&mut self, reading: ClimateReading) {
        let reading = reading.clamped();
        self.current_temp = reading.temperature;
        self.current_humidity = reading.humidity;
    }

    /// Overwrite the temperature directly (macros skip any ramp).
    pub fn set_current_temp(&mut self, temperature: f64) {
        self.current_temp = temperature;
    }

    /// Replace the regulation band.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] when `min >= max` or either
    /// bound is not finite; the previous band is kept.
    pub fn set_temperature_range(&mut self, min: f64, max: f64) -> Result<(), ValidationError> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ValidationError::InvalidRange { min, max });
        }
        self.temp_min = min;
        self.temp_max = max;
        Ok(())
    }

    pub fn set_schedule(&mut self, on: TimeOfDay, off: TimeOfDay) {
        self.lights_on_time = on;
        self.lights_off_time = off;
    }

    /// Switch mode, replacing every flag of the previous mode. Entering
    /// [`OperatingMode::EnergySaving`] also forces [`ENERGY_SAVING_RANGE`].
    /// Re-entering the current mode reapplies the same effects.
    pub fn apply_mode(&mut self, mode: OperatingMode) {
        self.mode = mode;
        if mode == OperatingMode::EnergySaving {
            (self.temp_min, self.temp_max) = ENERGY_SAVING_RANGE;
        }
    }

    /// Integrate the load since the last sample and move the sample time to
    /// `now`. Returns the energy added, in kWh.
    pub fn accrue_energy(&mut self, now: Timestamp, scaling: f64) -> f64 {
        let load = energy::load_factor(self.lights_on, self.door_open);
        let elapsed = energy::elapsed_hours(self.last_energy_sample_at, now);
        let increment = energy::increment(load, elapsed, scaling);
        self.energy_usage_kwh += increment;
        self.last_energy_sample_at = now;
        increment
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Immutable copy handed to the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> FacilitySnapshot {
        FacilitySnapshot {
            lights_on: self.lights_on,
            door_open: self.door_open,
            door_opened_at: self.door_opened_at,
            current_temp: self.current_temp,
            current_humidity: self.current_humidity,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            mode: self.mode,
            auto_regulation: self.auto_regulation(),
            schedule_enabled: self.schedule_enabled(),
            lights_on_time: self.lights_on_time,
            lights_off_time: self.lights_off_time,
            energy_usage_kwh: self.energy_usage_kwh,
            last_energy_sample_at: self.last_energy_sample_at,
            connected: self.connected,
        }
    }
}

/// Read-only copy of [`FacilityState`], including the derived flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySnapshot {
    pub lights_on: bool,
    pub door_open: bool,
    pub door_opened_at: Option<Timestamp>,
    pub current_temp: f64,
    pub current_humidity: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub mode: OperatingMode,
    pub auto_regulation: bool,
    pub schedule_enabled: bool,
    pub lights_on_time: TimeOfDay,
    pub lights_off_time: TimeOfDay,
    pub energy_usage_kwh: f64,
    pub last_energy_sample_at: Timestamp,
    pub connected: bool,
}
