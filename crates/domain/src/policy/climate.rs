//! Climate regulation — keep the temperature inside the configured band.
//!
//! Lights double as the heating proxy: too cold turns them on, too warm turns
//! them off.

use serde::{Deserialize, Serialize};

use crate::facility::FacilityState;

/// Humidity readings are clamped to this band (percent).
pub const HUMIDITY_BAND: (f64, f64) = (30.0, 70.0);

/// One temperature/humidity sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
}

impl ClimateReading {
    /// The same reading with humidity clamped to [`HUMIDITY_BAND`].
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            temperature: self.temperature,
            humidity: self.humidity.clamp(HUMIDITY_BAND.0, HUMIDITY_BAND.1),
        }
    }
}

/// What the climate monitor should do after a reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimateAction {
    /// Below the band: switch lights on.
    Heat { temperature: f64 },
    /// Above the band: switch lights off.
    Cool { temperature: f64 },
}

impl ClimateAction {
    /// Lighting flag that carries out this action.
    #[must_use]
    pub fn lights_on(self) -> bool {
        matches!(self, Self::Heat { .. })
    }
}

/// Decide whether the current temperature needs correcting. Only acts while
/// auto-regulation is enabled; inside the band nothing happens.
#[must_use]
pub fn regulate(state: &FacilityState) -> Option<ClimateAction> {
    if !state.auto_regulation() {
        return None;
    }
    let temperature = state.current_temp();
    if temperature < state.temp_min() {
        Some(ClimateAction::Heat { temperature })
    } else if temperature > state.temp_max() {
        Some(ClimateAction::Cool { temperature })
    } else {
        None
    }
}
