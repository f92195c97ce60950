//! Mode controller — operating-mode transitions and macros.

use std::sync::Arc;

use facility_domain::error::FacilityError;
use facility_domain::macros::MacroBook;
use facility_domain::mode::OperatingMode;

use crate::actuation::Actuator;
use crate::event_log::EventLog;
use crate::ports::DeviceGateway;
use crate::state::SharedState;

/// Applies operating modes and named macros to the facility.
#[derive(Clone)]
pub struct ModeController<G> {
    state: SharedState,
    log: Arc<EventLog>,
    actuator: Actuator<G>,
    macros: Arc<MacroBook>,
}

impl<G: DeviceGateway> ModeController<G> {
    pub fn new(state: SharedState, log: Arc<EventLog>, actuator: Actuator<G>) -> Self {
        Self {
            state,
            log,
            actuator,
            macros: Arc::new(MacroBook::default()),
        }
    }

    #[must_use]
    pub fn macros(&self) -> &MacroBook {
        &self.macros
    }

    /// Switch to `mode`. Every flag of the previous mode is replaced; entering
    /// energy saving forces the 18–23 °C band and switches the lights off.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::Transport`] when the lights could not be
    /// switched off. The mode change itself has been applied and logged.
    #[tracing::instrument(skip(self), fields(mode = %mode))]
    pub async fn set_mode(&self, mode: OperatingMode) -> Result<(), FacilityError> {
        self.state.update(|s| s.apply_mode(mode));
        let lights = if mode == OperatingMode::EnergySaving {
            self.actuator.set_lights(false).await
        } else {
            Ok(())
        };
        self.log.info(format!("Mode changed to {mode}"));
        lights?;
        Ok(())
    }

    /// Turn scheduling on (schedule mode) or off (manual mode).
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the error type of [`Self::set_mode`].
    pub async fn set_schedule_enabled(&self, enabled: bool) -> Result<(), FacilityError> {
        let mode = if enabled {
            OperatingMode::Schedule
        } else {
            OperatingMode::Manual
        };
        self.set_mode(mode).await?;
        self.log.info(if enabled {
            "Scheduled mode enabled"
        } else {
            "Scheduled mode disabled"
        });
        Ok(())
    }

    /// Apply the macro called `name`: lights, then temperature, then door.
    ///
    /// Every step runs even if an earlier device command failed.
    ///
    /// # Errors
    ///
    /// Returns [`FacilityError::Validation`] for an unknown name, before
    /// anything is touched. Otherwise returns the first transport failure,
    /// with all steps applied to the state.
    #[tracing::instrument(skip(self))]
    pub async fn apply_macro(&self, name: &str) -> Result<(), FacilityError> {
        let target = *self.macros.get(name)?;

        let lights = self.actuator.set_lights(target.lights_on).await;
        self.state
            .update(|s| s.set_current_temp(target.temperature));
        let door = self.actuator.set_door(target.door_open).await;

        self.log.info(format!("Applied macro: {}", target.name));
        lights?;
        door?;
        Ok(())
    }
}
