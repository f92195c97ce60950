//! Facility service — the command/query API consumed by the presentation
//! layer.
//!
//! Validation failures are returned before any state changes. Transport
//! failures are returned *after* the logical state has been updated and the
//! failure has been written to the event log.

use std::sync::Arc;

use tokio::sync::broadcast;

use facility_domain::error::FacilityError;
use facility_domain::event::LogEntry;
use facility_domain::facility::{FacilitySnapshot, FacilityState};
use facility_domain::macros::MacroBook;
use facility_domain::mode::OperatingMode;
use facility_domain::time::TimeOfDay;

use crate::actuation::{Actuator, error_chain};
use crate::event_log::EventLog;
use crate::ports::DeviceGateway;
use crate::services::mode_controller::ModeController;
use crate::state::SharedState;

/// Operator commands and state queries.
#[derive(Clone)]
pub struct FacilityService<G> {
    state: SharedState,
    log: Arc<EventLog>,
    actuator: Actuator<G>,
    modes: ModeController<G>,
}

impl<G: DeviceGateway + Clone> FacilityService<G> {
    /// Build the service and the actuator it shares with the monitors.
    pub fn new(gateway: G, state: SharedState, log: Arc<EventLog>) -> Self {
        let actuator = Actuator::new(gateway, state.clone(), Arc::clone(&log));
        let modes = ModeController::new(state.clone(), Arc::clone(&log), actuator.clone());
        Self {
            state,
            log,
            actuator,
            modes,
        }
    }

    /// Actuator to hand to the monitors, so they drive the same devices.
    #[must_use]
    pub fn actuator(&self) -> &Actuator<G> {
        &self.actuator
    }

    #[must_use]
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    #[must_use]
    pub fn event_log(&self) -> &Arc<EventLog> {
        &self.log
    }

    #[must_use]
    pub fn macros(&self) -> &MacroBook {
        self.modes.macros()
    }

    // ── Commands ───────────────────────────────────────────────────

    /// See [`ModeController::set_mode`].
    ///
    /// # Errors
    ///
    /// Returns a transport error when entering energy saving could not switch
    /// the lights off.
    pub async fn set_mode(&self, mode: OperatingMode) -> Result<(), FacilityError> {
        self.modes.set_mode(mode).await
    }

    /// See [`ModeController::set_schedule_enabled`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_mode`].
    pub async fn set_schedule_enabled(&self, enabled: bool) -> Result<(), FacilityError> {
        self.modes.set_schedule_enabled(enabled).await
    }

    /// See [`ModeController::apply_macro`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown macro, or the first
    /// transport failure.
    pub async fn apply_macro(&self, name: &str) -> Result<(), FacilityError> {
        self.modes.apply_macro(name).await
    }

    /// Replace the lighting schedule. Both times must parse before either is
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeFormat`](facility_domain::error::ValidationError::InvalidTimeFormat)
    /// for the first time that does not parse.
    #[tracing::instrument(skip(self))]
    pub fn set_schedule(&self, on: &str, off: &str) -> Result<(), FacilityError> {
        let on: TimeOfDay = on.parse()?;
        let off: TimeOfDay = off.parse()?;
        self.state.update(|s| s.set_schedule(on, off));
        self.log.info(format!(
            "Schedule updated: Lights ON at {on}, OFF at {off}"
        ));
        Ok(())
    }

    /// Replace the regulation band.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`](facility_domain::error::ValidationError::InvalidRange)
    /// when `min >= max` or a bound is not finite.
    #[tracing::instrument(skip(self))]
    pub fn set_temperature_range(&self, min: f64, max: f64) -> Result<(), FacilityError> {
        self.state.update(|s| s.set_temperature_range(min, max))?;
        self.log.info(format!(
            "Temperature range set: {min:.1}°C to {max:.1}°C"
        ));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the transport failure; `lights_on` is set regardless.
    pub async fn manual_lights_on(&self) -> Result<(), FacilityError> {
        self.actuator.set_lights(true).await.map_err(FacilityError::from)
    }

    /// # Errors
    ///
    /// Returns the transport failure; `lights_on` is cleared regardless.
    pub async fn manual_lights_off(&self) -> Result<(), FacilityError> {
        self.actuator.set_lights(false).await.map_err(FacilityError::from)
    }

    /// # Errors
    ///
    /// Returns the transport failure; `door_open` is set regardless.
    pub async fn manual_door_open(&self) -> Result<(), FacilityError> {
        self.actuator.set_door(true).await.map_err(FacilityError::from)
    }

    /// # Errors
    ///
    /// Returns the transport failure; `door_open` is cleared regardless.
    pub async fn manual_door_close(&self) -> Result<(), FacilityError> {
        self.actuator.set_door(false).await.map_err(FacilityError::from)
    }

    /// Lights on, then door open.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure; both steps are attempted.
    pub async fn all_systems_on(&self) -> Result<(), FacilityError> {
        self.log.info("Activating all systems...");
        let lights = self.actuator.set_lights(true).await;
        let door = self.actuator.set_door(true).await;
        lights?;
        door?;
        Ok(())
    }

    /// Lights off, then door closed.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure; both steps are attempted.
    pub async fn all_systems_off(&self) -> Result<(), FacilityError> {
        self.log.info("Deactivating all systems...");
        let lights = self.actuator.set_lights(false).await;
        let door = self.actuator.set_door(false).await;
        lights?;
        door?;
        Ok(())
    }

    /// Probe both device channels and record the outcome in `connected`.
    /// Never blocks actuation.
    ///
    /// # Errors
    ///
    /// Returns the probe failure after `connected` has been cleared.
    #[tracing::instrument(skip(self))]
    pub async fn probe_devices(&self) -> Result<(), FacilityError> {
        let result = self.actuator.gateway().probe().await;
        self.state.update(|s| s.set_connected(result.is_ok()));
        match result {
            Ok(()) => {
                self.log.info("Devices connected");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(channel = %err.channel(), error = %error_chain(&err), "probe failed");
                self.log
                    .warning(format!("Devices not connected: {}", error_chain(&err)));
                Err(err.into())
            }
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    #[must_use]
    pub fn current_state(&self) -> FacilitySnapshot {
        self.state.read(FacilityState::snapshot)
    }

    /// At most `limit` entries, most recent last.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> Vec<LogEntry> {
        self.log.recent(limit)
    }

    /// Live stream of entries appended from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.log.subscribe()
    }
}
