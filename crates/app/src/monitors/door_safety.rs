//! Door safety monitor — close a door left open for too long.
//!
//! Runs in every operating mode and cannot be disabled.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use facility_domain::error::MonitorTickError;
use facility_domain::policy::door;
use facility_domain::time::Timestamp;

use crate::actuation::Actuator;
use crate::event_log::EventLog;
use crate::monitors::Monitor;
use crate::ports::DeviceGateway;
use crate::state::SharedState;

pub struct DoorSafetyMonitor<G> {
    state: SharedState,
    log: Arc<EventLog>,
    actuator: Actuator<G>,
    timeout: Duration,
}

impl<G> DoorSafetyMonitor<G> {
    pub fn new(
        state: SharedState,
        log: Arc<EventLog>,
        actuator: Actuator<G>,
        timeout: Duration,
    ) -> Self {
        Self {
            state,
            log,
            actuator,
            timeout,
        }
    }
}

impl<G: DeviceGateway> DoorSafetyMonitor<G> {
    async fn enforce(&self, now: Timestamp) -> Result<(), MonitorTickError> {
        if !self
            .state
            .read(|s| door::auto_close_due(s, now, self.timeout))
        {
            return Ok(());
        }
        tracing::info!(timeout_secs = self.timeout.as_secs(), "door open too long");
        // failures are already in the event log
        let _ = self.actuator.set_door(false).await;
        self.log.info("Door auto-closed after timeout");
        Ok(())
    }
}

impl<G: DeviceGateway> Monitor for DoorSafetyMonitor<G> {
    fn name(&self) -> &'static str {
        "Door safety"
    }

    fn tick(&mut self, now: Timestamp) -> impl Future<Output = Result<(), MonitorTickError>> + Send {
        self.enforce(now)
    }
}
