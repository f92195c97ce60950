//! Climate monitor — sample the sensor and keep the temperature in band.

use std::future::Future;
use std::sync::Arc;

use facility_domain::error::MonitorTickError;
use facility_domain::facility::FacilityState;
use facility_domain::policy::climate::{self, ClimateAction};
use facility_domain::time::Timestamp;

use crate::actuation::Actuator;
use crate::event_log::EventLog;
use crate::monitors::Monitor;
use crate::ports::{DeviceGateway, SensorSource};
use crate::state::SharedState;

pub struct ClimateMonitor<G, S> {
    state: SharedState,
    log: Arc<EventLog>,
    actuator: Actuator<G>,
    sensor: S,
}

impl<G, S> ClimateMonitor<G, S> {
    pub fn new(state: SharedState, log: Arc<EventLog>, actuator: Actuator<G>, sensor: S) -> Self {
        Self {
            state,
            log,
            actuator,
            sensor,
        }
    }
}

impl<G: DeviceGateway, S: SensorSource> ClimateMonitor<G, S> {
    async fn regulate(&self) -> Result<(), MonitorTickError> {
        let previous = self.state.read(FacilityState::reading);
        let reading = self
            .sensor
            .read(previous)
            .await
            .map_err(|err| MonitorTickError::new("climate", err))?;

        let action = self.state.update(|s| {
            s.record_reading(reading);
            climate::regulate(s)
        });
        tracing::debug!(
            temperature = reading.temperature,
            humidity = reading.humidity,
            "climate sample"
        );

        let Some(action) = action else {
            return Ok(());
        };
        match action {
            ClimateAction::Heat { temperature } => self.log.info(format!(
                "Temperature below minimum ({temperature:.1}°C). Activating heating."
            )),
            ClimateAction::Cool { temperature } => self.log.info(format!(
                "Temperature above maximum ({temperature:.1}°C). Deactivating heating."
            )),
        }
        // failures are already in the event log; the tick itself succeeded
        let _ = self.actuator.set_lights(action.lights_on()).await;
        Ok(())
    }
}

impl<G: DeviceGateway, S: SensorSource> Monitor for ClimateMonitor<G, S> {
    fn name(&self) -> &'static str {
        "Temperature"
    }

    fn tick(&mut self, _now: Timestamp) -> impl Future<Output = Result<(), MonitorTickError>> + Send {
        self.regulate()
    }
}
