//! Schedule monitor — switch the lights at the configured minutes.
//!
//! The minute is polled more often than it lasts, so every firing is
//! remembered for the rest of its day and never repeated.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use facility_domain::error::MonitorTickError;
use facility_domain::policy::schedule::{self, Firing, ScheduledSwitch};
use facility_domain::time::Timestamp;

use crate::actuation::Actuator;
use crate::event_log::EventLog;
use crate::monitors::Monitor;
use crate::ports::DeviceGateway;
use crate::state::SharedState;

pub struct ScheduleMonitor<G> {
    state: SharedState,
    log: Arc<EventLog>,
    actuator: Actuator<G>,
    fired: HashSet<Firing>,
}

impl<G> ScheduleMonitor<G> {
    pub fn new(state: SharedState, log: Arc<EventLog>, actuator: Actuator<G>) -> Self {
        Self {
            state,
            log,
            actuator,
            fired: HashSet::new(),
        }
    }
}

impl<G: DeviceGateway> ScheduleMonitor<G> {
    async fn apply(&mut self, now: Timestamp) -> Result<(), MonitorTickError> {
        let due = self.state.read(|s| schedule::due_firings(s, now));
        for firing in due {
            self.fired.retain(|f| f.date == firing.date);
            if !self.fired.insert(firing) {
                continue;
            }
            let message = match firing.switch {
                ScheduledSwitch::LightsOn => "Scheduled light activation",
                ScheduledSwitch::LightsOff => "Scheduled light deactivation",
            };
            self.log.info(message);
            // failures are already in the event log
            let _ = self.actuator.set_lights(firing.switch.lights_on()).await;
        }
        Ok(())
    }
}

impl<G: DeviceGateway> Monitor for ScheduleMonitor<G> {
    fn name(&self) -> &'static str {
        "Schedule"
    }

    fn tick(&mut self, now: Timestamp) -> impl Future<Output = Result<(), MonitorTickError>> + Send {
        self.apply(now)
    }
}
