//! Monitor engine — spawn the four monitors and stop them together.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use facility_domain::policy::{door, energy};

use crate::actuation::Actuator;
use crate::event_log::EventLog;
use crate::monitors::{
    Cadence, ClimateMonitor, DoorSafetyMonitor, EnergyAccountant, ScheduleMonitor, runner,
};
use crate::ports::{DeviceGateway, SensorSource};
use crate::state::SharedState;

/// Timing of every monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorSettings {
    pub climate: Cadence,
    pub schedule: Cadence,
    pub door: Cadence,
    pub door_timeout: Duration,
    pub energy: Cadence,
    pub energy_scaling: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            climate: Cadence::from_secs(10, 30),
            schedule: Cadence::from_secs(30, 60),
            door: Cadence::from_secs(5, 30),
            door_timeout: door::DEFAULT_OPEN_TIMEOUT,
            energy: Cadence::from_secs(60, 120),
            energy_scaling: energy::DEFAULT_SCALING,
        }
    }
}

/// Running monitor tasks plus the signal that stops them.
pub struct MonitorEngine {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl MonitorEngine {
    /// Spawn one task per monitor on the current tokio runtime.
    pub fn start<G, S>(
        state: &SharedState,
        log: &Arc<EventLog>,
        actuator: &Actuator<G>,
        sensor: S,
        settings: &MonitorSettings,
    ) -> Self
    where
        G: DeviceGateway + Clone + 'static,
        S: SensorSource + 'static,
    {
        let (shutdown, rx) = watch::channel(false);
        let handles = vec![
            tokio::spawn(runner::run(
                ClimateMonitor::new(state.clone(), Arc::clone(log), actuator.clone(), sensor),
                settings.climate,
                Arc::clone(log),
                rx.clone(),
            )),
            tokio::spawn(runner::run(
                ScheduleMonitor::new(state.clone(), Arc::clone(log), actuator.clone()),
                settings.schedule,
                Arc::clone(log),
                rx.clone(),
            )),
            tokio::spawn(runner::run(
                DoorSafetyMonitor::new(
                    state.clone(),
                    Arc::clone(log),
                    actuator.clone(),
                    settings.door_timeout,
                ),
                settings.door,
                Arc::clone(log),
                rx.clone(),
            )),
            tokio::spawn(runner::run(
                EnergyAccountant::new(state.clone(), settings.energy_scaling),
                settings.energy,
                Arc::clone(log),
                rx,
            )),
        ];
        log.info("All monitoring systems started");
        Self { shutdown, handles }
    }

    /// Number of monitor tasks still running.
    #[must_use]
    pub fn running(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Signal every monitor and wait for all of them to finish their current
    /// tick.
    pub async fn shutdown(self) {
        // only fails when every receiver is gone, i.e. all tasks already ended
        let _ = self.shutdown.send(true);
        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "monitor task failed");
            }
        }
        tracing::info!("all monitors stopped");
    }
}
