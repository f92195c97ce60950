//! In-test fakes for the ports.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use facility_domain::device::{DeviceChannel, DoorCommand, LightCommand, LightReply};
use facility_domain::error::{SensorError, TransportError};
use facility_domain::policy::climate::ClimateReading;

use crate::ports::{DeviceGateway, SensorSource};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Probe,
    Lights(Vec<LightCommand>),
    Door(DoorCommand),
}

/// Records every call; fails all of them while `failing` is set.
#[derive(Default)]
pub struct SpyGateway {
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
}

impl SpyGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.set_failing(true);
        gateway
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn door_calls(&self) -> Vec<DoorCommand> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Door(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn light_calls(&self) -> Vec<Vec<LightCommand>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Lights(cmds) => Some(cmds),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call, channel: DeviceChannel) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(TransportError::Rejected {
                channel,
                reason: "spy failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl DeviceGateway for SpyGateway {
    fn probe(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        let result = self.record(Call::Probe, DeviceChannel::Lighting);
        async move { result }
    }

    fn send_light_command(
        &self,
        commands: &[LightCommand],
    ) -> impl Future<Output = Result<Vec<LightReply>, TransportError>> + Send {
        let result = self
            .record(Call::Lights(commands.to_vec()), DeviceChannel::Lighting)
            .map(|()| vec![Some("OK".to_string()); commands.len()]);
        async move { result }
    }

    fn send_door_command(
        &self,
        command: DoorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        let result = self.record(Call::Door(command), DeviceChannel::DoorRelay);
        async move { result }
    }
}

/// Plays back queued readings, then repeats the previous one.
#[derive(Default)]
pub struct ScriptedSensor {
    script: Mutex<VecDeque<Result<ClimateReading, SensorError>>>,
}

impl ScriptedSensor {
    pub fn with(readings: impl IntoIterator<Item = Result<ClimateReading, SensorError>>) -> Self {
        Self {
            script: Mutex::new(readings.into_iter().collect()),
        }
    }
}

impl SensorSource for ScriptedSensor {
    fn read(
        &self,
        previous: ClimateReading,
    ) -> impl Future<Output = Result<ClimateReading, SensorError>> + Send {
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(previous));
        async move { next }
    }
}

pub fn reading(temperature: f64, humidity: f64) -> ClimateReading {
    ClimateReading {
        temperature,
        humidity,
    }
}
