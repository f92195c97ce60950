//! # facility-adapter-virtual
//!
//! Virtual/demo adapter that simulates the facility hardware for testing and
//! demonstration purposes.
//!
//! ## Provided devices
//!
//! | Device | Port | Behaviour |
//! |--------|------|-----------|
//! | Virtual lighting controller | `DeviceGateway` | Stores a level per channel, answers `OK` |
//! | Virtual door relay | `DeviceGateway` | Energised while the door is open |
//! | Jitter sensor | `SensorSource` | Random walk of ±0.3 °C / ±1.0 % per reading |
//!
//! The gateway can be switched into a failing mode where every call raises a
//! `TransportError`, to exercise the optimistic-update behaviour.
//!
//! ## Dependency rule
//!
//! Depends on `facility-app` (port traits) and `facility-domain` only.

mod devices;
pub mod sensor;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use facility_app::ports::DeviceGateway;
use facility_domain::device::{DeviceChannel, DoorCommand, LightCommand, LightReply};
use facility_domain::error::TransportError;

pub use devices::{VirtualDoorRelay, VirtualLighting};
pub use sensor::JitterSensor;

/// Simulated lighting controller and door relay.
#[derive(Default)]
pub struct VirtualGateway {
    lighting: VirtualLighting,
    door: VirtualDoorRelay,
    failing: AtomicBool,
}

impl VirtualGateway {
    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
        tracing::info!(failing, "virtual gateway failure mode changed");
    }

    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn lighting(&self) -> &VirtualLighting {
        &self.lighting
    }

    #[must_use]
    pub fn door(&self) -> &VirtualDoorRelay {
        &self.door
    }

    fn check(&self, channel: DeviceChannel) -> Result<(), TransportError> {
        if self.is_failing() {
            return Err(TransportError::Rejected {
                channel,
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl DeviceGateway for VirtualGateway {
    fn probe(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        let result = self
            .check(DeviceChannel::Lighting)
            .and_then(|()| self.check(DeviceChannel::DoorRelay));
        async move { result }
    }

    fn send_light_command(
        &self,
        commands: &[LightCommand],
    ) -> impl Future<Output = Result<Vec<LightReply>, TransportError>> + Send {
        let result = self.check(DeviceChannel::Lighting).map(|()| {
            commands
                .iter()
                .map(|&command| Some(self.lighting.apply(command)))
                .collect()
        });
        async move { result }
    }

    fn send_door_command(
        &self,
        command: DoorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        let result = self
            .check(DeviceChannel::DoorRelay)
            .map(|()| self.door.apply(command));
        async move { result }
    }
}
