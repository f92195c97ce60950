//! Device gateway port — the two physical actuation channels.
//!
//! Implementations own the wire protocol and the channel handles. A call
//! acquires whatever it needs, exchanges its frames sequentially and releases
//! everything before returning; nothing is retried here.

use std::future::Future;
use std::sync::Arc;

use facility_domain::device::{DoorCommand, LightCommand, LightReply};
use facility_domain::error::TransportError;

/// Lighting controller + door relay controller.
pub trait DeviceGateway: Send + Sync {
    /// Check that both channels can be opened and written to. Replies are not
    /// validated.
    fn probe(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Send every lighting frame in order over a single channel handle.
    ///
    /// Returns one reply per command; `None` when the controller stayed
    /// silent. A silent or garbled reply is not an error.
    fn send_light_command(
        &self,
        commands: &[LightCommand],
    ) -> impl Future<Output = Result<Vec<LightReply>, TransportError>> + Send;

    /// Energise or release the door relay.
    fn send_door_command(
        &self,
        command: DoorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

impl<T: DeviceGateway> DeviceGateway for Arc<T> {
    fn probe(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).probe()
    }

    fn send_light_command(
        &self,
        commands: &[LightCommand],
    ) -> impl Future<Output = Result<Vec<LightReply>, TransportError>> + Send {
        (**self).send_light_command(commands)
    }

    fn send_door_command(
        &self,
        command: DoorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        (**self).send_door_command(command)
    }
}
