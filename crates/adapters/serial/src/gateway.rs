//! [`DeviceGateway`] over two serial ports.
//!
//! Each call opens the port(s) it needs, runs its exchange and drops the
//! handle before returning, so no port stays open between commands.

use std::future::Future;

use tokio_serial::{SerialPortBuilderExt, SerialStream};

use facility_app::ports::DeviceGateway;
use facility_domain::device::{DeviceChannel, DoorCommand, LightCommand, LightReply};
use facility_domain::error::TransportError;

use crate::config::SerialConfig;
use crate::error::SerialError;
use crate::protocol;

/// Serial implementation of the device gateway.
#[derive(Debug, Clone)]
pub struct SerialGateway {
    config: SerialConfig,
}

impl SerialGateway {
    #[must_use]
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    fn port_for(&self, channel: DeviceChannel) -> &str {
        match channel {
            DeviceChannel::Lighting => &self.config.lighting_port,
            DeviceChannel::DoorRelay => &self.config.door_port,
        }
    }

    fn open(&self, channel: DeviceChannel) -> Result<SerialStream, TransportError> {
        let path = self.port_for(channel);
        tokio_serial::new(path, self.config.baud_rate)
            .timeout(self.config.command_timeout())
            .open_native_async()
            .map_err(|source| {
                SerialError::Open {
                    path: path.to_string(),
                    source,
                }
                .into_transport(channel)
            })
    }

    async fn ping(&self, channel: DeviceChannel, frame: &[u8]) -> Result<(), TransportError> {
        let mut port = self.open(channel)?;
        protocol::write_frame(&mut port, frame, self.config.command_timeout())
            .await
            .map_err(|err| err.into_transport(channel))?;
        tokio::time::sleep(self.config.probe_settle()).await;
        Ok(())
    }
}

impl DeviceGateway for SerialGateway {
    fn probe(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        async move {
            self.ping(DeviceChannel::Lighting, protocol::PING).await?;
            self.ping(
                DeviceChannel::DoorRelay,
                &protocol::door_frame(DoorCommand::Close),
            )
            .await?;
            tracing::info!(
                lighting = %self.config.lighting_port,
                door = %self.config.door_port,
                "serial devices reachable"
            );
            Ok(())
        }
    }

    fn send_light_command(
        &self,
        commands: &[LightCommand],
    ) -> impl Future<Output = Result<Vec<LightReply>, TransportError>> + Send {
        async move {
            let channel = DeviceChannel::Lighting;
            let port = self.open(channel)?;
            protocol::exchange_lights(port, commands, self.config.command_timeout())
                .await
                .map_err(|err| err.into_transport(channel))
        }
    }

    fn send_door_command(
        &self,
        command: DoorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        async move {
            let channel = DeviceChannel::DoorRelay;
            let port = self.open(channel)?;
            protocol::exchange_door(
                port,
                command,
                self.config.command_timeout(),
                self.config.door_settle(),
            )
            .await
            .map_err(|err| err.into_transport(channel))
        }
    }
}
