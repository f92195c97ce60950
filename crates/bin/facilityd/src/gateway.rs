//! Runtime selection between the serial and the virtual device gateway.

use std::future::Future;

use facility_adapter_serial::SerialGateway;
use facility_adapter_virtual::VirtualGateway;
use facility_app::ports::DeviceGateway;
use facility_domain::device::{DoorCommand, LightCommand, LightReply};
use facility_domain::error::TransportError;

use crate::config::{GatewayConfig, GatewayKind};

/// The configured gateway; dispatches to the concrete adapter.
pub enum AnyGateway {
    Serial(SerialGateway),
    Virtual(VirtualGateway),
}

impl AnyGateway {
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        match config.kind {
            GatewayKind::Serial => Self::Serial(SerialGateway::new(config.serial.clone())),
            GatewayKind::Virtual => Self::Virtual(VirtualGateway::default()),
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Serial(gateway) => format!(
                "serial (lighting {}, door {})",
                gateway.config().lighting_port,
                gateway.config().door_port
            ),
            Self::Virtual(_) => "virtual".to_string(),
        }
    }
}

impl DeviceGateway for AnyGateway {
    fn probe(&self) -> impl Future<Output = Result<(), TransportError>> + Send {
        async move {
            match self {
                Self::Serial(gateway) => gateway.probe().await,
                Self::Virtual(gateway) => gateway.probe().await,
            }
        }
    }

    fn send_light_command(
        &self,
        commands: &[LightCommand],
    ) -> impl Future<Output = Result<Vec<LightReply>, TransportError>> + Send {
        async move {
            match self {
                Self::Serial(gateway) => gateway.send_light_command(commands).await,
                Self::Virtual(gateway) => gateway.send_light_command(commands).await,
            }
        }
    }

    fn send_door_command(
        &self,
        command: DoorCommand,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        async move {
            match self {
                Self::Serial(gateway) => gateway.send_door_command(command).await,
                Self::Virtual(gateway) => gateway.send_door_command(command).await,
            }
        }
    }
}
