//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`FacilityError`] via `#[from]`. Adapters keep their own error enums and
//! expose an `into_transport` conversion at the port boundary.

use std::time::Duration;

use crate::device::DeviceChannel;

/// Top-level error returned by the command API.
#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    /// A command was rejected before touching any state.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A device channel could not be reached or failed mid-exchange.
    #[error("transport error")]
    Transport(#[from] TransportError),

    #[error("monitor error")]
    MonitorTick(#[from] MonitorTickError),

    #[error("sensor error")]
    Sensor(#[from] SensorError),
}

/// Rejected command input. State is left untouched whenever one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid time format {value:?}, expected HH:MM (24-hour)")]
    InvalidTimeFormat { value: String },

    #[error("minimum temperature {min} must be below maximum temperature {max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("macro {name:?} not found")]
    UnknownMacro { name: String },
}

/// Failure to exchange frames with a device controller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The serial port could not be opened.
    #[error("{channel} channel unavailable")]
    Unavailable {
        channel: DeviceChannel,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Writing a frame did not complete in time.
    #[error("{channel} channel timed out after {}ms", .timeout.as_millis())]
    Timeout {
        channel: DeviceChannel,
        timeout: Duration,
    },

    /// The port was open but an I/O operation failed.
    #[error("{channel} channel I/O failure")]
    Io {
        channel: DeviceChannel,
        #[source]
        source: std::io::Error,
    },

    /// The controller refused the command (simulated devices only).
    #[error("{channel} channel rejected the command: {reason}")]
    Rejected {
        channel: DeviceChannel,
        reason: String,
    },
}

impl TransportError {
    /// The device channel on which the failure happened.
    #[must_use]
    pub fn channel(&self) -> DeviceChannel {
        match self {
            Self::Unavailable { channel, .. }
            | Self::Timeout { channel, .. }
            | Self::Io { channel, .. }
            | Self::Rejected { channel, .. } => *channel,
        }
    }
}

/// The pluggable climate sensor could not produce a reading.
#[derive(Debug, thiserror::Error)]
#[error("sensor unavailable: {reason}")]
pub struct SensorError {
    pub reason: String,
}

/// Any fault raised from inside a monitor tick body.
#[derive(Debug, thiserror::Error)]
#[error("{monitor} tick failed")]
pub struct MonitorTickError {
    pub monitor: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl MonitorTickError {
    /// Wrap an error raised while running `monitor`.
    pub fn new(
        monitor: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            monitor,
            source: source.into(),
        }
    }
}
