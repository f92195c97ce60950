//! Serial adapter error types.

use std::time::Duration;

use facility_domain::device::DeviceChannel;
use facility_domain::error::TransportError;

/// Errors specific to the serial adapter.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// The port could not be opened or configured.
    #[error("failed to open serial port {path}")]
    Open {
        path: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// A write on an open port failed.
    #[error("serial I/O error")]
    Io(#[source] std::io::Error),

    /// A write did not complete within the command timeout.
    #[error("serial write timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl SerialError {
    /// Convert into a [`TransportError`] for `channel`, for propagation across
    /// the gateway port.
    #[must_use]
    pub fn into_transport(self, channel: DeviceChannel) -> TransportError {
        match self {
            open @ Self::Open { .. } => TransportError::Unavailable {
                channel,
                source: Box::new(open),
            },
            Self::Io(source) => TransportError::Io { channel, source },
            Self::Timeout(timeout) => TransportError::Timeout { channel, timeout },
        }
    }
}
