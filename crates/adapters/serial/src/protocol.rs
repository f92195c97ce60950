//! Wire protocol of the two controllers.
//!
//! - Lighting: ASCII `SDL,<channel>,<level>\r\n`, one line of reply per frame.
//! - Door relay: two bytes `0xFE <code>`, followed by an unvalidated reply.
//! - Probe: `PING\r\n` on the lighting link, a close frame on the door link.
//!
//! The exchange functions are generic over the byte stream so that they run
//! unchanged over a serial port or an in-memory pipe.

use std::time::Duration;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use facility_domain::device::{DoorCommand, LightCommand, LightReply};

use crate::error::SerialError;

/// Command byte preceding every relay code.
pub const DOOR_COMMAND_PREFIX: u8 = 0xFE;

/// Keep-alive line written to the lighting controller by the probe.
pub const PING: &[u8] = b"PING\r\n";

const MAX_DOOR_REPLY: usize = 32;

#[must_use]
pub fn light_frame(command: LightCommand) -> String {
    format!("SDL,{},{}\r\n", command.channel, command.level.percent())
}

#[must_use]
pub fn door_frame(command: DoorCommand) -> [u8; 2] {
    [DOOR_COMMAND_PREFIX, command.code()]
}

/// Write `bytes` in full and flush, within `timeout`.
///
/// # Errors
///
/// [`SerialError::Timeout`] when the write stalls, [`SerialError::Io`] when it
/// fails.
pub async fn write_frame<W>(
    writer: &mut W,
    bytes: &[u8],
    timeout: Duration,
) -> Result<(), SerialError>
where
    W: AsyncWrite + Unpin,
{
    let write = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    };
    tokio::time::timeout(timeout, write)
        .await
        .map_err(|_| SerialError::Timeout(timeout))?
        .map_err(SerialError::Io)
}

/// Read one reply line, without its line terminator.
///
/// Returns `None` when nothing arrives within `timeout`, on end of stream, or
/// on a read error. Invalid UTF-8 is decoded lossily.
pub async fn read_reply<R>(reader: &mut R, timeout: Duration) -> LightReply
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    match tokio::time::timeout(timeout, reader.read_until(b'\n', &mut line)).await {
        Ok(Ok(n)) if n > 0 => {
            let text = String::from_utf8_lossy(&line);
            Some(text.trim_end_matches(['\r', '\n']).to_string())
        }
        Ok(Ok(_)) => None,
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "reply read failed");
            None
        }
        Err(_) => None,
    }
}

/// Send every lighting frame in order over `stream`, reading one reply after
/// each.
///
/// # Errors
///
/// Fails on the first frame that cannot be written. Missing replies are not
/// errors.
pub async fn exchange_lights<S>(
    stream: S,
    commands: &[LightCommand],
    timeout: Duration,
) -> Result<Vec<LightReply>, SerialError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);
    let mut replies = Vec::with_capacity(commands.len());
    for &command in commands {
        write_frame(&mut stream, light_frame(command).as_bytes(), timeout).await?;
        let reply = read_reply(&mut stream, timeout).await;
        replies.push(reply);
    }
    Ok(replies)
}

/// Send one relay frame, wait `settle`, then drain whatever the relay
/// answered.
///
/// # Errors
///
/// Fails only when the frame cannot be written.
pub async fn exchange_door<S>(
    mut stream: S,
    command: DoorCommand,
    timeout: Duration,
    settle: Duration,
) -> Result<(), SerialError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    write_frame(&mut stream, &door_frame(command), timeout).await?;
    tokio::time::sleep(settle).await;
    let mut reply = [0_u8; MAX_DOOR_REPLY];
    match tokio::time::timeout(timeout, stream.read(&mut reply)).await {
        Ok(Ok(n)) => tracing::debug!(reply = ?&reply[..n], "door relay reply"),
        Ok(Err(err)) => tracing::debug!(error = %err, "door relay reply unreadable"),
        Err(_) => tracing::debug!("door relay silent"),
    }
    Ok(())
}
