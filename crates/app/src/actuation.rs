//! Actuation — apply a logical change to the devices and to the state.
//!
//! Device I/O runs without holding the state lock. Once the gateway call is
//! over, the flag is committed *whatever the outcome*: the state reflects the
//! last requested position, not a confirmed one. A transport failure is
//! recorded in the event log and handed back to the caller.

use std::error::Error;
use std::sync::Arc;

use facility_domain::device::{DoorCommand, LightCommand, LightLevel};
use facility_domain::error::TransportError;
use facility_domain::time::now;

use crate::event_log::EventLog;
use crate::ports::DeviceGateway;
use crate::state::SharedState;

/// Drives the lighting and door channels on behalf of every caller.
#[derive(Clone)]
pub struct Actuator<G> {
    gateway: G,
    state: SharedState,
    log: Arc<EventLog>,
}

impl<G: DeviceGateway> Actuator<G> {
    pub fn new(gateway: G, state: SharedState, log: Arc<EventLog>) -> Self {
        Self {
            gateway,
            state,
            log,
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Switch every lighting channel on or off.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] raised by the gateway. `lights_on` has
    /// been updated to `on` either way.
    #[tracing::instrument(skip(self))]
    pub async fn set_lights(&self, on: bool) -> Result<(), TransportError> {
        let commands = LightCommand::all(LightLevel::from_on(on));
        let result = self.gateway.send_light_command(&commands).await;
        self.state.update(|s| s.set_lights(on));

        let (done, verb) = if on {
            ("Lights turned ON", "turning on lights")
        } else {
            ("Lights turned OFF", "turning off lights")
        };
        match result {
            Ok(replies) => {
                for (command, reply) in commands.iter().zip(&replies) {
                    tracing::debug!(channel = command.channel, reply = ?reply, "lighting reply");
                }
                self.log.info(done);
                Ok(())
            }
            Err(err) => Err(self.report(verb, err)),
        }
    }

    /// Open or close the door relay.
    ///
    /// # Errors
    ///
    /// Returns the [`TransportError`] raised by the gateway. `door_open` has
    /// been updated to `open` either way.
    #[tracing::instrument(skip(self))]
    pub async fn set_door(&self, open: bool) -> Result<(), TransportError> {
        let result = self
            .gateway
            .send_door_command(DoorCommand::from_open(open))
            .await;
        self.state.update(|s| s.set_door(open, now()));

        let (done, verb) = if open {
            ("Door opened", "opening door")
        } else {
            ("Door closed", "closing door")
        };
        match result {
            Ok(()) => {
                self.log.info(done);
                Ok(())
            }
            Err(err) => Err(self.report(verb, err)),
        }
    }

    fn report(&self, verb: &str, err: TransportError) -> TransportError {
        tracing::warn!(channel = %err.channel(), error = %error_chain(&err), "actuation failed");
        self.log.error(format!("Error {verb}: {}", error_chain(&err)));
        err
    }
}

/// `outer: inner: root` rendering of an error and its sources.
#[must_use]
pub fn error_chain(err: &dyn Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, SpyGateway};
    use facility_domain::event::Severity;
    use facility_domain::facility::FacilityState;

    fn actuator(gateway: &Arc<SpyGateway>) -> (Actuator<Arc<SpyGateway>>, SharedState, Arc<EventLog>) {
        let state = SharedState::new(FacilityState::new(now()));
        let log = Arc::new(EventLog::default());
        (
            Actuator::new(Arc::clone(gateway), state.clone(), Arc::clone(&log)),
            state,
            log,
        )
    }

    #[tokio::test]
    async fn should_send_all_channels_in_wiring_order() {
        let gateway = Arc::new(SpyGateway::default());
        let (actuator, state, log) = actuator(&gateway);

        actuator.set_lights(true).await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![Call::Lights(LightCommand::all(LightLevel::On))]
        );
        assert!(state.snapshot().lights_on);
        assert_eq!(log.recent(1)[0].message, "Lights turned ON");
    }

    #[tokio::test]
    async fn should_commit_lights_flag_when_transport_fails() {
        let gateway = Arc::new(SpyGateway::failing());
        let (actuator, state, log) = actuator(&gateway);

        let result = actuator.set_lights(true).await;

        assert!(result.is_err());
        assert!(state.snapshot().lights_on);
        let entry = &log.recent(1)[0];
        assert_eq!(entry.severity, Severity::Error);
        assert!(entry.message.starts_with("Error turning on lights: "));
    }

    #[tokio::test]
    async fn should_commit_door_flag_and_timestamp_when_transport_fails() {
        let gateway = Arc::new(SpyGateway::failing());
        let (actuator, state, log) = actuator(&gateway);

        assert!(actuator.set_door(true).await.is_err());

        let snapshot = state.snapshot();
        assert!(snapshot.door_open);
        assert!(snapshot.door_opened_at.is_some());
        assert!(log.recent(1)[0].message.starts_with("Error opening door: "));
    }

    #[tokio::test]
    async fn should_close_door_and_clear_timestamp() {
        let gateway = Arc::new(SpyGateway::default());
        let (actuator, state, log) = actuator(&gateway);

        actuator.set_door(true).await.unwrap();
        actuator.set_door(false).await.unwrap();

        assert_eq!(
            gateway.door_calls(),
            vec![DoorCommand::Open, DoorCommand::Close]
        );
        let snapshot = state.snapshot();
        assert!(!snapshot.door_open);
        assert!(snapshot.door_opened_at.is_none());
        assert_eq!(log.recent(1)[0].message, "Door closed");
    }

    #[tokio::test]
    async fn should_keep_first_open_timestamp_when_opening_twice() {
        let gateway = Arc::new(SpyGateway::default());
        let (actuator, state, _log) = actuator(&gateway);

        actuator.set_door(true).await.unwrap();
        let first = state.snapshot().door_opened_at;
        actuator.set_door(true).await.unwrap();

        assert_eq!(state.snapshot().door_opened_at, first);
    }

    #[test]
    fn should_render_error_chain() {
        let err = TransportError::Io {
            channel: facility_domain::device::DeviceChannel::Lighting,
            source: std::io::Error::other("broken pipe"),
        };
        assert_eq!(error_chain(&err), "lighting channel I/O failure: broken pipe");
    }
}
