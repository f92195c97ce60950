//! # facility-app
//!
//! Application layer — use-cases, periodic monitors and **port definitions**
//! (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceGateway` — lighting controller and door relay channels
//!   - `SensorSource` — temperature/humidity readings
//! - Own the **shared state** discipline (`SharedState`): short critical
//!   sections, never held across an `.await`
//! - Apply device changes with **optimistic updates** (`Actuator`)
//! - Expose the **command/query API** (`FacilityService`, `ModeController`)
//! - Run the four **monitors** (climate, schedule, door safety, energy) as
//!   cancellable tasks (`MonitorEngine`)
//! - Keep the operator-facing **event log** with live fan-out
//!
//! ## Dependency rule
//! Depends on `facility-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod actuation;
pub mod engine;
pub mod event_log;
pub mod monitors;
pub mod ports;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
