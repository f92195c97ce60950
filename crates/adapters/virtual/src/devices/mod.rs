//! Simulated controllers behind the virtual gateway.

mod door_relay;
mod lighting;

pub use door_relay::VirtualDoorRelay;
pub use lighting::VirtualLighting;
