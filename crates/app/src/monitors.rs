//! Periodic monitors — the four control loops of the facility.
//!
//! Each monitor is a [`Monitor`] whose `tick` takes one decision from the
//! domain `policy` module and applies it. The [`runner`] drives a monitor on
//! its own task.

pub mod climate;
pub mod door_safety;
pub mod energy;
pub mod runner;
pub mod schedule;

pub use climate::ClimateMonitor;
pub use door_safety::DoorSafetyMonitor;
pub use energy::EnergyAccountant;
pub use runner::{Cadence, Monitor};
pub use schedule::ScheduleMonitor;
