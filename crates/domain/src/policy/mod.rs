//! Policies — the pure decisions taken by the periodic monitors.
//!
//! Each policy looks at a [`FacilityState`](crate::facility::FacilityState)
//! (or a few of its fields) plus the current time and says what should happen.
//! Applying the decision (talking to devices, mutating state, logging) is the
//! job of the `app` crate.

pub mod climate;
pub mod door;
pub mod energy;
pub mod schedule;
