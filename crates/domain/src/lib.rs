//! # facility-domain
//!
//! Pure domain model for the facilityd building-automation controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps, time-of-day
//! - Define the **facility state** record and enforce its cross-field invariants
//! - Define **operating modes** and what each one enables
//! - Define **macros** (named bundles of lighting/temperature/door targets)
//! - Define **device commands** (lighting channels and levels, door relay frames)
//! - Define **log entries** consumed by the presentation layer
//! - Hold the pure **policy** decisions taken by the periodic monitors
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod event;
pub mod facility;
pub mod macros;
pub mod mode;
pub mod policy;
