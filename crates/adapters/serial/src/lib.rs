//! # facility-adapter-serial
//!
//! Serial adapter — talks to the lighting controller and the door relay
//! controller over two RS-232 links.
//!
//! ## Responsibilities
//! - Encode lighting and door frames, read back their replies
//! - Open a port per call and release it before returning
//! - Bound every write and reply read by the command timeout
//! - Convert adapter failures into `TransportError` at the port boundary
//!
//! ## Dependency rule
//! Same as other adapters: depends on `facility-app` and `facility-domain`.

pub mod config;
pub mod error;
pub mod gateway;
pub mod protocol;

pub use config::SerialConfig;
pub use error::SerialError;
pub use gateway::SerialGateway;
