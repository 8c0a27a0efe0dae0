//! # latchd Server
//!
//! The access-control gatekeeper for a physical door.
//!
//! This crate provides:
//! - The TCP accept loop and per-connection protocol
//! - The lock actuator (GPIO pin driver or simulation)
//! - Server configuration
//!
//! # Protocol
//!
//! A reader device connects, sends one credential identifier as UTF-8 text,
//! and receives exactly `AUTHORIZED` or `DENIED` before the connection is
//! closed. There are no multi-request sessions and no framing beyond a
//! single bounded read.
//!
//! # Fail-safe
//!
//! The lock's resting state is locked. The actuator is forced locked at
//! startup and again during shutdown, independent of any unlock cycle still
//! in flight; an uncontrolled exit never leaves the door open across a
//! server lifecycle boundary.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod actuator;
mod config;
mod error;
mod handler;
mod server;

pub use actuator::{select_actuator, Actuator, GpioActuator, SimulatedActuator};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{handle_connection, HandlerContext};
pub use server::AccessServer;
