//! # latchd Core
//!
//! Shared persisted-state layer for the latchd access-control system.
//!
//! This crate provides:
//! - The data model for card records and access-log entries
//! - The card store (authorization list persisted as human-editable JSON)
//! - The append-only audit log
//!
//! # Architecture
//!
//! Both the access-control server (`latchd_server`) and the administration
//! tool (`latchctl`) operate on the same two JSON files through this crate.
//! The server only ever *reads* the card store and *appends* to the audit
//! log; every mutating operation on the card store belongs to the
//! administration path.
//!
//! The card store is re-read from disk on every authorization check, so an
//! administrative edit takes effect on the very next check without a server
//! restart. An unreadable or malformed file is treated as an empty
//! collection: an unknown system state always denies.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod audit;
mod error;
mod store;
mod types;

pub use audit::AuditLog;
pub use error::{CoreError, CoreResult};
pub use store::{AddOutcome, CardStore};
pub use types::{AccessLogEntry, CardFile, CardRecord};
