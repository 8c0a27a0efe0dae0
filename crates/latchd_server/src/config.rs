//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the access-control server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listening socket to.
    pub bind_addr: SocketAddr,
    /// BCM pin number driving the solenoid relay.
    pub solenoid_pin: u32,
    /// How long the door stays unlocked after an authorized attempt.
    pub unlock_duration: Duration,
    /// How long to wait for a reader device to deliver its credential.
    pub read_timeout: Duration,
    /// Path to the persisted authorization list.
    pub cards_path: PathBuf,
    /// Path to the persisted audit log.
    pub log_path: PathBuf,
}

impl ServerConfig {
    /// Creates a configuration with defaults for everything but the address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            solenoid_pin: 18,
            unlock_duration: Duration::from_secs(3),
            read_timeout: Duration::from_secs(10),
            cards_path: PathBuf::from("authorized_cards.json"),
            log_path: PathBuf::from("access_log.json"),
        }
    }

    /// Sets the solenoid relay pin.
    #[must_use]
    pub fn with_solenoid_pin(mut self, pin: u32) -> Self {
        self.solenoid_pin = pin;
        self
    }

    /// Sets the unlock hold duration.
    #[must_use]
    pub fn with_unlock_duration(mut self, duration: Duration) -> Self {
        self.unlock_duration = duration;
        self
    }

    /// Sets the per-connection read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the path to the authorization list.
    #[must_use]
    pub fn with_cards_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cards_path = path.into();
        self
    }

    /// Sets the path to the audit log.
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], 5000)))
    }
}
