//! Lock actuator backends.
//!
//! The actuator is the capability seam between the connection handler and
//! the physical door. Two backends implement it: a sysfs GPIO pin driver for
//! the real relay, and a simulation that performs the same timed sequence
//! without hardware. The backend is probed once at startup and injected into
//! the handler; nothing else in the server knows which one is running.

use crate::error::{ServerError, ServerResult};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Drives the physical lock output.
///
/// # Invariants
///
/// - The resting state is locked; constructors force it before returning.
/// - `unlock_cycle` is a blocking open-hold-close sequence within its own
///   execution context. Callers that must not block (the connection handler)
///   run it on a blocking task with no join.
/// - `force_locked` drives the closed state unconditionally and is safe to
///   call while a cycle is in flight; overlapping drives settle locked.
pub trait Actuator: Send + Sync {
    /// Unlocks the door, holds for `hold`, then locks it again.
    fn unlock_cycle(&self, hold: Duration);

    /// Drives the locked state immediately. Fail-safe path.
    fn force_locked(&self);

    /// Releases any hardware resources held by the backend.
    fn release(&self) {}
}

/// Sysfs GPIO pin driver for the solenoid relay.
///
/// Speaks the kernel interface under `/sys/class/gpio` directly: the pin is
/// exported, set as an output, and driven through its `value` file. The
/// relay is active-low, so `1` is locked and `0` is unlocked.
///
/// Pin writes during a cycle are logged rather than propagated; a transient
/// sysfs fault must not take down a handler, and the closing write is always
/// attempted.
#[derive(Debug)]
pub struct GpioActuator {
    pin: u32,
    root: PathBuf,
}

const LOCKED: &str = "1";
const UNLOCKED: &str = "0";

impl GpioActuator {
    /// Opens the pin under `/sys/class/gpio` and forces the locked state.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::GpioUnavailable`] if the sysfs interface is
    /// missing or the pin cannot be exported and configured.
    pub fn open(pin: u32) -> ServerResult<Self> {
        Self::open_at(Path::new("/sys/class/gpio"), pin)
    }

    /// Opens the pin under an explicit sysfs root.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::GpioUnavailable`] if the root is missing or
    /// the pin cannot be exported and configured.
    pub fn open_at(root: &Path, pin: u32) -> ServerResult<Self> {
        if !root.is_dir() {
            return Err(ServerError::GpioUnavailable(format!(
                "{} not present",
                root.display()
            )));
        }

        let actuator = Self {
            pin,
            root: root.to_path_buf(),
        };

        if !actuator.pin_dir().is_dir() {
            fs::write(root.join("export"), pin.to_string()).map_err(|e| {
                ServerError::GpioUnavailable(format!("cannot export pin {pin}: {e}"))
            })?;
            // The pin directory can take a moment to materialize after export.
            for _ in 0..10 {
                if actuator.pin_dir().is_dir() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(10));
            }
        }

        fs::write(actuator.pin_dir().join("direction"), "out").map_err(|e| {
            ServerError::GpioUnavailable(format!("cannot set pin {pin} direction: {e}"))
        })?;
        actuator
            .write_value(LOCKED)
            .map_err(|e| ServerError::GpioUnavailable(format!("cannot drive pin {pin}: {e}")))?;

        info!(pin, "gpio actuator ready, lock engaged");
        Ok(actuator)
    }

    fn pin_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    fn write_value(&self, value: &str) -> std::io::Result<()> {
        fs::write(self.pin_dir().join("value"), value)
    }

    fn drive(&self, value: &str) {
        if let Err(e) = self.write_value(value) {
            warn!(pin = self.pin, value, error = %e, "gpio write failed");
        }
    }
}

impl Actuator for GpioActuator {
    fn unlock_cycle(&self, hold: Duration) {
        info!(pin = self.pin, hold_secs = hold.as_secs_f64(), "unlocking door");
        self.drive(UNLOCKED);
        std::thread::sleep(hold);
        self.drive(LOCKED);
        info!(pin = self.pin, "door locked again");
    }

    fn force_locked(&self) {
        self.drive(LOCKED);
    }

    fn release(&self) {
        self.drive(LOCKED);
        if let Err(e) = fs::write(self.root.join("unexport"), self.pin.to_string()) {
            warn!(pin = self.pin, error = %e, "gpio unexport failed");
        }
    }
}

/// Simulation backend used when no GPIO hardware is present.
///
/// Performs the same timed sequence as the pin driver and records every
/// unlock event, so tests and development hosts observe identical behavior.
#[derive(Debug)]
pub struct SimulatedActuator {
    events: Mutex<Vec<Duration>>,
    locked: AtomicBool,
}

impl SimulatedActuator {
    /// Creates a simulated actuator in the locked state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            locked: AtomicBool::new(true),
        }
    }

    /// Returns the hold duration of every unlock cycle run so far.
    #[must_use]
    pub fn unlock_events(&self) -> Vec<Duration> {
        self.events.lock().clone()
    }

    /// Returns the simulated output state.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for SimulatedActuator {
    fn unlock_cycle(&self, hold: Duration) {
        info!(hold_secs = hold.as_secs_f64(), "[simulation] door unlocked");
        self.locked.store(false, Ordering::SeqCst);
        std::thread::sleep(hold);
        self.locked.store(true, Ordering::SeqCst);
        info!("[simulation] door locked again");
        self.events.lock().push(hold);
    }

    fn force_locked(&self) {
        self.locked.store(true, Ordering::SeqCst);
        info!("[simulation] lock engaged");
    }
}

/// Probes for GPIO hardware and selects the actuator backend.
///
/// Degrades to simulation when the pin driver cannot be opened; a missing
/// relay is a development environment, not a fatal condition.
pub fn select_actuator(pin: u32) -> Arc<dyn Actuator> {
    match GpioActuator::open(pin) {
        Ok(gpio) => Arc::new(gpio),
        Err(e) => {
            warn!(pin, error = %e, "gpio unavailable, running in simulation mode");
            Arc::new(SimulatedActuator::new())
        }
    }
}
