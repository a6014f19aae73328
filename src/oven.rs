//! Shared oven state.
//!
//! A single [`Oven`] handle is created at startup and cloned into the
//! simulation engine and every connection handler. All reads and writes of
//! the underlying [`OvenState`] happen under one mutex, and no caller holds
//! it across I/O.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::data::{OvenStatus, Profile};

/// Ambient temperature the oven starts at and cools back down to, in °C.
pub const AMBIENT_TEMP: f64 = 25.0;

/// The oven's mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct OvenState {
    /// Simulated oven temperature in °C.
    pub current_temp: f64,
    /// Temperature the simulation is driving toward in °C.
    pub target_temp: f64,
    /// Lifecycle status.
    pub status: OvenStatus,
    /// Seconds remaining in the current phase.
    ///
    /// Only meaningful while soaking or reflowing; zero otherwise.
    pub timer: i64,
    /// Last accepted profile.
    pub profile: Profile,
}

impl OvenState {
    /// Create the power-on state.
    pub fn new() -> Self {
        Self {
            current_temp: AMBIENT_TEMP,
            target_temp: 0.0,
            status: OvenStatus::Idle,
            timer: 0,
            profile: Profile::default(),
        }
    }

    /// Install a profile and begin heating toward its soak temperature.
    pub fn start(&mut self, profile: Profile) {
        self.profile = profile;
        self.target_temp = profile.soak_temp;
        self.status = OvenStatus::Heating;
        self.timer = 0;
    }

    /// Abort the run and cool down to ambient.
    pub fn stop(&mut self) {
        self.status = OvenStatus::Cooling;
        self.target_temp = AMBIENT_TEMP;
        self.timer = 0;
    }

    /// Capture the fields reported on the wire.
    pub fn snapshot(&self) -> OvenSnapshot {
        OvenSnapshot {
            current_temp: self.current_temp,
            target_temp: self.target_temp,
            status: self.status,
            timer: self.timer,
        }
    }
}

impl Default for OvenState {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent copy of the reported oven fields, taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OvenSnapshot {
    /// Oven temperature in °C.
    pub current_temp: f64,
    /// Target temperature in °C.
    pub target_temp: f64,
    /// Lifecycle status.
    pub status: OvenStatus,
    /// Seconds remaining in the current phase.
    pub timer: i64,
}

/// Cloneable handle to the single shared oven.
#[derive(Debug, Clone, Default)]
pub struct Oven {
    state: Arc<Mutex<OvenState>>,
}

impl Oven {
    /// Create a new oven in the power-on state.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(OvenState::new())),
        }
    }

    /// Take a consistent snapshot of the reported fields.
    pub fn snapshot(&self) -> OvenSnapshot {
        self.state.lock().snapshot()
    }

    /// Get the last accepted profile.
    pub fn profile(&self) -> Profile {
        self.state.lock().profile
    }

    /// Install a profile and start heating. Returns the resulting snapshot.
    pub fn start(&self, profile: Profile) -> OvenSnapshot {
        let mut state = self.state.lock();
        state.start(profile);
        state.snapshot()
    }

    /// Abort the run and start cooling. Returns the resulting snapshot.
    pub fn stop(&self) -> OvenSnapshot {
        let mut state = self.state.lock();
        state.stop();
        state.snapshot()
    }

    /// Run `f` with exclusive access to the state.
    ///
    /// `f` must not block; the lock is held for its whole duration.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut OvenState) -> R) -> R {
        f(&mut self.state.lock())
    }
}
