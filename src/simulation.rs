//! Thermal and phase-transition model.
//!
//! The [`SimulationEngine`] advances the shared [`Oven`] once per tick for
//! the lifetime of the process. Each tick is a total function of the prior
//! state, so a delayed tick only stretches the run in real time.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, info_span, trace, Instrument};

use crate::data::OvenStatus;
use crate::oven::{Oven, OvenState, AMBIENT_TEMP};

/// Heating and cooling rates applied per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalModel {
    /// Temperature rise per tick while heating, in °C.
    pub heat_rate: f64,
    /// Temperature drop per tick while cooling, in °C.
    pub cool_rate: f64,
}

impl ThermalModel {
    /// Default heat rate (1.0 °C per tick).
    pub const DEFAULT_HEAT_RATE: f64 = 1.0;
    /// Default cool rate (0.5 °C per tick).
    pub const DEFAULT_COOL_RATE: f64 = 0.5;
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self {
            heat_rate: Self::DEFAULT_HEAT_RATE,
            cool_rate: Self::DEFAULT_COOL_RATE,
        }
    }
}

/// A change of oven status caused by a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Status before the tick.
    pub from: OvenStatus,
    /// Status after the tick.
    pub to: OvenStatus,
}

impl fmt::Display for PhaseTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Advance `state` by one tick.
///
/// The soak countdown and cooling step are selected by the status the tick
/// started in, so a phase entered while heating begins counting on the next
/// tick.
pub fn step(state: &mut OvenState, model: &ThermalModel) -> Option<PhaseTransition> {
    let status = state.status;
    let current_temp = state.current_temp;

    if status.is_heating_phase() && current_temp < state.target_temp {
        state.current_temp += model.heat_rate;
        if state.current_temp >= state.target_temp {
            state.current_temp = state.target_temp;
            match status {
                OvenStatus::Heating => {
                    state.status = OvenStatus::Soaking;
                    state.timer = state.profile.soak_time.max(0);
                }
                OvenStatus::Reflowing => {
                    state.status = OvenStatus::Cooling;
                    state.target_temp = AMBIENT_TEMP;
                    state.timer = 0;
                }
                // Soak exit is driven by the timer below.
                _ => {}
            }
        }
    }

    match status {
        OvenStatus::Soaking => {
            state.timer -= 1;
            if state.timer <= 0 {
                state.status = OvenStatus::Reflowing;
                state.target_temp = state.profile.reflow_temp;
                state.timer = state.profile.reflow_time.max(0);
            }
        }
        OvenStatus::Cooling => {
            if current_temp > AMBIENT_TEMP {
                state.current_temp = (current_temp - model.cool_rate).max(AMBIENT_TEMP);
            } else {
                state.current_temp = AMBIENT_TEMP;
                state.status = OvenStatus::Complete;
                state.timer = 0;
            }
        }
        _ => {}
    }

    (state.status != status).then_some(PhaseTransition {
        from: status,
        to: state.status,
    })
}

/// Periodic driver for the thermal model.
pub struct SimulationEngine {
    /// Shared oven.
    oven: Oven,
    /// Heating and cooling rates.
    model: ThermalModel,
    /// Wall-clock time between ticks.
    tick_interval: Duration,
    /// Ticks performed so far.
    ticks: Arc<AtomicU64>,
    /// Running flag.
    is_running: Arc<AtomicBool>,
    /// Background task handle.
    handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl SimulationEngine {
    /// Default time between ticks.
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

    /// Create an engine driving `oven`. Nothing runs until [`start`](Self::start).
    pub fn new(oven: Oven, model: ThermalModel, tick_interval: Duration) -> Self {
        Self {
            oven,
            model,
            tick_interval,
            ticks: Arc::new(AtomicU64::new(0)),
            is_running: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Perform one tick immediately.
    pub fn tick(&self) -> Option<PhaseTransition> {
        Self::advance(&self.oven, &self.model, &self.ticks)
    }

    /// Spawn the background tick loop. Does nothing if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        if self.is_running.swap(true, Ordering::SeqCst) {
            debug!("Simulation already running");
            return;
        }

        info!(
            "Oven simulation started (tick every {:?})",
            self.tick_interval
        );

        let oven = self.oven.clone();
        let model = self.model;
        let ticks = self.ticks.clone();
        let is_running = self.is_running.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(
            async move {
                let mut interval = tokio::time::interval(tick_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first tick of an interval completes immediately.
                interval.tick().await;

                while is_running.load(Ordering::SeqCst) {
                    interval.tick().await;
                    Self::advance(&oven, &model, &ticks);
                }

                debug!("Simulation task ended");
            }
            .instrument(info_span!("simulation")),
        );

        *self.handle.lock() = Some(handle);
    }

    /// Stop the background tick loop and wait for it to finish.
    pub async fn stop(&self) {
        if !self.is_running.swap(false, Ordering::SeqCst) {
            return;
        }

        info!("Stopping oven simulation");

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
    }

    /// Check if the background loop is running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Number of ticks performed so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Get the oven this engine drives.
    pub fn oven(&self) -> &Oven {
        &self.oven
    }

    fn advance(oven: &Oven, model: &ThermalModel, ticks: &AtomicU64) -> Option<PhaseTransition> {
        let (transition, snapshot) = oven.with_state(|state| {
            let transition = step(state, model);
            (transition, state.snapshot())
        });
        let count = ticks.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(transition) = transition {
            info!(
                "Transition: {} at {:.1}°C (target {:.1}°C, timer {})",
                transition, snapshot.current_temp, snapshot.target_temp, snapshot.timer
            );
        } else if count % 5 == 0 && !snapshot.status.is_resting() {
            debug!(
                "Simulation: {} | Temp: {:.1}°C | Timer: {}",
                snapshot.status, snapshot.current_temp, snapshot.timer
            );
        } else {
            trace!("Tick {}: {:?}", count, snapshot);
        }

        transition
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.is_running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }
}
