//! Refill pump relay driver and threshold policy.
//!
//! The pump is a dumb binary actuator on a relay GPIO.  The decision of
//! when to run it lives in [`PumpPolicy`], a pure function of the water
//! level percentage with a hysteresis band.
//!
//! ## Direction convention
//!
//! This is a **refill** pump: it switches ON when the tank level falls to
//! or below the on-threshold and OFF once the level has recovered to the
//! off-threshold.  The band between the two thresholds holds the previous
//! state so readings hovering at the boundary cannot chatter the relay
//! every cycle.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the relay GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    On,
    Off,
}

// ── Threshold policy ──────────────────────────────────────────

/// Hysteresis decision: ON at or below `on_below`, OFF at or above
/// `off_above`, hold in between.
#[derive(Debug, Clone, Copy)]
pub struct PumpPolicy {
    on_below: f32,
    off_above: f32,
}

impl PumpPolicy {
    pub fn new(on_below: f32, off_above: f32) -> Self {
        debug_assert!(off_above > on_below, "hysteresis band inverted");
        Self { on_below, off_above }
    }

    pub fn decide(&self, percent: f32, current: PumpState) -> PumpState {
        if percent <= self.on_below {
            PumpState::On
        } else if percent >= self.off_above {
            PumpState::Off
        } else {
            current
        }
    }
}

// ── Relay driver ──────────────────────────────────────────────

pub struct PumpActuator {
    state: PumpState,
}

impl PumpActuator {
    pub fn new() -> Self {
        Self {
            state: PumpState::Off,
        }
    }

    pub fn set(&mut self, state: PumpState) {
        hw_init::gpio_write(pins::PUMP_GPIO, state == PumpState::On);
        self.state = state;
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::On
    }
}

impl Default for PumpActuator {
    fn default() -> Self {
        Self::new()
    }
}
