//! Shared mutable context threaded through every FSM handler.
//!
//! `MonitorContext` is the single struct state handlers read from and
//! write to: latest sensor snapshot, actuator command output, lifecycle
//! progress, timing, and configuration.  Think of it as the "blackboard"
//! in a blackboard architecture — there is no other shared state.

use crate::config::MonitorConfig;

// ---------------------------------------------------------------------------
// Sensor snapshot (written by the control service before each tick)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of the last acquisition pass.
#[derive(Debug, Clone, Copy)]
pub struct SensorSnapshot {
    /// The accelerometer produced a full window this pass.
    pub accel_ok: bool,
    /// Similarity score (0-100) from the last inference, if one ran.
    pub similarity: Option<u8>,
    /// Raw water level ADC count.
    pub level_raw: u16,
    /// Water level as a percentage of the calibrated full reference.
    pub level_percent: f32,
    /// Last valid temperature (°C); `None` when the probe was absent or
    /// the scratchpad failed its CRC.
    pub temperature_c: Option<f32>,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            accel_ok: true,
            similarity: None,
            level_raw: 0,
            level_percent: 0.0,
            temperature_c: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator commands (written by the control service; applied each tick)
// ---------------------------------------------------------------------------

/// Actuator command output of one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActuatorCommands {
    /// Refill pump relay state requested by the threshold policy.
    pub pump_on: bool,
}

// ---------------------------------------------------------------------------
// MonitorContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct MonitorContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Sensor data --
    /// Latest acquisition results.  Updated before each FSM tick.
    pub sensors: SensorSnapshot,

    // -- Actuator outputs --
    pub commands: ActuatorCommands,

    // -- Lifecycle progress --
    /// Completed learning iterations (monotonic, never reset).
    pub learned_iterations: u16,
    /// The full-level calibration has been captured.
    pub calibration_done: bool,

    // -- Configuration --
    pub config: MonitorConfig,
}

impl MonitorContext {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            sensors: SensorSnapshot::default(),
            commands: ActuatorCommands::default(),
            learned_iterations: 0,
            calibration_done: false,
            config,
        }
    }

    /// True once the detector has consumed every warmup window.
    pub fn learning_complete(&self) -> bool {
        self.learned_iterations >= self.config.warmup_iterations
    }
}
