//! System configuration parameters
//!
//! All tunable parameters for the AquaMon tank monitor.  Values are fixed at
//! build time; there is deliberately no persistent storage of configuration
//! (the monitor relearns and recalibrates on every power cycle).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Anomaly detection ---
    /// Number of learning iterations during the warm-up phase.
    pub warmup_iterations: u16,
    /// Similarity score (0-100) at or above which a window is NOMINAL.
    pub similarity_nominal_threshold: u8,

    // --- Pump hysteresis ---
    /// Water level (percent of calibrated full) at or below which the
    /// refill pump switches ON.
    pub pump_on_below_percent: f32,
    /// Water level (percent) at or above which the pump switches OFF.
    /// Must be above `pump_on_below_percent` to form a hysteresis band.
    pub pump_off_above_percent: f32,

    // --- Calibration ---
    /// Settle time before sampling the 100%-full reference (milliseconds).
    pub calibration_settle_ms: u32,

    // --- Accelerometer ---
    /// Delay between accelerometer samples (milliseconds) — sets the
    /// effective sampling rate of the acceleration window.
    pub accel_sample_delay_ms: u32,
    /// Maximum consecutive failed polls per sample before the link is
    /// declared wedged and the cycle degrades.
    pub accel_max_retries: u32,

    // --- Timing ---
    /// Inter-cycle sleep of the control loop (milliseconds).
    pub loop_interval_ms: u32,
    /// Pause between learning iterations (milliseconds).
    pub learn_pause_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Anomaly detection
            warmup_iterations: 20,
            similarity_nominal_threshold: 90,

            // Pump hysteresis
            pump_on_below_percent: 20.0,
            pump_off_above_percent: 25.0,

            // Calibration
            calibration_settle_ms: 2000,

            // Accelerometer
            accel_sample_delay_ms: 1,
            accel_max_retries: 50,

            // Timing
            loop_interval_ms: 1000, // 1 Hz
            learn_pause_ms: 50,
        }
    }
}
