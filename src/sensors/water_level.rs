//! Analog water level sensing and full-level calibration.
//!
//! The level sensor is a resistive probe on an ADC1 channel: more
//! submerged probe, higher raw count.  Absolute counts are meaningless
//! until a calibration run captures the "tank full" reference, after
//! which readings are reported as a percentage of that reference.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the oneshot ADC channel via hw_init.
//! On host/test: serves an injectable atomic so tests can script levels.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use log::warn;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// ── Simulation state (host only) ──────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_LEVEL_ADC: AtomicU16 = AtomicU16::new(0);

/// Test hook: set the raw ADC count the next reads will return.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level_adc(raw: u16) {
    SIM_LEVEL_ADC.store(raw, Ordering::SeqCst);
}

// ── Sensor ────────────────────────────────────────────────────

pub struct LevelSensor;

impl LevelSensor {
    pub fn new() -> Self {
        Self
    }

    /// One raw oneshot conversion (12-bit, 0..=4095).
    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_LEVEL)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> u16 {
        SIM_LEVEL_ADC.load(Ordering::SeqCst)
    }
}

impl Default for LevelSensor {
    fn default() -> Self {
        Self::new()
    }
}

// ── Calibration ───────────────────────────────────────────────

/// Captured "tank full" ADC reference.
///
/// A reference of zero would make every later percentage computation
/// divide by zero, so the constructor clamps to 1 and flags the
/// calibration as suspect; the control loop reports the flag but keeps
/// running with the clamped value.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationState {
    reference_full: u16,
    reference_suspect: bool,
}

impl CalibrationState {
    pub fn from_raw(raw: u16) -> Self {
        if raw == 0 {
            warn!("level calibration captured 0 counts; probe disconnected?");
            return Self {
                reference_full: 1,
                reference_suspect: true,
            };
        }
        Self {
            reference_full: raw,
            reference_suspect: false,
        }
    }

    pub fn reference_full(&self) -> u16 {
        self.reference_full
    }

    pub fn is_suspect(&self) -> bool {
        self.reference_suspect
    }

    /// Express a raw reading as a percentage of the full reference,
    /// clamped to `[0, 100]` so over-reference readings (splashes, drift)
    /// never report more than a full tank.
    pub fn percent_of_full(&self, raw: u16) -> f32 {
        let pct = f32::from(raw) / f32::from(self.reference_full) * 100.0;
        pct.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_reference_is_hundred() {
        let cal = CalibrationState::from_raw(2000);
        assert_eq!(cal.percent_of_full(2000), 100.0);
        assert!(!cal.is_suspect());
    }

    #[test]
    fn percent_scales_linearly() {
        let cal = CalibrationState::from_raw(200);
        assert!((cal.percent_of_full(40) - 20.0).abs() < 1e-4);
        assert!((cal.percent_of_full(100) - 50.0).abs() < 1e-4);
        assert_eq!(cal.percent_of_full(0), 0.0);
    }

    #[test]
    fn over_reference_clamps_to_hundred() {
        let cal = CalibrationState::from_raw(1000);
        assert_eq!(cal.percent_of_full(4095), 100.0);
    }

    #[test]
    fn zero_reference_is_clamped_and_flagged() {
        let cal = CalibrationState::from_raw(0);
        assert_eq!(cal.reference_full(), 1);
        assert!(cal.is_suspect());
        // Still finite and in range.
        assert_eq!(cal.percent_of_full(500), 100.0);
    }

    #[test]
    fn sim_level_roundtrip() {
        sim_set_level_adc(1234);
        let mut sensor = LevelSensor::new();
        assert_eq!(sensor.read_raw(), 1234);
    }
}
