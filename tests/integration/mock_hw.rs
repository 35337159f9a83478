//! Scriptable mock adapters for control service integration tests.

use aquamon::app::ports::{ActuatorPort, AnomalyDetector, SensorPort, TelemetrySink};
use aquamon::error::{BusError, Result, SensorError};
use aquamon::sensors::accel::{AccelWindow, ACCEL_WINDOW_LEN};

/// Hardware mock implementing both hardware-facing ports.
pub struct MockHw {
    pub accel_fail: bool,
    pub level_raw: u16,
    pub temperature: Result<f32, SensorError>,
    pub pump_on: bool,
    /// Value written into every window slot on a successful fill.
    pub accel_value: f32,
}

impl Default for MockHw {
    fn default() -> Self {
        Self {
            accel_fail: false,
            level_raw: 2000,
            temperature: Ok(24.5),
            pump_on: false,
            accel_value: 0.1,
        }
    }
}

impl SensorPort for MockHw {
    fn power_on_accel(&mut self) -> Result<(), BusError> {
        Ok(())
    }

    fn fill_accel_window(&mut self, window: &mut AccelWindow) -> Result<(), BusError> {
        if self.accel_fail {
            return Err(BusError::RetriesExhausted);
        }
        window.as_mut_slice().fill(self.accel_value);
        Ok(())
    }

    fn read_level_raw(&mut self) -> u16 {
        self.level_raw
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature
    }
}

impl ActuatorPort for MockHw {
    fn set_pump(&mut self, on: bool) {
        self.pump_on = on;
    }

    fn pump_is_on(&self) -> bool {
        self.pump_on
    }
}

/// Detector mock with a scriptable similarity score.
pub struct MockDetector {
    pub similarity: u8,
    pub learned: u32,
    pub init_fails: bool,
}

impl Default for MockDetector {
    fn default() -> Self {
        Self {
            similarity: 95,
            learned: 0,
            init_fails: false,
        }
    }
}

impl AnomalyDetector for MockDetector {
    fn init(&mut self) -> Result<()> {
        if self.init_fails {
            Err(aquamon::error::Error::Init("model init failed"))
        } else {
            Ok(())
        }
    }

    fn learn(&mut self, _window: &AccelWindow) {
        self.learned += 1;
    }

    fn infer(&mut self, _window: &AccelWindow) -> u8 {
        self.similarity
    }

    fn window_len(&self) -> usize {
        ACCEL_WINDOW_LEN
    }
}

/// Sink that records fully framed lines, exactly as a serial listener
/// would receive them.
#[derive(Default)]
pub struct FramedSink {
    pub frames: Vec<String>,
}

impl TelemetrySink for FramedSink {
    fn send_line(&mut self, line: &str) {
        self.frames.push(format!("{line}\r\n"));
    }
}
