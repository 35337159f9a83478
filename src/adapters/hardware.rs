//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the thermometer, accelerometer link, level sensor, and pump
//! driver, exposing them through [`SensorPort`] and [`ActuatorPort`].
//! This is the only module besides `drivers::hw_init` that touches actual
//! hardware.  On non-espidf targets the underlying drivers use cfg-gated
//! simulation stubs, so the same adapter type runs in host tests.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::gpio_line::GpioLine;
use crate::drivers::pump::{PumpActuator, PumpState};
use crate::error::{BusError, SensorError};
use crate::sensors::accel::{AccelWindow, AccelerometerLink, RegisterBus};
use crate::sensors::thermal::ThermalProbe;
use crate::sensors::water_level::LevelSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B, L, D, AD> {
    accel: AccelerometerLink<B>,
    probe: ThermalProbe<L, D>,
    level: LevelSensor,
    pump: PumpActuator,
    /// Delay provider for the accelerometer sampling cadence.
    accel_delay: AD,
}

impl<B, L, D, AD> HardwareAdapter<B, L, D, AD>
where
    B: RegisterBus,
    L: GpioLine,
    D: DelayNs,
    AD: DelayNs,
{
    pub fn new(
        accel: AccelerometerLink<B>,
        probe: ThermalProbe<L, D>,
        level: LevelSensor,
        pump: PumpActuator,
        accel_delay: AD,
    ) -> Self {
        Self {
            accel,
            probe,
            level,
            pump,
            accel_delay,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<B, L, D, AD> SensorPort for HardwareAdapter<B, L, D, AD>
where
    B: RegisterBus,
    L: GpioLine,
    D: DelayNs,
    AD: DelayNs,
{
    fn power_on_accel(&mut self) -> Result<(), BusError> {
        self.accel.power_on()
    }

    fn fill_accel_window(&mut self, window: &mut AccelWindow) -> Result<(), BusError> {
        self.accel.fill_window(window, &mut self.accel_delay)
    }

    fn read_level_raw(&mut self) -> u16 {
        self.level.read_raw()
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.probe.read_temperature()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<B, L, D, AD> ActuatorPort for HardwareAdapter<B, L, D, AD>
where
    B: RegisterBus,
    L: GpioLine,
    D: DelayNs,
    AD: DelayNs,
{
    fn set_pump(&mut self, on: bool) {
        self.pump.set(if on { PumpState::On } else { PumpState::Off });
    }

    fn pump_is_on(&self) -> bool {
        self.pump.is_running()
    }
}
