//! Single-pin line abstraction for bit-banged protocols.
//!
//! A one-wire master needs one pin that it can drive low, drive high, or
//! release entirely so the external pull-up raises the line.  The standard
//! `embedded-hal` digital traits split input and output pins, so the
//! mode-switching contract gets its own trait here; the ESP implementation
//! reconfigures the pad direction on the fly.
//!
//! No internal pull is ever configured — the one-wire protocol relies on an
//! external 4.7 kΩ pull-up, and a missing pull-up surfaces as a protocol
//! failure (no presence pulse), not an error here.

/// Electrical mode of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Push-pull output, driven low.
    DrivenLow,
    /// Push-pull output, driven high.
    DrivenHigh,
    /// High-impedance input — the line floats to the pull-up level.
    FloatingInput,
}

/// A single reconfigurable pin.
pub trait GpioLine {
    /// Switch the pad between driven-output and floating-input mode.
    fn set_mode(&mut self, mode: LineMode);

    /// Drive the logic level.  Only meaningful in a driven mode.
    fn write(&mut self, high: bool);

    /// Sample the logic level.  Meaningful in any mode.
    fn read(&self) -> bool;
}

// ── ESP implementation ────────────────────────────────────────

/// Real GPIO pad on the ESP32-S3.  Mode switches go through raw ESP-IDF
/// calls in `hw_init`; on host targets those are no-op stubs and the line
/// always reads high (released).
pub struct EspGpioLine {
    pin: i32,
}

impl EspGpioLine {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl GpioLine for EspGpioLine {
    fn set_mode(&mut self, mode: LineMode) {
        use crate::drivers::hw_init;
        match mode {
            LineMode::DrivenLow => {
                hw_init::gpio_set_output(self.pin);
                hw_init::gpio_write(self.pin, false);
            }
            LineMode::DrivenHigh => {
                hw_init::gpio_set_output(self.pin);
                hw_init::gpio_write(self.pin, true);
            }
            LineMode::FloatingInput => {
                hw_init::gpio_set_input_floating(self.pin);
            }
        }
    }

    fn write(&mut self, high: bool) {
        crate::drivers::hw_init::gpio_write(self.pin, high);
    }

    fn read(&self) -> bool {
        crate::drivers::hw_init::gpio_read(self.pin)
    }
}
