//! DS18B20 water thermometer over the bit-banged one-wire bus.
//!
//! Single-device bus: every read is a fresh skip-ROM transaction —
//! convert, block for the worst-case 12-bit conversion time, then read the
//! full scratchpad and validate its CRC-8 before trusting the reading.
//! A missing probe surfaces as `SensorError::NotPresent`; callers must
//! never substitute a sentinel temperature.

use embedded_hal::delay::DelayNs;

use crate::drivers::gpio_line::GpioLine;
use crate::drivers::onewire::OneWireBus;
use crate::error::SensorError;

// ── Command set ───────────────────────────────────────────────

/// Address the single device without its ROM ID.
pub const CMD_SKIP_ROM: u8 = 0xCC;
/// Start a temperature conversion.
pub const CMD_CONVERT_T: u8 = 0x44;
/// Read the 9-byte scratchpad (temperature LSB/MSB first).
pub const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case 12-bit conversion time.  The design reads no "conversion
/// complete" slot, so this is a mandatory blocking wait.
const CONVERT_WAIT_MS: u32 = 750;

const SCRATCHPAD_LEN: usize = 9;

// ── Probe ─────────────────────────────────────────────────────

pub struct ThermalProbe<L, D> {
    bus: OneWireBus<L, D>,
}

impl<L: GpioLine, D: DelayNs> ThermalProbe<L, D> {
    pub fn new(bus: OneWireBus<L, D>) -> Self {
        Self { bus }
    }

    /// Run one full convert/read transaction and return °C.
    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        if !self.bus.reset() {
            return Err(SensorError::NotPresent);
        }
        self.bus.write_byte(CMD_SKIP_ROM);
        self.bus.write_byte(CMD_CONVERT_T);

        self.bus.wait_ms(CONVERT_WAIT_MS);

        if !self.bus.reset() {
            return Err(SensorError::NotPresent);
        }
        self.bus.write_byte(CMD_SKIP_ROM);
        self.bus.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratchpad = [0u8; SCRATCHPAD_LEN];
        for byte in &mut scratchpad {
            *byte = self.bus.read_byte();
        }

        if crc8(&scratchpad[..8]) != scratchpad[8] {
            return Err(SensorError::CrcMismatch);
        }

        Ok(decode_temperature(scratchpad[0], scratchpad[1]))
    }
}

// ── Pure helpers ──────────────────────────────────────────────

/// Decode a raw scratchpad pair into °C.  12-bit two's-complement
/// fixed-point, 1/16 °C per LSB.
pub fn decode_temperature(lsb: u8, msb: u8) -> f32 {
    f32::from(i16::from_le_bytes([lsb, msb])) / 16.0
}

/// CRC-8/Maxim (X^8 + X^5 + X^4 + 1, reflected).  Including the CRC byte
/// itself in the input yields 0 for an intact frame.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for byte in data {
        crc ^= byte;
        for _ in 0..u8::BITS {
            let bit = crc & 0x01;
            crc >>= 1;
            if bit != 0 {
                crc ^= 0x8C;
            }
        }
    }
    crc
}
