//! Bit-banged one-wire master.
//!
//! Implements the reset/presence, bit and byte layers of the one-wire
//! protocol on a single [`GpioLine`] plus an injected delay provider.  The
//! line is never driven high during a transaction: logic-high always comes
//! from the external pull-up after the master releases the line, which is
//! what lets the slave pull it low for presence and read slots.
//!
//! Timing follows the standard-speed slot layout (values in microseconds).
//! With a timer-backed delay these are met comfortably; with [`SpinDelay`]
//! (no hardware timer) they are approximate but inside the protocol's
//! tolerance bands.
//!
//! [`SpinDelay`]: crate::drivers::delay::SpinDelay
//!
//! This layer performs no retries: a reset without a presence pulse means
//! "no device", and the caller must abort the transaction rather than write
//! commands onto an unresponsive bus.

use embedded_hal::delay::DelayNs;

use crate::drivers::gpio_line::{GpioLine, LineMode};

// ── Standard-speed slot timing (µs) ───────────────────────────

/// Reset pulse: master holds the line low.
const RESET_LOW_US: u32 = 480;
/// Delay from release to the presence sample point (inside the 60-240 µs
/// window in which a slave asserts presence).
const PRESENCE_SAMPLE_US: u32 = 70;
/// Remainder of the reset sequence after sampling presence.
const RESET_REST_US: u32 = 410;

/// Write-1: release quickly so the pull-up raises the line.
const WRITE1_LOW_US: u32 = 6;
const WRITE1_REST_US: u32 = 64;
/// Write-0: hold low for most of the slot.
const WRITE0_LOW_US: u32 = 60;
const WRITE0_REST_US: u32 = 10;

/// Read slot: brief low to open the slot, sample within 15 µs of release.
const READ_INIT_LOW_US: u32 = 2;
const READ_SAMPLE_US: u32 = 12;
const READ_REST_US: u32 = 46;

/// One-wire master over a single reconfigurable line.
pub struct OneWireBus<L, D> {
    line: L,
    delay: D,
}

impl<L: GpioLine, D: DelayNs> OneWireBus<L, D> {
    pub fn new(line: L, delay: D) -> Self {
        Self { line, delay }
    }

    /// Issue a reset pulse and sample for a presence pulse.
    ///
    /// Returns `true` if a slave pulled the line low inside the presence
    /// window.  `false` means no device is on the bus; the caller must not
    /// proceed with the transaction.
    pub fn reset(&mut self) -> bool {
        self.line.set_mode(LineMode::DrivenLow);
        self.delay.delay_us(RESET_LOW_US);

        self.line.set_mode(LineMode::FloatingInput);
        self.delay.delay_us(PRESENCE_SAMPLE_US);

        // Presence = slave holding the released line low.
        let presence = !self.line.read();

        self.delay.delay_us(RESET_REST_US);
        presence
    }

    /// Write a single bit.  Total slot duration is constant; only the
    /// low-hold time encodes the bit value.
    pub fn write_bit(&mut self, bit: bool) {
        self.line.set_mode(LineMode::DrivenLow);
        if bit {
            self.delay.delay_us(WRITE1_LOW_US);
            self.line.set_mode(LineMode::FloatingInput);
            self.delay.delay_us(WRITE1_REST_US);
        } else {
            self.delay.delay_us(WRITE0_LOW_US);
            self.line.set_mode(LineMode::FloatingInput);
            self.delay.delay_us(WRITE0_REST_US);
        }
    }

    /// Read a single bit: open the slot, release, sample, finish the slot.
    pub fn read_bit(&mut self) -> bool {
        self.line.set_mode(LineMode::DrivenLow);
        self.delay.delay_us(READ_INIT_LOW_US);

        self.line.set_mode(LineMode::FloatingInput);
        self.delay.delay_us(READ_SAMPLE_US);
        let bit = self.line.read();

        self.delay.delay_us(READ_REST_US);
        bit
    }

    /// Write a byte, least-significant bit first.
    pub fn write_byte(&mut self, mut value: u8) {
        for _ in 0..8 {
            self.write_bit(value & 0x01 != 0);
            value >>= 1;
        }
    }

    /// Read a byte, least-significant bit first.
    pub fn read_byte(&mut self) -> u8 {
        let mut value = 0u8;
        for i in 0..8 {
            if self.read_bit() {
                value |= 1 << i;
            }
        }
        value
    }

    /// Block for a whole-millisecond interval using the bus's delay
    /// provider (used by callers for conversion waits).
    pub fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
