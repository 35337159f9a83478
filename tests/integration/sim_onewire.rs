//! Simulated one-wire slave with virtual time.
//!
//! [`SimLine`] and [`SimDelay`] share one interior-mutable bus state: the
//! delay provider advances a virtual microsecond clock instead of
//! sleeping, and the line decodes the master's waveform exactly the way a
//! slave would — by measuring how long the master held the line low
//! before releasing it:
//!
//! ```text
//!   low ≥ 400 µs            reset pulse   → schedule presence pulse
//!   low ≤ 15 µs, tx queued  read slot     → pop a tx bit, pull low for 0
//!   low ≤ 15 µs, tx empty   write-1 slot
//!   otherwise               write-0 slot
//! ```
//!
//! Received bytes are assembled LSB-first and fed to the configured
//! device role.  A 750 ms conversion wait costs nothing in wall time.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use aquamon::drivers::gpio_line::{GpioLine, LineMode};
use aquamon::sensors::thermal;

const RESET_MIN_LOW_US: u64 = 400;
const WRITE1_MAX_LOW_US: u64 = 15;
/// Presence pulse: asserted from release until this long after it.
const PRESENCE_HOLD_US: u64 = 100;
/// Device holds a read-slot zero low this long after the slot opens.
const READ_ZERO_HOLD_US: u64 = 30;

// ── Device roles ──────────────────────────────────────────────

enum DeviceRole {
    /// DS18B20-style thermometer: skip-ROM, convert, read-scratchpad.
    Thermometer,
    /// Echoes every received byte back through read slots.
    Loopback,
}

// ── Shared bus state ──────────────────────────────────────────

struct Inner {
    now_us: u64,
    master_driving_low: bool,
    low_since_us: u64,
    device_low_until_us: u64,
    present: bool,
    role: DeviceRole,
    scratchpad: [u8; 9],
    rx_bits: Vec<bool>,
    tx_bits: VecDeque<bool>,
    write_slots: u32,
    resets: u32,
}

impl Inner {
    fn on_release(&mut self) {
        let duration = self.now_us - self.low_since_us;

        if duration >= RESET_MIN_LOW_US {
            self.resets += 1;
            self.rx_bits.clear();
            self.tx_bits.clear();
            if self.present {
                self.device_low_until_us = self.now_us + PRESENCE_HOLD_US;
            }
        } else if duration <= WRITE1_MAX_LOW_US && !self.tx_bits.is_empty() {
            // Read slot: the master opened it, the device answers.
            if let Some(bit) = self.tx_bits.pop_front() {
                if !bit {
                    self.device_low_until_us = self.now_us + READ_ZERO_HOLD_US;
                }
            }
        } else {
            self.write_slots += 1;
            self.rx_bits.push(duration <= WRITE1_MAX_LOW_US);
            if self.rx_bits.len() == 8 {
                let mut byte = 0u8;
                for (i, bit) in self.rx_bits.iter().enumerate() {
                    if *bit {
                        byte |= 1 << i;
                    }
                }
                self.rx_bits.clear();
                self.on_byte(byte);
            }
        }
    }

    fn on_byte(&mut self, byte: u8) {
        match self.role {
            DeviceRole::Loopback => self.queue_byte(byte),
            DeviceRole::Thermometer => match byte {
                thermal::CMD_SKIP_ROM | thermal::CMD_CONVERT_T => {}
                thermal::CMD_READ_SCRATCHPAD => {
                    for byte in self.scratchpad {
                        self.queue_byte(byte);
                    }
                }
                _ => {}
            },
        }
    }

    fn queue_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.tx_bits.push_back(byte & (1 << i) != 0);
        }
    }

    fn line_level(&self) -> bool {
        !(self.master_driving_low || self.now_us < self.device_low_until_us)
    }
}

// ── Public harness handles ────────────────────────────────────

pub struct SimBus {
    inner: Rc<RefCell<Inner>>,
}

impl SimBus {
    fn with_role(role: DeviceRole, present: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                now_us: 0,
                master_driving_low: false,
                low_since_us: 0,
                device_low_until_us: 0,
                present,
                role,
                scratchpad: [0; 9],
                rx_bits: Vec::new(),
                tx_bits: VecDeque::new(),
                write_slots: 0,
                resets: 0,
            })),
        }
    }

    /// Thermometer device serving the given scratchpad.
    pub fn thermometer(scratchpad: [u8; 9]) -> Self {
        let bus = Self::with_role(DeviceRole::Thermometer, true);
        bus.inner.borrow_mut().scratchpad = scratchpad;
        bus
    }

    /// Empty bus: no device answers the reset.
    pub fn absent() -> Self {
        Self::with_role(DeviceRole::Thermometer, false)
    }

    /// Byte-echo device for codec round-trips.
    pub fn loopback() -> Self {
        Self::with_role(DeviceRole::Loopback, true)
    }

    pub fn line(&self) -> SimLine {
        SimLine {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Write slots the master has driven since construction.
    pub fn write_slots(&self) -> u32 {
        self.inner.borrow().write_slots
    }

    pub fn resets(&self) -> u32 {
        self.inner.borrow().resets
    }

    /// Virtual time elapsed, in microseconds.
    pub fn elapsed_us(&self) -> u64 {
        self.inner.borrow().now_us
    }
}

pub struct SimLine {
    inner: Rc<RefCell<Inner>>,
}

impl GpioLine for SimLine {
    fn set_mode(&mut self, mode: LineMode) {
        let mut inner = self.inner.borrow_mut();
        match mode {
            LineMode::DrivenLow => {
                if !inner.master_driving_low {
                    inner.master_driving_low = true;
                    inner.low_since_us = inner.now_us;
                }
            }
            LineMode::DrivenHigh | LineMode::FloatingInput => {
                if inner.master_driving_low {
                    inner.master_driving_low = false;
                    inner.on_release();
                }
            }
        }
    }

    fn write(&mut self, high: bool) {
        let mut inner = self.inner.borrow_mut();
        if inner.master_driving_low && high {
            inner.master_driving_low = false;
            inner.on_release();
        } else if !inner.master_driving_low && !high {
            inner.master_driving_low = true;
            inner.low_since_us = inner.now_us;
        }
    }

    fn read(&self) -> bool {
        self.inner.borrow().line_level()
    }
}

pub struct SimDelay {
    inner: Rc<RefCell<Inner>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = u64::from(ns.div_ceil(1000));
        self.inner.borrow_mut().now_us += us;
    }
}

/// Scratchpad with a valid trailing CRC for the given raw temperature.
pub fn scratchpad_for_raw(raw: i16) -> [u8; 9] {
    let [lsb, msb] = raw.to_le_bytes();
    let mut pad = [lsb, msb, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x00];
    pad[8] = thermal::crc8(&pad[..8]);
    pad
}
