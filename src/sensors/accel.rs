//! ADXL345 3-axis accelerometer link.
//!
//! Polls the sensor over a register-addressed bus (I²C on hardware) and
//! fills the fixed-size acceleration window consumed by the anomaly
//! detector.  Raw counts are scaled to g with the ±2g sensitivity
//! (3.9 mg/LSB).
//!
//! Per-sample polling is retried with a **bounded** retry count; exhausting
//! the bound surfaces `BusError::RetriesExhausted` so the control loop can
//! degrade instead of stalling forever on a wedged bus.

use embedded_hal::delay::DelayNs;

use crate::error::BusError;

// ── Register map / scaling ────────────────────────────────────

/// 7-bit I²C address with SDO/ALT low.
pub const ADXL345_ADDR: u8 = 0x53;
/// Power-control register; writing the measure bit starts sampling.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Measure-mode bit of POWER_CTL.
pub const POWER_CTL_MEASURE: u8 = 0x08;
/// First of six data registers (X0 X1 Y0 Y1 Z0 Z1, little-endian pairs).
pub const REG_DATAX0: u8 = 0x32;

/// ±2g full-scale sensitivity: 3.9 mg per LSB.
pub const G_PER_LSB: f32 = 0.0039;

// ── Acceleration window ───────────────────────────────────────

/// Flattened window length shared with the anomaly detector.  100 triaxial
/// readings × 3 axes.  A detector expecting any other shape is a fatal
/// configuration error at startup, not a runtime condition.
pub const ACCEL_WINDOW_LEN: usize = 300;
/// Triaxial samples per window.
pub const ACCEL_SAMPLES: usize = ACCEL_WINDOW_LEN / 3;

/// Fixed-capacity acceleration window.  Always fully overwritten by
/// [`AccelerometerLink::fill_window`] before being handed to the detector.
#[derive(Debug, Clone)]
pub struct AccelWindow {
    data: [f32; ACCEL_WINDOW_LEN],
}

impl AccelWindow {
    pub fn new() -> Self {
        Self {
            data: [0.0; ACCEL_WINDOW_LEN],
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn set_sample(&mut self, slot: usize, v: Vector3) {
        self.data[slot * 3] = f32::from(v.x) * G_PER_LSB;
        self.data[slot * 3 + 1] = f32::from(v.y) * G_PER_LSB;
        self.data[slot * 3 + 2] = f32::from(v.z) * G_PER_LSB;
    }
}

impl Default for AccelWindow {
    fn default() -> Self {
        Self::new()
    }
}

// ── Raw reading ───────────────────────────────────────────────

/// One raw triaxial reading, signed 16-bit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector3 {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

// ── Register bus port ─────────────────────────────────────────

/// Register-addressed bus the accelerometer hangs off (I²C-like).
pub trait RegisterBus {
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), BusError>;
    fn read_regs(&mut self, start: u8, buf: &mut [u8]) -> Result<(), BusError>;
}

// ── Link ──────────────────────────────────────────────────────

pub struct AccelerometerLink<B> {
    bus: B,
    max_retries: u32,
    sample_delay_ms: u32,
}

impl<B: RegisterBus> AccelerometerLink<B> {
    pub fn new(bus: B, max_retries: u32, sample_delay_ms: u32) -> Self {
        Self {
            bus,
            max_retries,
            sample_delay_ms,
        }
    }

    /// Set the measure bit so the device starts converting.
    pub fn power_on(&mut self) -> Result<(), BusError> {
        self.bus.write_reg(REG_POWER_CTL, POWER_CTL_MEASURE)
    }

    /// One triaxial poll: six bytes from DATAX0, decoded as three
    /// little-endian i16 values.
    pub fn poll_once(&mut self) -> Result<Vector3, BusError> {
        let mut buf = [0u8; 6];
        self.bus.read_regs(REG_DATAX0, &mut buf)?;
        Ok(Vector3 {
            x: i16::from_le_bytes([buf[0], buf[1]]),
            y: i16::from_le_bytes([buf[2], buf[3]]),
            z: i16::from_le_bytes([buf[4], buf[5]]),
        })
    }

    /// Fully overwrite `window` with fresh samples.
    ///
    /// Each sample slot retries `poll_once` up to the configured bound
    /// (1 ms between attempts); exhausting the bound aborts the fill with
    /// `RetriesExhausted` and leaves the window contents unspecified.
    pub fn fill_window(
        &mut self,
        window: &mut AccelWindow,
        delay: &mut impl DelayNs,
    ) -> Result<(), BusError> {
        for slot in 0..ACCEL_SAMPLES {
            let v = self.poll_bounded(delay)?;
            window.set_sample(slot, v);
            delay.delay_ms(self.sample_delay_ms);
        }
        Ok(())
    }

    fn poll_bounded(&mut self, delay: &mut impl DelayNs) -> Result<Vector3, BusError> {
        let mut attempts = 0u32;
        loop {
            match self.poll_once() {
                Ok(v) => return Ok(v),
                Err(_) => {
                    attempts += 1;
                    if attempts >= self.max_retries {
                        return Err(BusError::RetriesExhausted);
                    }
                    delay.delay_ms(1);
                }
            }
        }
    }
}

// ── ESP I²C register bus ──────────────────────────────────────

/// Register bus over the ESP-IDF I²C master driver.  On host targets the
/// hw_init helpers are stubs, so tests inject their own mock bus instead.
pub struct I2cRegisterBus {
    addr: u8,
}

impl I2cRegisterBus {
    pub fn new(addr: u8) -> Self {
        Self { addr }
    }
}

impl RegisterBus for I2cRegisterBus {
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), BusError> {
        if crate::drivers::hw_init::i2c_write_reg(self.addr, reg, value) {
            Ok(())
        } else {
            Err(BusError::TransactionFailed)
        }
    }

    fn read_regs(&mut self, start: u8, buf: &mut [u8]) -> Result<(), BusError> {
        if crate::drivers::hw_init::i2c_read_regs(self.addr, start, buf) {
            Ok(())
        } else {
            Err(BusError::TransactionFailed)
        }
    }
}
