//! GPIO / peripheral pin assignments for the AquaMon main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Pump relay driver
// ---------------------------------------------------------------------------

/// Digital output: HIGH = pump relay energised.
pub const PUMP_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// DS18B20 water thermometer (bit-banged one-wire)
// ---------------------------------------------------------------------------

/// One-wire data line (DQ).  Requires an external 4.7 kΩ pull-up to 3V3;
/// the firmware never enables an internal pull on this pin.
pub const ONEWIRE_DQ_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Resistive water-level probe — analog voltage via divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const WATER_LEVEL_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// I²C bus — ADXL345 accelerometer
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

/// I²C bus clock (standard mode; the ADXL345 supports up to 400 kHz).
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// UART telemetry
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
