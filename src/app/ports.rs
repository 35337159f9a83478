//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (sensors, the pump relay, the serial port, the anomaly
//! model) implement these traits.  The
//! [`ControlService`](super::service::ControlService) consumes them via
//! generics, so the domain core never touches hardware directly and the
//! whole control loop runs against mocks on the host.

use crate::error::{BusError, Result, SensorError};
use crate::sensors::accel::AccelWindow;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to acquire sensor data.
pub trait SensorPort {
    /// Put the accelerometer into measure mode.
    fn power_on_accel(&mut self) -> Result<(), BusError>;

    /// Fully overwrite `window` with fresh acceleration samples.
    ///
    /// `RetriesExhausted` means the bus stayed wedged past the retry
    /// bound; the caller degrades rather than blocking.
    fn fill_accel_window(&mut self, window: &mut AccelWindow) -> Result<(), BusError>;

    /// One raw water level ADC conversion.
    fn read_level_raw(&mut self) -> u16;

    /// One full thermometer transaction (convert + scratchpad read).
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the refill pump.
pub trait ActuatorPort {
    fn set_pump(&mut self, on: bool);

    fn pump_is_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Telemetry sink port (domain → serial)
// ───────────────────────────────────────────────────────────────

/// The domain emits telemetry lines through this port; the adapter owns
/// framing (CRLF termination) and transport-busy retries.
pub trait TelemetrySink {
    fn send_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Anomaly detector port (domain → vibration model)
// ───────────────────────────────────────────────────────────────

/// Vibration anomaly model consuming flattened acceleration windows.
///
/// The window length is a property of the trained model; callers verify
/// it against [`ACCEL_WINDOW_LEN`](crate::sensors::accel::ACCEL_WINDOW_LEN)
/// at startup and treat a mismatch as a fatal configuration error.
pub trait AnomalyDetector {
    /// One-time model initialization.
    fn init(&mut self) -> Result<()>;

    /// Feed one baseline window during warmup.
    fn learn(&mut self, window: &AccelWindow);

    /// Score one window: similarity to the learned baseline, 0-100.
    fn infer(&mut self, window: &AccelWindow) -> u8;

    /// Flattened window length the model expects.
    fn window_len(&self) -> usize;
}
