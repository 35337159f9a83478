//! Telemetry events and their serial line encodings.
//!
//! Every line the firmware emits is modelled as an [`AppEvent`] variant;
//! [`AppEvent::to_line`] renders the exact wire text (without the CRLF
//! terminator, which the sink adapter owns).  Downstream tooling parses
//! these lines, so the comma formats are a stable contract:
//!
//! ```text
//! NOMINAL,95
//! ANOMALY,42
//! WaterLevel,1843,87.50%
//! Pump ON
//! WaterTemp,24.31C
//! WaterTemp,ERR
//! ```

use core::fmt::Write as _;

use heapless::String;

/// Longest line is the calibration announcement; 96 bytes leaves slack.
pub const LINE_CAPACITY: usize = 96;

pub type Line = String<LINE_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Startup banner, first line after the serial port is up.
    Banner,
    /// Anomaly model ready (or not) after one-time init.
    DetectorInit { ok: bool },
    /// About to consume baseline window `n` of `total`.
    LearningIteration { n: u16, total: u16 },
    /// All warmup windows consumed.
    LearningFinished,
    /// Full-level capture starts after the settle interval.
    CalibrationPending { settle_ms: u32 },
    /// Full-level reference captured.
    CalibrationCaptured { reference: u16 },
    /// Inference result: similarity score and nominal/anomaly verdict.
    Inference { similarity: u8, nominal: bool },
    /// Raw level count and percentage of the calibrated reference.
    WaterLevel { raw: u16, percent: f32 },
    /// Commanded pump relay state this tick.
    Pump { on: bool },
    /// Water temperature, or `None` for a failed probe transaction.
    WaterTemp(Option<f32>),
}

impl AppEvent {
    /// Render the wire text for this event.
    ///
    /// Formatting into a fixed-capacity string cannot fail for these
    /// variants; a truncated line is still returned rather than panicking.
    pub fn to_line(&self) -> Line {
        let mut line = Line::new();
        let _ = match self {
            Self::Banner => write!(line, "AquaMon ready"),
            Self::DetectorInit { ok: true } => write!(line, "Anomaly detector initialized"),
            Self::DetectorInit { ok: false } => write!(line, "Anomaly detector init ERROR"),
            Self::LearningIteration { n, total } => {
                write!(line, "Learning iteration {n}/{total}")
            }
            Self::LearningFinished => write!(line, "Learning finished"),
            Self::CalibrationPending { settle_ms } => write!(
                line,
                "Calibrating full water level (stand level) in {}s...",
                settle_ms / 1000
            ),
            Self::CalibrationCaptured { reference } => {
                write!(line, "Calibrated full level ADC = {reference}")
            }
            Self::Inference { similarity, nominal } => {
                if *nominal {
                    write!(line, "NOMINAL,{similarity}")
                } else {
                    write!(line, "ANOMALY,{similarity}")
                }
            }
            Self::WaterLevel { raw, percent } => {
                write!(line, "WaterLevel,{raw},{percent:.2}%")
            }
            Self::Pump { on: true } => write!(line, "Pump ON"),
            Self::Pump { on: false } => write!(line, "Pump OFF"),
            Self::WaterTemp(Some(t)) => write!(line, "WaterTemp,{t:.2}C"),
            Self::WaterTemp(None) => write!(line, "WaterTemp,ERR"),
        };
        line
    }
}
