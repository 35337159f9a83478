//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the FSM, the shared context, the pump policy,
//! and the captured level calibration.  All I/O flows through port traits
//! injected at call sites, so the entire warmup → calibration → monitoring
//! lifecycle runs against mock adapters on the host.
//!
//! ```text
//!   SensorPort ──▶ ┌─────────────────────────┐ ──▶ TelemetrySink
//!                  │      ControlService      │
//!  ActuatorPort ◀──│  FSM · policy · calib    │◀──▶ AnomalyDetector
//!                  └─────────────────────────┘
//! ```
//!
//! The service is tick-driven: the binary's main loop calls [`tick`] once
//! per interval and owns the inter-tick sleep.  One tick performs the work
//! of the current lifecycle state only; the telemetry emission order inside
//! a monitoring tick (inference, then level and pump, then temperature) is
//! part of the serial contract.
//!
//! [`tick`]: ControlService::tick

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::MonitorConfig;
use crate::drivers::pump::{PumpPolicy, PumpState};
use crate::error::{Error, Result};
use crate::fsm::context::MonitorContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::sensors::accel::{AccelWindow, ACCEL_WINDOW_LEN};
use crate::sensors::water_level::CalibrationState;

use super::events::AppEvent;
use super::ports::{ActuatorPort, AnomalyDetector, SensorPort, TelemetrySink};

/// Settle time after raising the accelerometer measure bit.
const ACCEL_POWER_ON_SETTLE_MS: u32 = 100;

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

pub struct ControlService {
    fsm: Fsm,
    ctx: MonitorContext,
    policy: PumpPolicy,
    /// Captured full-level reference; `None` until the calibrating pass.
    calibration: Option<CalibrationState>,
    /// Scratch acquisition window, reused every tick.
    window: AccelWindow,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: MonitorConfig) -> Self {
        let policy = PumpPolicy::new(config.pump_on_below_percent, config.pump_off_above_percent);
        let ctx = MonitorContext::new(config);
        let fsm = Fsm::new(build_state_table(), StateId::Learning);

        Self {
            fsm,
            ctx,
            policy,
            calibration: None,
            window: AccelWindow::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time startup: banner, detector init, accelerometer power-on.
    ///
    /// A detector whose expected window length disagrees with the
    /// acquisition window is a build/deployment mismatch and fatal.  A
    /// failed detector init or accelerometer power-on is reported and
    /// tolerated: the first acquisition pass will degrade if the fault
    /// persists.
    pub fn start(
        &mut self,
        sensors: &mut impl SensorPort,
        detector: &mut impl AnomalyDetector,
        sink: &mut impl TelemetrySink,
        delay: &mut impl DelayNs,
    ) -> Result<()> {
        self.emit(sink, AppEvent::Banner);

        if detector.window_len() != ACCEL_WINDOW_LEN {
            return Err(Error::Config("detector window length mismatch"));
        }

        match detector.init() {
            Ok(()) => self.emit(sink, AppEvent::DetectorInit { ok: true }),
            Err(e) => {
                warn!("anomaly detector init failed: {e}");
                self.emit(sink, AppEvent::DetectorInit { ok: false });
            }
        }

        if let Err(e) = sensors.power_on_accel() {
            warn!("accelerometer power-on failed: {e}");
        }
        delay.delay_ms(ACCEL_POWER_ON_SETTLE_MS);

        self.fsm.start(&mut self.ctx);
        info!("control service started in {:?}", self.fsm.current_state());
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle for the current lifecycle state.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        detector: &mut impl AnomalyDetector,
        sink: &mut impl TelemetrySink,
        delay: &mut impl DelayNs,
    ) {
        match self.fsm.current_state() {
            StateId::Learning => self.learning_pass(hw, detector, sink, delay),
            StateId::Calibrating => self.calibrating_pass(hw, sink, delay),
            StateId::Monitoring | StateId::Degraded => {
                self.monitoring_pass(hw, detector, sink);
            }
        }

        let before = self.fsm.current_state();
        self.fsm.tick(&mut self.ctx);

        // Learning completes mid-tick; announce it on the transition edge.
        if before == StateId::Learning && self.fsm.current_state() == StateId::Calibrating {
            self.emit(sink, AppEvent::LearningFinished);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn current_state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn context(&self) -> &MonitorContext {
        &self.ctx
    }

    pub fn calibration(&self) -> Option<&CalibrationState> {
        self.calibration.as_ref()
    }

    // ── State passes ──────────────────────────────────────────

    fn learning_pass(
        &mut self,
        hw: &mut impl SensorPort,
        detector: &mut impl AnomalyDetector,
        sink: &mut impl TelemetrySink,
        delay: &mut impl DelayNs,
    ) {
        let n = self.ctx.learned_iterations + 1;
        let total = self.ctx.config.warmup_iterations;
        self.emit(sink, AppEvent::LearningIteration { n, total });

        match hw.fill_accel_window(&mut self.window) {
            Ok(()) => {
                detector.learn(&self.window);
                self.ctx.learned_iterations += 1;
                self.ctx.sensors.accel_ok = true;
                delay.delay_ms(self.ctx.config.learn_pause_ms);
            }
            Err(e) => {
                warn!("learning window acquisition failed: {e}");
                self.ctx.sensors.accel_ok = false;
            }
        }
    }

    fn calibrating_pass(
        &mut self,
        hw: &mut impl SensorPort,
        sink: &mut impl TelemetrySink,
        delay: &mut impl DelayNs,
    ) {
        let settle_ms = self.ctx.config.calibration_settle_ms;
        self.emit(sink, AppEvent::CalibrationPending { settle_ms });
        delay.delay_ms(settle_ms);

        let raw = hw.read_level_raw();
        let cal = CalibrationState::from_raw(raw);
        self.emit(
            sink,
            AppEvent::CalibrationCaptured {
                reference: cal.reference_full(),
            },
        );
        self.calibration = Some(cal);
        self.ctx.calibration_done = true;
    }

    /// Steady-state pass, shared by Monitoring and Degraded: the degraded
    /// state still attempts acquisition every tick (that is how recovery
    /// is detected) and keeps the level, pump, and temperature paths
    /// running at full function.
    fn monitoring_pass(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        detector: &mut impl AnomalyDetector,
        sink: &mut impl TelemetrySink,
    ) {
        // 1) Vibration anomaly detection.
        match hw.fill_accel_window(&mut self.window) {
            Ok(()) => {
                let similarity = detector.infer(&self.window);
                let nominal = similarity >= self.ctx.config.similarity_nominal_threshold;
                self.ctx.sensors.accel_ok = true;
                self.ctx.sensors.similarity = Some(similarity);
                self.emit(sink, AppEvent::Inference { similarity, nominal });
            }
            Err(e) => {
                if self.ctx.sensors.accel_ok {
                    warn!("accel window acquisition failed: {e}");
                }
                self.ctx.sensors.accel_ok = false;
                self.ctx.sensors.similarity = None;
            }
        }

        // 2) Water level and pump control.
        if let Some(cal) = self.calibration {
            let raw = hw.read_level_raw();
            let percent = cal.percent_of_full(raw);
            self.ctx.sensors.level_raw = raw;
            self.ctx.sensors.level_percent = percent;
            self.emit(sink, AppEvent::WaterLevel { raw, percent });

            let current = if hw.pump_is_on() {
                PumpState::On
            } else {
                PumpState::Off
            };
            let next = self.policy.decide(percent, current);
            let on = next == PumpState::On;
            hw.set_pump(on);
            self.ctx.commands.pump_on = on;
            self.emit(sink, AppEvent::Pump { on });
        }

        // 3) Water temperature.
        match hw.read_temperature() {
            Ok(t) => {
                self.ctx.sensors.temperature_c = Some(t);
                self.emit(sink, AppEvent::WaterTemp(Some(t)));
            }
            Err(e) => {
                warn!("temperature read failed: {e}");
                self.ctx.sensors.temperature_c = None;
                self.emit(sink, AppEvent::WaterTemp(None));
            }
        }
    }

    fn emit(&self, sink: &mut impl TelemetrySink, event: AppEvent) {
        sink.send_line(&event.to_line());
    }
}
