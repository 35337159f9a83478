//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.  This is the classic embedded C FSM pattern
//! expressed in safe Rust.
//!
//! ```text
//!  LEARNING ──[warmup windows consumed]──▶ CALIBRATING
//!                                              │
//!                                  [full reference captured]
//!                                              ▼
//!                                         MONITORING
//!
//!  Any state ──[accel acquisition failed]──▶ DEGRADED
//!  DEGRADED ──[accel recovered]──▶ Learning (if warmup unfinished)
//!                                  Monitoring (otherwise)
//! ```
//!
//! The handlers only decide *which* state is active; the actual sensor
//! acquisition, telemetry, and pump policy run in the control service,
//! which consults the current state before each pass.

use super::context::MonitorContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Learning
        StateDescriptor {
            id: StateId::Learning,
            name: "Learning",
            on_enter: Some(learning_enter),
            on_exit: None,
            on_update: learning_update,
        },
        // Index 1 — Calibrating
        StateDescriptor {
            id: StateId::Calibrating,
            name: "Calibrating",
            on_enter: Some(calibrating_enter),
            on_exit: None,
            on_update: calibrating_update,
        },
        // Index 2 — Monitoring
        StateDescriptor {
            id: StateId::Monitoring,
            name: "Monitoring",
            on_enter: Some(monitoring_enter),
            on_exit: None,
            on_update: monitoring_update,
        },
        // Index 3 — Degraded
        StateDescriptor {
            id: StateId::Degraded,
            name: "Degraded",
            on_enter: Some(degraded_enter),
            on_exit: Some(degraded_exit),
            on_update: degraded_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  LEARNING — feeding baseline windows to the anomaly detector
// ═══════════════════════════════════════════════════════════════════════════

fn learning_enter(ctx: &mut MonitorContext) {
    info!(
        "LEARNING: {}/{} baseline windows consumed",
        ctx.learned_iterations, ctx.config.warmup_iterations
    );
}

fn learning_update(ctx: &mut MonitorContext) -> Option<StateId> {
    if !ctx.sensors.accel_ok {
        return Some(StateId::Degraded);
    }
    if ctx.learning_complete() {
        return Some(StateId::Calibrating);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  CALIBRATING — capturing the tank-full level reference
// ═══════════════════════════════════════════════════════════════════════════

fn calibrating_enter(_ctx: &mut MonitorContext) {
    info!("CALIBRATING: waiting for full-level reference capture");
}

fn calibrating_update(ctx: &mut MonitorContext) -> Option<StateId> {
    if !ctx.sensors.accel_ok {
        return Some(StateId::Degraded);
    }
    if ctx.calibration_done {
        return Some(StateId::Monitoring);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING — steady-state inference / level / temperature passes
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_enter(_ctx: &mut MonitorContext) {
    info!("MONITORING: steady-state telemetry active");
}

fn monitoring_update(ctx: &mut MonitorContext) -> Option<StateId> {
    if !ctx.sensors.accel_ok {
        return Some(StateId::Degraded);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  DEGRADED — accelerometer down; level, pump, and temperature continue
// ═══════════════════════════════════════════════════════════════════════════

fn degraded_enter(ctx: &mut MonitorContext) {
    warn!(
        "DEGRADED: accelerometer unavailable after retry bound; \
         vibration telemetry suspended (tick {})",
        ctx.total_ticks
    );
}

fn degraded_exit(_ctx: &mut MonitorContext) {
    info!("DEGRADED: accelerometer recovered");
}

fn degraded_update(ctx: &mut MonitorContext) -> Option<StateId> {
    if !ctx.sensors.accel_ok {
        return None;
    }
    // Recovery resumes the lifecycle where it left off.
    if !ctx.learning_complete() {
        Some(StateId::Learning)
    } else if !ctx.calibration_done {
        Some(StateId::Calibrating)
    } else {
        Some(StateId::Monitoring)
    }
}
