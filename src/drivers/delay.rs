//! Microsecond-granularity delay providers.
//!
//! The one-wire bus, calibration settle and sample pacing all take an
//! injected [`embedded_hal::delay::DelayNs`] rather than calling a delay
//! function directly.  Two providers are offered:
//!
//! - [`EspDelay`] — backed by the ESP-IDF ROM microsecond timer (preferred;
//!   accurate across optimisation levels).
//! - [`SpinDelay`] — calibrated spin-loop fallback for platforms without a
//!   usable timer.  Accuracy depends on the calibration constant and the
//!   optimiser; use only when no hardware timer is available.

use embedded_hal::delay::DelayNs;

// ── Timer-backed delay (ESP32) ────────────────────────────────

/// Delay provider backed by `esp_rom_delay_us` for sub-millisecond waits
/// and the FreeRTOS-friendly `usleep` for longer ones.  On host targets it
/// sleeps the thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspDelay;

impl EspDelay {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl DelayNs for EspDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = ns.div_ceil(1000).max(1);
        if us < 1000 {
            // Busy-wait: short enough that yielding would cost more than
            // it saves, and one-wire slots need the precision.
            unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) };
        } else {
            unsafe { esp_idf_svc::sys::usleep(us) };
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for EspDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

// ── Spin-loop fallback ────────────────────────────────────────

/// Calibrated busy-wait delay for targets with no free hardware timer.
///
/// `cycles_per_us` must be tuned for the core clock and optimisation
/// level; the spin body uses `core::hint::spin_loop` so the loop is not
/// optimised away.
#[derive(Debug, Clone, Copy)]
pub struct SpinDelay {
    cycles_per_us: u32,
}

impl SpinDelay {
    pub fn new(cycles_per_us: u32) -> Self {
        Self {
            cycles_per_us: cycles_per_us.max(1),
        }
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let us = ns.div_ceil(1000);
        let mut cycles = u64::from(us) * u64::from(self.cycles_per_us);
        while cycles > 0 {
            core::hint::spin_loop();
            cycles -= 1;
        }
    }
}
