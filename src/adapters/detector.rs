//! Baseline-statistics anomaly detector.
//!
//! Stand-in for a trained vibration model behind the
//! [`AnomalyDetector`] port: it learns the mean level and mean absolute
//! deviation of the warmup windows and scores later windows by how far
//! their statistics drift from that baseline.  A window identical to the
//! baseline scores 100; similarity falls off as the drift grows relative
//! to the learned deviation.
//!
//! Production builds swap in an FFI adapter around the vendor model
//! without touching the control service; this implementation keeps the
//! full lifecycle runnable on the host and on hardware without the
//! proprietary library.

use log::info;

use crate::app::ports::AnomalyDetector;
use crate::error::Result;
use crate::sensors::accel::{AccelWindow, ACCEL_WINDOW_LEN};

/// Drift equal to one learned deviation costs this many similarity points.
const DRIFT_WEIGHT: f32 = 50.0;

/// Floor for the learned deviation so a perfectly still learning phase
/// does not turn every later vibration into a division blow-up.
const MIN_DEVIATION: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct WindowStats {
    mean: f32,
    /// Mean absolute deviation around `mean`.
    mad: f32,
}

fn window_stats(window: &AccelWindow) -> WindowStats {
    let data = window.as_slice();
    let len = data.len() as f32;
    let mean = data.iter().sum::<f32>() / len;
    let mad = data.iter().map(|v| (v - mean).abs()).sum::<f32>() / len;
    WindowStats { mean, mad }
}

pub struct BaselineDetector {
    initialized: bool,
    learned_windows: u32,
    baseline: WindowStats,
}

impl BaselineDetector {
    pub fn new() -> Self {
        Self {
            initialized: false,
            learned_windows: 0,
            baseline: WindowStats { mean: 0.0, mad: 0.0 },
        }
    }
}

impl Default for BaselineDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector for BaselineDetector {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        self.learned_windows = 0;
        Ok(())
    }

    fn learn(&mut self, window: &AccelWindow) {
        let stats = window_stats(window);
        // Incremental running average over all learned windows.
        self.learned_windows += 1;
        let n = self.learned_windows as f32;
        self.baseline.mean += (stats.mean - self.baseline.mean) / n;
        self.baseline.mad += (stats.mad - self.baseline.mad) / n;

        if self.learned_windows == 1 {
            info!("baseline detector: first window learned");
        }
    }

    fn infer(&mut self, window: &AccelWindow) -> u8 {
        if !self.initialized || self.learned_windows == 0 {
            // Nothing learned: every window is maximally unfamiliar.
            return 0;
        }
        let stats = window_stats(window);
        let scale = self.baseline.mad.max(MIN_DEVIATION);
        let drift = ((stats.mean - self.baseline.mean).abs()
            + (stats.mad - self.baseline.mad).abs())
            / scale;
        let similarity = 100.0 - drift * DRIFT_WEIGHT;
        similarity.clamp(0.0, 100.0) as u8
    }

    fn window_len(&self) -> usize {
        ACCEL_WINDOW_LEN
    }
}
