//! Telemetry Snapshot
//!
//! Counters and derived rates describing how the form was filled in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub click_count: u64,
    pub keystroke_count: u64,
    /// Only displacements above the pointer threshold are counted
    pub pointer_movement_count: u64,
    /// Seconds since the form was mounted, refreshed on each tick
    pub elapsed_seconds: f64,
    /// Gaps between consecutive key presses (ms), pauses excluded
    pub inter_key_intervals: Vec<f64>,
    /// Characters per second
    pub typing_rate: f64,
}

impl TelemetrySnapshot {
    /// Mean inter-key gap, `None` with no recorded intervals
    pub fn mean_interval(&self) -> Option<f64> {
        mean(&self.inter_key_intervals)
    }

    /// True if any recorded gap lies strictly inside `(low, high)`
    pub fn has_interval_between(&self, low: f64, high: f64) -> bool {
        self.inter_key_intervals.iter().any(|&gap| gap > low && gap < high)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Characters per second estimated from the mean inter-key gap.
///
/// Fewer than two intervals is not enough rhythm to estimate, rate is 0.
/// A zero mean gap (keys landing in the same millisecond) is unbounded.
pub fn typing_rate(intervals: &[f64]) -> f64 {
    if intervals.len() < 2 {
        return 0.0;
    }
    match mean(intervals) {
        Some(avg) if avg > 0.0 => 1000.0 / avg,
        Some(_) => f64::INFINITY,
        None => 0.0,
    }
}
