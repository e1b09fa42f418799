//! Risk Rule Table
//!
//! Fixed deduction rules over a telemetry snapshot. Rules are independent:
//! every rule is evaluated on every call and the order only affects the
//! order of the reported reasons.

use crate::logic::telemetry::TelemetrySnapshot;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Faster than this (chars/sec) looks automated
pub const MAX_HUMAN_TYPING_RATE: f64 = 15.0;

/// Fewer pointer movements than this looks scripted
pub const MIN_POINTER_MOVEMENTS: u64 = 10;

/// Completing the form faster than this (seconds) looks scripted
pub const MIN_COMPLETION_SECONDS: f64 = 2.0;

/// Human typing rhythm window (ms, both bounds exclusive)
pub const NATURAL_GAP_MS: (f64, f64) = (100.0, 500.0);

// ============================================================================
// RULES
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub id: &'static str,
    pub reason: &'static str,
    pub deduction: i32,
    pub triggered: fn(&TelemetrySnapshot) -> bool,
}

impl RiskRule {
    pub fn evaluate(&self, snapshot: &TelemetrySnapshot) -> bool {
        (self.triggered)(snapshot)
    }
}

pub const RISK_RULES: [RiskRule; 4] = [
    RiskRule {
        id: "FAST_TYPING",
        reason: "Unusually fast typing speed detected",
        deduction: 20,
        triggered: fast_typing,
    },
    RiskRule {
        id: "LOW_POINTER_ACTIVITY",
        reason: "Limited mouse movement patterns",
        deduction: 15,
        triggered: low_pointer_activity,
    },
    RiskRule {
        id: "QUICK_COMPLETION",
        reason: "Suspiciously quick form completion",
        deduction: 25,
        triggered: quick_completion,
    },
    RiskRule {
        id: "UNNATURAL_RHYTHM",
        reason: "Unnatural typing rhythm detected",
        deduction: 20,
        triggered: unnatural_rhythm,
    },
];

fn fast_typing(s: &TelemetrySnapshot) -> bool {
    s.typing_rate > MAX_HUMAN_TYPING_RATE
}

fn low_pointer_activity(s: &TelemetrySnapshot) -> bool {
    s.pointer_movement_count < MIN_POINTER_MOVEMENTS
}

fn quick_completion(s: &TelemetrySnapshot) -> bool {
    s.elapsed_seconds < MIN_COMPLETION_SECONDS
}

fn unnatural_rhythm(s: &TelemetrySnapshot) -> bool {
    !s.has_interval_between(NATURAL_GAP_MS.0, NATURAL_GAP_MS.1)
}
