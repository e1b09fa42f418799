//! Risk Scorer
//!
//! Pure mapping from a telemetry snapshot to a trust score and the reasons
//! behind every deduction.

use serde::{Deserialize, Serialize};

use crate::logic::telemetry::TelemetrySnapshot;

use super::rules::RISK_RULES;

/// Score before any deduction
pub const BASE_SCORE: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Not clamped; the rule table bottoms out at 20
    pub score: i32,
    pub risk_reasons: Vec<String>,
}

impl ScoreResult {
    pub fn is_clean(&self) -> bool {
        self.risk_reasons.is_empty()
    }
}

pub fn evaluate(snapshot: &TelemetrySnapshot) -> ScoreResult {
    let mut score = BASE_SCORE;
    let mut risk_reasons = Vec::new();

    for rule in RISK_RULES.iter() {
        if rule.evaluate(snapshot) {
            score -= rule.deduction;
            risk_reasons.push(rule.reason.to_string());
        }
    }

    let result = ScoreResult { score, risk_reasons };
    if result.is_clean() {
        log::debug!("[Scoring] Clean snapshot, mean key gap {:?}ms", snapshot.mean_interval());
    } else {
        log::debug!("[Scoring] score={} triggered={:?}", result.score, result.risk_reasons);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human() -> TelemetrySnapshot {
        TelemetrySnapshot {
            click_count: 3,
            keystroke_count: 40,
            pointer_movement_count: 20,
            elapsed_seconds: 10.0,
            inter_key_intervals: vec![180.0, 250.0, 320.0],
            typing_rate: 5.0,
        }
    }

    fn bot() -> TelemetrySnapshot {
        TelemetrySnapshot {
            pointer_movement_count: 3,
            elapsed_seconds: 1.0,
            inter_key_intervals: vec![20.0, 30.0, 600.0],
            typing_rate: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_snapshot_scores_full() {
        let result = evaluate(&human());
        assert_eq!(result.score, 100);
        assert!(result.is_clean());
    }

    #[test]
    fn test_every_rule_triggered() {
        let result = evaluate(&bot());
        assert_eq!(result.score, 20);
        assert_eq!(
            result.risk_reasons,
            vec![
                "Unusually fast typing speed detected",
                "Limited mouse movement patterns",
                "Suspiciously quick form completion",
                "Unnatural typing rhythm detected",
            ]
        );
    }

    #[test]
    fn test_score_is_base_minus_triggered_deductions() {
        // Walk every combination of the four rules
        for mask in 0u8..16 {
            let mut snapshot = human();
            let mut expected = BASE_SCORE;
            if mask & 1 != 0 {
                snapshot.typing_rate = 16.0;
                expected -= 20;
            }
            if mask & 2 != 0 {
                snapshot.pointer_movement_count = 9;
                expected -= 15;
            }
            if mask & 4 != 0 {
                snapshot.elapsed_seconds = 1.5;
                expected -= 25;
            }
            if mask & 8 != 0 {
                snapshot.inter_key_intervals = vec![50.0, 700.0];
                expected -= 20;
            }

            let result = evaluate(&snapshot);
            assert_eq!(result.score, expected, "mask {:04b}", mask);
            assert_eq!(result.risk_reasons.len(), mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_pending_band_score() {
        // Limited pointer movement + quick completion = 60
        let snapshot = TelemetrySnapshot {
            pointer_movement_count: 2,
            elapsed_seconds: 1.0,
            ..human()
        };
        assert_eq!(evaluate(&snapshot).score, 60);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let snapshot = bot();
        assert_eq!(evaluate(&snapshot), evaluate(&snapshot));
    }
}
