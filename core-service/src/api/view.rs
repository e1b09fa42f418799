//! Transaction View - Render model for the presentation layer
//!
//! Flattens live telemetry and verification state into display strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logic::telemetry::TelemetrySnapshot;
use crate::logic::verification::{Outcome, VerificationState, VerificationStep};

pub const STEP_LABELS: [&str; 3] = [
    "Behavioral Analysis",
    "Digital Signature Generation",
    "Quantum Resistance Verification",
];

pub const SUBMIT_LABEL: &str = "Submit Transaction";
pub const PROCESSING_LABEL: &str = "Processing...";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    Pending,
    Active,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepIndicator {
    pub number: u8,
    pub label: String,
    pub state: IndicatorState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBanner {
    pub outcome: Outcome,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub security_score: String,
    pub response_time: String,
    pub typing_speed: String,
    pub clicks: u64,
    pub keystrokes: u64,
    pub pointer_movements: u64,
    pub steps: Vec<StepIndicator>,
    pub risk_factors: Vec<String>,
    pub signature: Option<String>,
    pub status: Option<StatusBanner>,
    pub submit_label: String,
    pub submit_enabled: bool,
}

// ============================================================================
// RENDERING
// ============================================================================

pub fn outcome_message(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "Transaction successful! Bitcoin transferred securely.",
        Outcome::Pending => "Transaction pending additional verification. Please wait.",
        Outcome::Error => "Transaction blocked: High-risk activity detected.",
    }
}

/// "N/A" until a positive score exists
pub fn score_display(score: Option<i32>) -> String {
    match score {
        Some(score) if score > 0 => format!("{}%", score),
        _ => "N/A".to_string(),
    }
}

/// Characters per second, "instant" when keys share a timestamp
pub fn typing_speed_display(rate: f64) -> String {
    if rate.is_finite() {
        format!("{:.1} c/s", rate)
    } else {
        "instant".to_string()
    }
}

fn step_indicators(step: Option<VerificationStep>) -> Vec<StepIndicator> {
    // How far the run got: steps before `reached` are complete, `reached` is active
    let (reached, failed) = match step {
        None => (0, None),
        Some(VerificationStep::BehavioralAnalysis) => (1, None),
        Some(VerificationStep::SignatureGeneration) => (2, None),
        Some(VerificationStep::ResistanceCheck) => (3, None),
        Some(VerificationStep::Done) => (4, None),
        Some(VerificationStep::Blocked) => (1, Some(1)),
    };

    STEP_LABELS
        .iter()
        .zip(1u8..)
        .map(|(label, number)| {
            let state = if failed == Some(number) {
                IndicatorState::Failed
            } else if number < reached {
                IndicatorState::Complete
            } else if number == reached {
                IndicatorState::Active
            } else {
                IndicatorState::Pending
            };
            StepIndicator {
                number,
                label: label.to_string(),
                state,
            }
        })
        .collect()
}

impl TransactionView {
    pub fn render(telemetry: &TelemetrySnapshot, state: &VerificationState) -> Self {
        Self {
            security_score: score_display(state.score),
            response_time: format!("{:.1}s", telemetry.elapsed_seconds),
            typing_speed: typing_speed_display(telemetry.typing_rate),
            clicks: telemetry.click_count,
            keystrokes: telemetry.keystroke_count,
            pointer_movements: telemetry.pointer_movement_count,
            steps: step_indicators(state.step),
            risk_factors: state.risk_reasons.clone(),
            signature: state.signature.clone(),
            status: state.outcome.map(|outcome| StatusBanner {
                outcome,
                message: outcome_message(outcome).to_string(),
            }),
            submit_label: if state.busy { PROCESSING_LABEL } else { SUBMIT_LABEL }.to_string(),
            submit_enabled: !state.busy,
        }
    }
}

impl fmt::Display for TransactionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Security Score: {}  |  Response Time: {}  |  Typing Speed: {}",
            self.security_score, self.response_time, self.typing_speed
        )?;

        for step in &self.steps {
            let marker = match step.state {
                IndicatorState::Pending => " ",
                IndicatorState::Active => ">",
                IndicatorState::Complete => "x",
                IndicatorState::Failed => "!",
            };
            writeln!(f, "[{}] {}. {}", marker, step.number, step.label)?;
        }

        if !self.risk_factors.is_empty() {
            writeln!(f, "Risk Factors Detected:")?;
            for risk in &self.risk_factors {
                writeln!(f, "  - {}", risk)?;
            }
        }

        if let Some(signature) = &self.signature {
            writeln!(f, "Digital Signature: {}", signature)?;
        }

        if let Some(status) = &self.status {
            writeln!(f, "{}", status.message)?;
        }

        write!(f, "[ {} ]", self.submit_label)
    }
}
