//! Verification Types

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::logic::telemetry::SessionError;

/// Reason appended when payload construction or hashing fails
pub const PROCESSING_ERROR_REASON: &str = "Transaction processing error";

// ============================================================================
// STEPS & OUTCOMES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationStep {
    BehavioralAnalysis,
    SignatureGeneration,
    ResistanceCheck,
    Done,
    /// Early exit from behavioral analysis on a low trust score
    Blocked,
}

impl VerificationStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationStep::Done | VerificationStep::Blocked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStep::BehavioralAnalysis => "behavioral_analysis",
            VerificationStep::SignatureGeneration => "signature_generation",
            VerificationStep::ResistanceCheck => "resistance_check",
            VerificationStep::Done => "done",
            VerificationStep::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    /// Moderate trust, left for secondary review
    Pending,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Pending => "pending",
            Outcome::Error => "error",
        }
    }
}

// ============================================================================
// RUN STATE
// ============================================================================

/// Externally visible state, republished at every transition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationState {
    pub run_id: Option<Uuid>,
    pub step: Option<VerificationStep>,
    pub score: Option<i32>,
    pub risk_reasons: Vec<String>,
    pub signature: Option<String>,
    pub outcome: Option<Outcome>,
    pub busy: bool,
}

/// Terminal values of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub step: VerificationStep,
    pub score: i32,
    pub risk_reasons: Vec<String>,
    pub signature: Option<String>,
    pub outcome: Outcome,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Conditions that keep a run from completing at all.
///
/// Low trust and processing failures are not errors here; they end a run
/// with `Outcome::Error`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("a verification run is already in progress")]
    Busy,

    #[error("verification is shutting down")]
    ShuttingDown,

    #[error(transparent)]
    Session(#[from] SessionError),
}
