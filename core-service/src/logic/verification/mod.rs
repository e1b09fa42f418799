//! Verification Module - Transaction verification pipeline
//!
//! # Components
//! - `types.rs`: steps, outcomes, observable state, errors
//! - `resistance.rs`: the timed resistance check (suspension point)
//! - `machine.rs`: the state machine driving scoring and signing

pub mod machine;
pub mod resistance;
pub mod types;


pub use machine::VerificationMachine;
pub use resistance::{ResistanceCheck, SimulatedLatency};
pub use types::{
    Outcome, RunReport, SubmitError, VerificationState, VerificationStep, PROCESSING_ERROR_REASON,
};
