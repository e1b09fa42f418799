//! Quantum-Safe Transaction Core
//!
//! Behavioral risk scoring and transaction verification for the transaction form.
//!
//! - `logic/` - engines (telemetry, scoring, signature, verification)
//! - `api/` - form facade and render model consumed by the presentation layer

pub mod api;
pub mod constants;
pub mod logic;
