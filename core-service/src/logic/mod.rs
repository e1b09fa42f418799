//! Logic Module - Business Logic & Engines
//!
//! Telemetry collection, risk scoring, signing and the verification
//! state machine that sequences them.

pub mod clock;
pub mod config;
pub mod scoring;
pub mod signature;
pub mod telemetry;
pub mod verification;
