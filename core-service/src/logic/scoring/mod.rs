//! Scoring Module - Behavioral trust score
//!
//! - `rules.rs`: fixed deduction table
//! - `scorer.rs`: snapshot -> ScoreResult

pub mod rules;
pub mod scorer;

pub use rules::{RiskRule, RISK_RULES};
pub use scorer::{evaluate, ScoreResult, BASE_SCORE};
