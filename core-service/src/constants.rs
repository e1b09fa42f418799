//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Every value can be overridden from the environment; see `logic::config`.

/// Telemetry tick period (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Simulated resistance-check latency (milliseconds)
pub const DEFAULT_VERIFICATION_DELAY_MS: u64 = 1500;

/// Scores strictly below this are blocked at behavioral analysis
pub const DEFAULT_BLOCK_BELOW: i32 = 50;

/// Scores at or above this are approved outright
pub const DEFAULT_APPROVE_AT: i32 = 70;

/// Minimum pointer displacement counted as a movement
pub const DEFAULT_POINTER_THRESHOLD: f64 = 5.0;

/// Key gaps at or above this are pauses, not typing rhythm (milliseconds)
pub const DEFAULT_MAX_KEY_GAP_MS: i64 = 1000;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Quantum-Safe Transaction";

// ============================================
// Helper functions to read from env with fallback
// ============================================

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Get tick interval from environment or use default
pub fn get_tick_interval_ms() -> u64 {
    env_or("QSAFE_TICK_INTERVAL_MS", DEFAULT_TICK_INTERVAL_MS)
}

/// Get verification delay from environment or use default
pub fn get_verification_delay_ms() -> u64 {
    env_or("QSAFE_VERIFICATION_DELAY_MS", DEFAULT_VERIFICATION_DELAY_MS)
}

/// Get block threshold from environment or use default
pub fn get_block_below() -> i32 {
    env_or("QSAFE_BLOCK_BELOW", DEFAULT_BLOCK_BELOW)
}

/// Get approval threshold from environment or use default
pub fn get_approve_at() -> i32 {
    env_or("QSAFE_APPROVE_AT", DEFAULT_APPROVE_AT)
}

/// Get pointer movement threshold from environment or use default
pub fn get_pointer_threshold() -> f64 {
    env_or("QSAFE_POINTER_THRESHOLD", DEFAULT_POINTER_THRESHOLD)
}

/// Get maximum typing gap from environment or use default
pub fn get_max_key_gap_ms() -> i64 {
    env_or("QSAFE_MAX_KEY_GAP_MS", DEFAULT_MAX_KEY_GAP_MS)
}
