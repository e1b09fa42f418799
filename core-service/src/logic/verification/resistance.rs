//! Resistance Check
//!
//! The single suspension point of a verification run. The simulated check
//! only waits; a real verifier can replace it without touching transitions.

use std::time::Duration;

use async_trait::async_trait;

use crate::logic::config::PipelineConfig;

#[async_trait]
pub trait ResistanceCheck: Send + Sync {
    async fn verify(&self, signature: &str);
}

/// Fixed external-verification latency
#[derive(Debug, Clone, Copy)]
pub struct SimulatedLatency {
    delay: Duration,
}

impl SimulatedLatency {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.verification_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ResistanceCheck for SimulatedLatency {
    async fn verify(&self, signature: &str) {
        let prefix: String = signature.chars().take(12).collect();
        log::debug!("[Verification] Resistance check on {}... ({}ms)", prefix, self.delay.as_millis());
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_latency_waits_full_delay() {
        let check = SimulatedLatency::from_config(&PipelineConfig::default());
        assert_eq!(check.delay(), Duration::from_millis(1500));

        let started = Instant::now();
        check.verify("abc").await;
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
