//! Verification State Machine
//!
//! BehavioralAnalysis -> SignatureGeneration -> ResistanceCheck -> Done,
//! with an early exit to Blocked on a low trust score.
//!
//! One run at a time. The score is computed from the snapshot handed to
//! `submit`, so telemetry arriving during the resistance check never
//! changes a decision already made.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use crate::logic::clock::Clock;
use crate::logic::config::PipelineConfig;
use crate::logic::scoring::{self, ScoreResult};
use crate::logic::signature::{PayloadSigner, Sha256Signer, TransactionPayload};
use crate::logic::telemetry::TelemetrySnapshot;

use super::resistance::{ResistanceCheck, SimulatedLatency};
use super::types::{
    Outcome, RunReport, SubmitError, VerificationState, VerificationStep, PROCESSING_ERROR_REASON,
};

pub struct VerificationMachine {
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    signer: Arc<dyn PayloadSigner>,
    resistance: Arc<dyn ResistanceCheck>,
    active_run: Mutex<Option<Uuid>>,
    state: watch::Sender<VerificationState>,
    shutdown: watch::Sender<bool>,
}

/// Releases the busy slot when a run ends, however it ends
struct RunGuard<'a> {
    machine: &'a VerificationMachine,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.machine.active_run.lock() = None;
        self.machine.publish(|s| s.busy = false);
    }
}

impl VerificationMachine {
    /// SHA-256 signer and simulated latency from `config`
    pub fn new(config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        let resistance = Arc::new(SimulatedLatency::from_config(&config));
        Self::with_parts(config, clock, Arc::new(Sha256Signer), resistance)
    }

    pub fn with_parts(
        config: PipelineConfig,
        clock: Arc<dyn Clock>,
        signer: Arc<dyn PayloadSigner>,
        resistance: Arc<dyn ResistanceCheck>,
    ) -> Self {
        let (state, _) = watch::channel(VerificationState::default());
        let (shutdown, _) = watch::channel(false);

        Self {
            config,
            clock,
            signer,
            resistance,
            active_run: Mutex::new(None),
            state,
            shutdown,
        }
    }

    pub fn state(&self) -> VerificationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.state.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.active_run.lock().is_some()
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Stop publishing. An in-flight run abandons its resistance check.
    pub fn shutdown(&self) {
        if !self.shutdown.send_replace(true) {
            log::info!("[Verification] Shutting down");
        }
    }

    pub async fn submit(
        &self,
        sender: &str,
        receiver: &str,
        amount: &str,
        snapshot: TelemetrySnapshot,
    ) -> Result<RunReport, SubmitError> {
        if self.is_shutting_down() {
            return Err(SubmitError::ShuttingDown);
        }

        let run_id = Uuid::new_v4();
        let _guard = self.claim(run_id)?;
        log::info!("[Verification] Run {} started", run_id);

        // Step 1: behavioral analysis
        self.publish(|s| {
            *s = VerificationState {
                run_id: Some(run_id),
                step: Some(VerificationStep::BehavioralAnalysis),
                busy: true,
                ..Default::default()
            };
        });

        let ScoreResult { score, mut risk_reasons } = scoring::evaluate(&snapshot);
        self.publish(|s| {
            s.score = Some(score);
            s.risk_reasons = risk_reasons.clone();
        });

        if score < self.config.block_below {
            log::warn!(
                "[Verification] Run {} blocked: score {} < {} ({} risk factors)",
                run_id, score, self.config.block_below, risk_reasons.len()
            );
            return Ok(self.finish(run_id, VerificationStep::Blocked, score, risk_reasons, None, Outcome::Error));
        }

        // Step 2: signature generation
        self.publish(|s| s.step = Some(VerificationStep::SignatureGeneration));

        let payload = TransactionPayload::new(sender, receiver, amount, self.clock.now_millis());
        let signature = match self.signer.sign(&payload) {
            Ok(signature) => signature,
            Err(e) => {
                log::error!("[Verification] Run {} processing failure: {}", run_id, e);
                risk_reasons.push(PROCESSING_ERROR_REASON.to_string());
                return Ok(self.finish(run_id, VerificationStep::Done, score, risk_reasons, None, Outcome::Error));
            }
        };
        log::debug!("[Verification] Run {} signed: {}", run_id, signature);

        self.publish(|s| {
            s.signature = Some(signature.clone());
            s.step = Some(VerificationStep::ResistanceCheck);
        });

        // Step 3: the only suspension point
        tokio::select! {
            _ = self.resistance.verify(&signature) => {}
            _ = wait_for_shutdown(self.shutdown.subscribe()) => {
                log::info!("[Verification] Run {} abandoned during resistance check", run_id);
                return Err(SubmitError::ShuttingDown);
            }
        }

        // Step 4: decision
        let outcome = self.decide(score);
        log::info!("[Verification] Run {} done: score {} -> {}", run_id, score, outcome.as_str());
        Ok(self.finish(run_id, VerificationStep::Done, score, risk_reasons, Some(signature), outcome))
    }

    fn claim(&self, run_id: Uuid) -> Result<RunGuard<'_>, SubmitError> {
        let mut active = self.active_run.lock();
        if let Some(current) = *active {
            log::warn!("[Verification] Submit rejected, run {} in progress", current);
            return Err(SubmitError::Busy);
        }
        *active = Some(run_id);
        Ok(RunGuard { machine: self })
    }

    fn decide(&self, score: i32) -> Outcome {
        if score >= self.config.approve_at {
            Outcome::Success
        } else if score >= self.config.block_below {
            Outcome::Pending
        } else {
            Outcome::Error
        }
    }

    fn finish(
        &self,
        run_id: Uuid,
        step: VerificationStep,
        score: i32,
        risk_reasons: Vec<String>,
        signature: Option<String>,
        outcome: Outcome,
    ) -> RunReport {
        self.publish(|s| {
            s.step = Some(step);
            s.risk_reasons = risk_reasons.clone();
            s.outcome = Some(outcome);
        });

        RunReport {
            run_id,
            step,
            score,
            risk_reasons,
            signature,
            outcome,
        }
    }

    /// No state leaves the machine once it is shutting down
    fn publish(&self, update: impl FnOnce(&mut VerificationState)) {
        if self.is_shutting_down() {
            return;
        }
        self.state.send_modify(update);
    }
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            // Sender gone with the machine, nothing left to wait for
            std::future::pending::<()>().await;
        }
    }
}
