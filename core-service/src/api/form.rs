//! Transaction Form - Command surface for the presentation layer
//!
//! Binds one telemetry session and one verification machine for the
//! lifetime of a mounted form. Assumes the caller is already authenticated.

use std::sync::Arc;

use tokio::sync::watch;

use crate::logic::clock::{Clock, SystemClock};
use crate::logic::config::PipelineConfig;
use crate::logic::telemetry::{InteractionEvent, SessionError, TelemetrySession, TelemetrySnapshot};
use crate::logic::verification::{RunReport, SubmitError, VerificationMachine, VerificationState};

use super::view::TransactionView;

pub struct TransactionForm {
    session: TelemetrySession,
    machine: Arc<VerificationMachine>,
}

impl TransactionForm {
    /// Mount on the wall clock. Must be called inside a tokio runtime.
    pub fn mount(config: PipelineConfig) -> Self {
        Self::mount_with_clock(config, Arc::new(SystemClock))
    }

    pub fn mount_with_clock(config: PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        let session = TelemetrySession::mount(&config, Arc::clone(&clock));
        let machine = VerificationMachine::new(config, clock);
        Self::from_parts(session, machine)
    }

    pub fn from_parts(session: TelemetrySession, machine: VerificationMachine) -> Self {
        log::info!("[Form] Mounted");
        Self {
            session,
            machine: Arc::new(machine),
        }
    }

    // ------------------------------------------------------------------------
    // Interaction events
    // ------------------------------------------------------------------------

    pub fn record(&self, event: InteractionEvent) -> Result<(), SessionError> {
        self.session.record(event)
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Result<(), SessionError> {
        self.session.pointer_move(x, y)
    }

    pub fn click(&self) -> Result<(), SessionError> {
        self.session.click()
    }

    pub fn key_press(&self) -> Result<(), SessionError> {
        self.session.key_press()
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Run verification on the telemetry gathered so far.
    ///
    /// The snapshot is taken once, after all events queued before this call;
    /// events arriving during the run feed later submissions only.
    pub async fn submit(&self, sender: &str, receiver: &str, amount: &str) -> Result<RunReport, SubmitError> {
        if self.machine.is_shutting_down() {
            return Err(SubmitError::ShuttingDown);
        }
        if self.machine.is_busy() {
            log::warn!("[Form] Submit ignored while a run is in progress");
            return Err(SubmitError::Busy);
        }

        let snapshot = self.session.snapshot().await?;
        self.machine.submit(sender, receiver, amount, snapshot).await
    }

    // ------------------------------------------------------------------------
    // Observable state
    // ------------------------------------------------------------------------

    pub fn view(&self) -> TransactionView {
        TransactionView::render(&self.session.latest(), &self.machine.state())
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.session.latest()
    }

    pub fn verification(&self) -> VerificationState {
        self.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.machine.subscribe()
    }

    pub fn subscribe_telemetry(&self) -> watch::Receiver<TelemetrySnapshot> {
        self.session.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.machine.is_busy()
    }

    /// Tear down: no verification state is published after this returns
    pub async fn unmount(&self) {
        self.machine.shutdown();
        self.session.unmount().await;
        log::info!("[Form] Unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::logic::clock::ManualClock;
    use crate::logic::verification::{Outcome, VerificationStep};

    const START_MS: i64 = 1_700_000_000_000;

    fn mount() -> (Arc<TransactionForm>, ManualClock) {
        let clock = ManualClock::new(START_MS);
        let form = TransactionForm::mount_with_clock(PipelineConfig::default(), Arc::new(clock.clone()));
        (Arc::new(form), clock)
    }

    /// Wide pointer sweeps plus steady ~250ms typing over several seconds
    fn fill_like_a_person(form: &TransactionForm, clock: &ManualClock) {
        for i in 1..=15 {
            form.pointer_move(i as f64 * 20.0, i as f64 * 12.0).unwrap();
        }
        clock.advance(2_000);
        for _ in 0..12 {
            clock.advance(250);
            form.key_press().unwrap();
        }
        clock.advance(1_000);
        form.click().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_session_succeeds() {
        let (form, clock) = mount();
        fill_like_a_person(&form, &clock);
        // Let a tick observe the advanced clock
        tokio::time::sleep(Duration::from_millis(150)).await;

        let report = form.submit("alice", "bob", "0.25").await.unwrap();
        assert_eq!(report.score, 100, "reasons: {:?}", report.risk_reasons);
        assert_eq!(report.outcome, Outcome::Success);

        let view = form.view();
        assert_eq!(view.security_score, "100%");
        assert_eq!(view.clicks, 1);
        assert!(view.signature.is_some());
        assert!(view.submit_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_submit_is_blocked() {
        let (form, _clock) = mount();
        let report = form.submit("alice", "bob", "0.25").await.unwrap();

        // Limited movement, quick completion, no rhythm: 100 - 15 - 25 - 20
        assert_eq!(report.score, 40);
        assert_eq!(report.step, VerificationStep::Blocked);
        assert_eq!(form.view().status.unwrap().outcome, Outcome::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_score_fixed_at_decision_time() {
        let (form, clock) = mount();
        // No pointer movement and instant completion: 100 - 15 - 25 = 60
        for _ in 0..6 {
            clock.advance(250);
            form.key_press().unwrap();
        }
        // Keep the elapsed tick under two seconds
        clock.set(START_MS + 1_600);
        tokio::time::sleep(Duration::from_millis(150)).await;

        let runner = Arc::clone(&form);
        let run = tokio::spawn(async move { runner.submit("alice", "bob", "0.25").await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(form.verification().step, Some(VerificationStep::ResistanceCheck));

        // Telemetry keeps flowing during the check
        for i in 1..=20 {
            form.pointer_move(i as f64 * 50.0, 0.0).unwrap();
        }
        clock.advance(10_000);

        let report = run.await.unwrap().unwrap();
        assert_eq!(report.score, 60);
        assert_eq!(report.outcome, Outcome::Pending);
        assert_eq!(form.verification().score, Some(60));

        // The counters accumulated for the next submission
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(form.telemetry().pointer_movement_count, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_rejected() {
        let (form, clock) = mount();
        fill_like_a_person(&form, &clock);

        let runner = Arc::clone(&form);
        let run = tokio::spawn(async move { runner.submit("alice", "bob", "0.25").await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(form.is_busy());
        assert_eq!(form.view().submit_label, "Processing...");
        assert_eq!(form.submit("alice", "bob", "0.25").await, Err(SubmitError::Busy));

        assert!(run.await.unwrap().is_ok());
        assert!(!form.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_mid_run() {
        let (form, clock) = mount();
        fill_like_a_person(&form, &clock);
        tokio::time::sleep(Duration::from_millis(150)).await;

        let runner = Arc::clone(&form);
        let run = tokio::spawn(async move { runner.submit("alice", "bob", "0.25").await });
        tokio::time::sleep(Duration::from_millis(100)).await;

        form.unmount().await;
        assert_eq!(run.await.unwrap(), Err(SubmitError::ShuttingDown));
        assert!(form.verification().outcome.is_none());
        assert_eq!(form.click(), Err(SessionError::Closed));
        assert_eq!(
            form.submit("alice", "bob", "0.25").await,
            Err(SubmitError::ShuttingDown)
        );
    }
}
