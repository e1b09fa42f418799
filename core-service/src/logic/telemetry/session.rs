//! Telemetry Session
//!
//! Owns the collector for one mounted form. Producers push events through an
//! unbounded channel and never block; a single updater task applies them in
//! order, runs the periodic tick and publishes each new snapshot.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::logic::clock::Clock;
use crate::logic::config::PipelineConfig;

use super::collector::TelemetryCollector;
use super::event::InteractionEvent;
use super::snapshot::TelemetrySnapshot;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("telemetry session is closed")]
    Closed,
}

enum Command {
    Event(InteractionEvent),
    Snapshot(oneshot::Sender<TelemetrySnapshot>),
}

pub struct TelemetrySession {
    commands: mpsc::UnboundedSender<Command>,
    published: watch::Receiver<TelemetrySnapshot>,
    clock: Arc<dyn Clock>,
    updater: Mutex<Option<JoinHandle<()>>>,
}

impl TelemetrySession {
    /// Mount a session and start its updater. Must be called inside a tokio runtime.
    pub fn mount(config: &PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        let form_start_ms = clock.now_millis();
        let collector = TelemetryCollector::new(form_start_ms, config);

        let (commands, inbox) = mpsc::unbounded_channel();
        let (publisher, published) = watch::channel(collector.snapshot().clone());

        let updater = tokio::spawn(run_updater(
            collector,
            inbox,
            publisher,
            Arc::clone(&clock),
            config.tick_interval(),
        ));

        log::info!("[Telemetry] Session mounted at {} (tick {}ms)", form_start_ms, config.tick_interval_ms);

        Self {
            commands,
            published,
            clock,
            updater: Mutex::new(Some(updater)),
        }
    }

    pub fn record(&self, event: InteractionEvent) -> Result<(), SessionError> {
        self.commands
            .send(Command::Event(event))
            .map_err(|_| SessionError::Closed)
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Result<(), SessionError> {
        self.record(InteractionEvent::pointer_move(x, y))
    }

    pub fn click(&self) -> Result<(), SessionError> {
        self.record(InteractionEvent::Click)
    }

    /// Record a key press stamped with the current clock time
    pub fn key_press(&self) -> Result<(), SessionError> {
        self.record(InteractionEvent::key_press(self.clock.now_millis()))
    }

    /// Snapshot after every event sent before this call has been applied
    pub async fn snapshot(&self) -> Result<TelemetrySnapshot, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(reply))
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }

    /// Last published snapshot, for live display
    pub fn latest(&self) -> TelemetrySnapshot {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TelemetrySnapshot> {
        self.published.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.updater
            .lock()
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Stop the updater and wait for it to release the collector
    pub async fn unmount(&self) {
        let updater = self.updater.lock().take();
        if let Some(updater) = updater {
            updater.abort();
            let _ = updater.await;
            log::info!("[Telemetry] Session unmounted");
        }
    }
}

impl Drop for TelemetrySession {
    fn drop(&mut self) {
        if let Some(updater) = self.updater.get_mut().take() {
            updater.abort();
        }
    }
}

async fn run_updater(
    mut collector: TelemetryCollector,
    mut inbox: mpsc::UnboundedReceiver<Command>,
    publisher: watch::Sender<TelemetrySnapshot>,
    clock: Arc<dyn Clock>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            command = inbox.recv() => match command {
                Some(Command::Event(event)) => {
                    log::trace!("[Telemetry] {}", event.event_type().as_str());
                    collector.apply(&event);
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(collector.snapshot().clone());
                    continue;
                }
                None => break,
            },
            _ = ticker.tick() => collector.tick(clock.now_millis()),
        }

        publisher.send_replace(collector.snapshot().clone());
    }

    log::debug!("[Telemetry] Updater stopped, all producers gone");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::clock::ManualClock;

    fn mount_at(start_ms: i64) -> (TelemetrySession, ManualClock) {
        let clock = ManualClock::new(start_ms);
        let session = TelemetrySession::mount(&PipelineConfig::default(), Arc::new(clock.clone()));
        (session, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_applied_in_order() {
        let (session, clock) = mount_at(0);

        session.pointer_move(0.0, 0.0).unwrap();
        session.pointer_move(10.0, 10.0).unwrap();
        session.pointer_move(30.0, 10.0).unwrap();
        session.click().unwrap();

        clock.set(5_000);
        session.key_press().unwrap();
        clock.set(5_250);
        session.key_press().unwrap();

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.pointer_movement_count, 2);
        assert_eq!(snapshot.click_count, 1);
        assert_eq!(snapshot.keystroke_count, 2);
        assert_eq!(snapshot.inter_key_intervals, vec![250.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_refreshes_elapsed() {
        let (session, clock) = mount_at(1_000);

        clock.set(3_500);
        tokio::time::sleep(Duration::from_millis(250)).await;

        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.elapsed_seconds, 2.5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_publishes_updates() {
        let (session, _clock) = mount_at(0);
        let mut updates = session.subscribe();

        session.click().unwrap();
        session.snapshot().await.unwrap();

        updates.changed().await.unwrap();
        assert_eq!(session.latest().click_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_is_a_copy() {
        let (session, _clock) = mount_at(0);

        session.click().unwrap();
        let before = session.snapshot().await.unwrap();

        session.click().unwrap();
        session.click().unwrap();
        let after = session.snapshot().await.unwrap();

        assert_eq!(before.click_count, 1);
        assert_eq!(after.click_count, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_closes_session() {
        let (session, _clock) = mount_at(0);
        assert!(session.is_mounted());

        session.unmount().await;

        assert!(!session.is_mounted());
        assert_eq!(session.click(), Err(SessionError::Closed));
        assert_eq!(session.snapshot().await, Err(SessionError::Closed));
    }
}
