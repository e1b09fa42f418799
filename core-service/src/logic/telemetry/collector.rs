//! Telemetry Collector
//!
//! Folds raw interaction events into the session's `TelemetrySnapshot`.
//! Pure state: the caller supplies timestamps, nothing here reads a clock.

use crate::logic::config::PipelineConfig;

use super::event::InteractionEvent;
use super::snapshot::{typing_rate, TelemetrySnapshot};

pub struct TelemetryCollector {
    snapshot: TelemetrySnapshot,
    form_start_ms: i64,
    last_key_ms: i64,
    last_pointer: (f64, f64),
    pointer_threshold: f64,
    max_key_gap_ms: i64,
}

impl TelemetryCollector {
    /// Start collecting for a form mounted at `form_start_ms`.
    ///
    /// The key-time reference starts at mount time and the pointer
    /// reference at the origin, so the first event of each kind is
    /// measured against those.
    pub fn new(form_start_ms: i64, config: &PipelineConfig) -> Self {
        Self {
            snapshot: TelemetrySnapshot::default(),
            form_start_ms,
            last_key_ms: form_start_ms,
            last_pointer: (0.0, 0.0),
            pointer_threshold: config.pointer_threshold,
            max_key_gap_ms: config.max_key_gap_ms,
        }
    }

    pub fn apply(&mut self, event: &InteractionEvent) {
        match *event {
            InteractionEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InteractionEvent::Click => self.on_click(),
            InteractionEvent::KeyPress { at_ms } => self.on_key_press(at_ms),
        }
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let (last_x, last_y) = self.last_pointer;
        let distance = (x - last_x).hypot(y - last_y);

        if distance > self.pointer_threshold {
            self.snapshot.pointer_movement_count += 1;
        }

        // Reference follows every sample, so slow drift never accumulates
        self.last_pointer = (x, y);
    }

    pub fn on_click(&mut self) {
        self.snapshot.click_count += 1;
    }

    /// Count a key press at `now_ms` and record its gap from the previous one.
    ///
    /// Only gaps in `0..max_key_gap_ms` are recorded. Longer gaps are pauses.
    /// Negative gaps come from a clock stepping backwards, not from typing, and
    /// would drag the mean toward zero and inflate the rate, so they are
    /// dropped. The reference still moves to `now_ms` either way.
    pub fn on_key_press(&mut self, now_ms: i64) {
        let delta = now_ms - self.last_key_ms;

        // Rate reflects the rhythm up to the previous keystroke
        let rate = typing_rate(&self.snapshot.inter_key_intervals);

        if (0..self.max_key_gap_ms).contains(&delta) {
            self.snapshot.inter_key_intervals.push(delta as f64);
        }

        self.last_key_ms = now_ms;
        self.snapshot.keystroke_count += 1;
        self.snapshot.typing_rate = rate;
    }

    pub fn tick(&mut self, now_ms: i64) {
        let elapsed_ms = (now_ms - self.form_start_ms).max(0);
        self.snapshot.elapsed_seconds = elapsed_ms as f64 / 1000.0;
    }

    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }
}
