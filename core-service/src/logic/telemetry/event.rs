//! Interaction Event Types
//!
//! Raw pointer, click and key events observed on the transaction form.
//! Each physical event becomes one message for the session updater.

use serde::{Deserialize, Serialize};

// ============================================================================
// EVENT TYPES
// ============================================================================

/// Categories of interaction events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    PointerMove,
    Click,
    KeyPress,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PointerMove => "pointer_move",
            EventType::Click => "click",
            EventType::KeyPress => "key_press",
        }
    }
}

/// A single observed interaction.
///
/// Key presses carry the time they happened so queueing delay in the
/// updater never distorts typing rhythm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    PointerMove { x: f64, y: f64 },
    Click,
    KeyPress { at_ms: i64 },
}

impl InteractionEvent {
    pub fn pointer_move(x: f64, y: f64) -> Self {
        InteractionEvent::PointerMove { x, y }
    }

    pub fn key_press(at_ms: i64) -> Self {
        InteractionEvent::KeyPress { at_ms }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            InteractionEvent::PointerMove { .. } => EventType::PointerMove,
            InteractionEvent::Click => EventType::Click,
            InteractionEvent::KeyPress { .. } => EventType::KeyPress,
        }
    }
}
