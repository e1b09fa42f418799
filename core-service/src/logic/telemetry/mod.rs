//! Telemetry Module
//!
//! Interaction telemetry for the transaction form.
//!
//! ## Structure
//! - `event.rs` - InteractionEvent (pointer, click, key press)
//! - `snapshot.rs` - TelemetrySnapshot + typing rate
//! - `collector.rs` - folds events into the snapshot
//! - `session.rs` - single-writer updater task bound to the form's lifetime
//!
//! ## Usage
//! ```ignore
//! let mut session = TelemetrySession::mount(&config, Arc::new(SystemClock));
//! session.pointer_move(120.0, 48.0)?;
//! session.key_press()?;
//! let snapshot = session.snapshot().await?;
//! session.unmount().await;
//! ```

pub mod collector;
pub mod event;
pub mod session;
pub mod snapshot;

pub use collector::TelemetryCollector;
pub use event::{EventType, InteractionEvent};
pub use session::{SessionError, TelemetrySession};
pub use snapshot::{typing_rate, TelemetrySnapshot};
