//! Demo Interaction Profiles
//!
//! Scripted input for the transaction form: one profile paced like a person,
//! one like an automation script. Events go through the same telemetry
//! channel a real frontend would use.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logic::telemetry::SessionError;

use super::form::TransactionForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum InteractionProfile {
    /// Pointer sweeps between fields, 150-350ms keystrokes, unhurried submit
    Human,
    /// No pointer motion, 20ms keystrokes, immediate submit
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFields {
    pub sender: String,
    pub receiver: String,
    pub amount: String,
}

/// Screen positions of the form controls (y coordinate, x is centred)
const FIELD_ROWS: [f64; 3] = [180.0, 260.0, 340.0];
const SUBMIT_ROW: f64 = 620.0;
const FORM_CENTRE_X: f64 = 480.0;

const POINTER_STEPS: u32 = 8;
const BOT_KEY_INTERVAL_MS: u64 = 20;

/// Minimum dwell before a human presses submit
const HUMAN_MIN_DWELL: Duration = Duration::from_millis(2_500);

fn jitter_ms(low: u64, high: u64) -> u64 {
    rand::thread_rng().gen_range(low..=high)
}

/// Fill every field and click submit. Does not submit the transaction itself.
pub async fn drive(
    form: &TransactionForm,
    profile: InteractionProfile,
    fields: &TransactionFields,
) -> Result<(), SessionError> {
    log::info!("[Demo] Driving {:?} profile", profile);

    match profile {
        InteractionProfile::Human => drive_human(form, fields).await,
        InteractionProfile::Bot => drive_bot(form, fields).await,
    }
}

async fn drive_human(form: &TransactionForm, fields: &TransactionFields) -> Result<(), SessionError> {
    let started = tokio::time::Instant::now();
    let mut pointer = (40.0, 40.0);

    let texts = [&fields.sender, &fields.receiver, &fields.amount];
    for (row, text) in FIELD_ROWS.iter().zip(texts) {
        pointer = sweep(form, pointer, (FORM_CENTRE_X, *row)).await?;
        form.click()?;

        for _ in text.chars() {
            tokio::time::sleep(Duration::from_millis(jitter_ms(150, 350))).await;
            form.key_press()?;
        }
    }

    let dwell = started.elapsed();
    if dwell < HUMAN_MIN_DWELL {
        tokio::time::sleep(HUMAN_MIN_DWELL - dwell).await;
    }

    sweep(form, pointer, (FORM_CENTRE_X, SUBMIT_ROW)).await?;
    form.click()
}

async fn drive_bot(form: &TransactionForm, fields: &TransactionFields) -> Result<(), SessionError> {
    let texts = [&fields.sender, &fields.receiver, &fields.amount];
    for text in texts {
        for _ in text.chars() {
            tokio::time::sleep(Duration::from_millis(BOT_KEY_INTERVAL_MS)).await;
            form.key_press()?;
        }
    }
    form.click()
}

/// Move in even steps with a little vertical wobble
async fn sweep(
    form: &TransactionForm,
    from: (f64, f64),
    to: (f64, f64),
) -> Result<(f64, f64), SessionError> {
    for step in 1..=POINTER_STEPS {
        let t = step as f64 / POINTER_STEPS as f64;
        let wobble = jitter_ms(0, 6) as f64 - 3.0;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t + wobble;
        form.pointer_move(x, y)?;
        tokio::time::sleep(Duration::from_millis(jitter_ms(10, 25))).await;
    }
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::logic::clock::MonotonicClock;
    use crate::logic::config::PipelineConfig;
    use crate::logic::verification::{Outcome, VerificationStep};

    fn fields() -> TransactionFields {
        TransactionFields {
            sender: "bc1qsender".to_string(),
            receiver: "bc1qreceiver".to_string(),
            amount: "0.015".to_string(),
        }
    }

    fn mount() -> TransactionForm {
        TransactionForm::mount_with_clock(PipelineConfig::default(), Arc::new(MonotonicClock::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_profile_is_trusted() {
        let form = mount();
        drive(&form, InteractionProfile::Human, &fields()).await.unwrap();

        let report = form.submit("bc1qsender", "bc1qreceiver", "0.015").await.unwrap();
        assert_eq!(report.score, 100, "reasons: {:?}", report.risk_reasons);
        assert_eq!(report.outcome, Outcome::Success);

        let telemetry = form.telemetry();
        assert_eq!(telemetry.keystroke_count, 27);
        assert_eq!(telemetry.click_count, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bot_profile_is_blocked() {
        let form = mount();
        drive(&form, InteractionProfile::Bot, &fields()).await.unwrap();

        let report = form.submit("bc1qsender", "bc1qreceiver", "0.015").await.unwrap();
        assert_eq!(report.score, 20);
        assert_eq!(report.step, VerificationStep::Blocked);
        assert!(report.signature.is_none());
    }
}
