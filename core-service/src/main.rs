//! Quantum-Safe Transaction - Demo Entry Point
//!
//! Mounts a transaction form, drives a scripted interaction profile through
//! its telemetry, submits, and prints every published view.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use quantum_safe_core::api::demo::{self, InteractionProfile, TransactionFields};
use quantum_safe_core::api::{TransactionForm, TransactionView};
use quantum_safe_core::constants::{APP_NAME, APP_VERSION};
use quantum_safe_core::logic::clock::MonotonicClock;
use quantum_safe_core::logic::config::PipelineConfig;

#[derive(Parser)]
#[command(author, version, about = "Behavioral risk scoring and transaction verification demo", long_about = None)]
struct Cli {
    /// Sender address
    #[arg(long, default_value = "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh")]
    sender: String,

    /// Receiver address
    #[arg(long, default_value = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq")]
    receiver: String,

    /// Amount (BTC), passed through as text
    #[arg(long, default_value = "0.00125")]
    amount: String,

    /// Interaction profile to simulate
    #[arg(long, value_enum, default_value_t = InteractionProfile::Human)]
    profile: InteractionProfile,

    /// Print views as JSON lines
    #[arg(long)]
    json: bool,
}

fn print_view(view: &TransactionView, json: bool) {
    if json {
        match serde_json::to_string(view) {
            Ok(line) => println!("{}", line),
            Err(e) => log::error!("View serialization failed: {}", e),
        }
    } else {
        println!("{}\n", view);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let config = PipelineConfig::from_env();
    config.validate()?;
    log::info!(
        "Pipeline: tick {}ms, check delay {}ms, block < {}, approve >= {}",
        config.tick_interval_ms, config.verification_delay_ms, config.block_below, config.approve_at
    );

    let form = Arc::new(TransactionForm::mount_with_clock(config, Arc::new(MonotonicClock::new())));

    // Render in-flight transitions as they are published, terminal state is printed below
    let mut updates = form.subscribe();
    let printer = {
        let form = Arc::clone(&form);
        let json = cli.json;
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let terminal = updates
                    .borrow_and_update()
                    .step
                    .map(|step| step.is_terminal())
                    .unwrap_or(false);
                if !terminal {
                    print_view(&form.view(), json);
                }
            }
        })
    };

    let fields = TransactionFields {
        sender: cli.sender,
        receiver: cli.receiver,
        amount: cli.amount,
    };
    demo::drive(&form, cli.profile, &fields).await?;

    let report = form.submit(&fields.sender, &fields.receiver, &fields.amount).await?;
    log::info!(
        "Run {} finished: score {} -> {}",
        report.run_id, report.score, report.outcome.as_str()
    );

    printer.abort();
    print_view(&form.view(), cli.json);
    form.unmount().await;

    Ok(())
}
