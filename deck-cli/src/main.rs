//! # Deck
//!
//! Command-line entry point.

use clap::Parser;
use deck_cli::{inspect, inspect_json, load_presentation, play_through, run_export, CliArgs, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,deck_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // RUST_LOG_FORMAT=json for machine-readable logs
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    match args.command {
        Command::Export(export) => {
            let summary = run_export(&export).await?;
            for file in &summary.files {
                println!("{}", file.display());
            }
            for warning in &summary.report.warnings {
                tracing::warn!(
                    slide = warning.slide_index + 1,
                    element_id = %warning.element_id,
                    "Skipped: {}",
                    warning.reason
                );
            }
            println!("{}", summary.report.summary());
        }
        Command::Inspect { input, json } => {
            let presentation = load_presentation(&input).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&inspect_json(&presentation))?);
            } else {
                print!("{}", inspect(&presentation));
            }
        }
        Command::Play { input, max_steps } => {
            let presentation = load_presentation(&input).await?;
            for line in play_through(presentation, max_steps) {
                println!("{line}");
            }
        }
    }
    Ok(())
}
