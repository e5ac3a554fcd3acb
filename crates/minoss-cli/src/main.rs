#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use std::process;

use anyhow::Context;
use minoss::MinossClient;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "minoss_cli::startup";
pub const TRACING_TARGET_COMMAND: &str = "minoss_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();

    let Cli { storage, command } = cli;
    let name = command.name();

    let client = MinossClient::connect(storage)
        .await
        .context("failed to connect to storage")?;

    let start = std::time::Instant::now();
    let output = command
        .execute(&client)
        .await
        .with_context(|| format!("{name} failed"))?;

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        command = name,
        elapsed = ?start.elapsed(),
        "command finished"
    );

    if let Some(output) = output {
        let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
        println!("{rendered}");
    }

    Ok(())
}
