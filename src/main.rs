// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mlpipe contributors

//! mlpipe - fail-fast ML pipeline orchestrator
//!
//! Exits 0 when every step succeeded and 1 otherwise.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mlpipe::cli::{run::RunArgs, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for progress markers
    let default_filter = if cli.verbose { "mlpipe=debug" } else { "mlpipe=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Run {
            pipeline,
            from,
            step,
            dry_run,
            report,
        } => {
            let args = RunArgs {
                pipeline,
                from,
                steps: step,
                dry_run,
                report,
                python: cli.python,
            };
            mlpipe::cli::run::run(args, cli.verbose).await
        }
        Commands::Validate { pipeline } => {
            mlpipe::cli::validate::run(pipeline, &cli.python, cli.verbose).await
        }
        Commands::List { pipeline } => {
            mlpipe::cli::list::run(pipeline, &cli.python, cli.verbose).await
        }
        Commands::Init { output, force } => {
            mlpipe::cli::init::run(output, force, &cli.python).await
        }
    }
}
