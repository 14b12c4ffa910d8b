// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! pipeweave - CI pipeline generator
//!
//! Compile authored pipeline trees into GitHub Actions and Azure Pipelines YAML.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipeweave::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipeweave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    match cli.command {
        Commands::Generate { target, dry_run } => {
            pipeweave::cli::generate::run(target, dry_run, cli.verbose).await
        }
        Commands::Watch { target, debounce } => {
            pipeweave::cli::watch::run(target, debounce, cli.verbose).await
        }
        Commands::Platforms { format } => pipeweave::cli::platforms::run(format, cli.verbose).await,
    }
}
