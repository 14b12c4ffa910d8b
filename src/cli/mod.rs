// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for pipeweave.

pub mod generate;
pub mod platforms;
pub mod watch;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CI pipeline generator
///
/// Compile authored pipeline trees into GitHub Actions and Azure Pipelines YAML.
#[derive(Parser, Debug)]
#[clap(
    name = "pipeweave",
    version,
    about = "Compile pipeline trees into CI platform YAML",
    long_about = None,
    after_help = "Examples:\n\
        pipeweave generate ci.yaml              Write ci.generated.yml beside the input\n\
        pipeweave generate 'pipelines/*.yaml'   Generate every matching tree\n\
        pipeweave watch ci.yaml                 Regenerate on file changes\n\
        pipeweave platforms                     List supported platforms\n\n\
        See 'pipeweave <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate CI documents from tree files
    Generate {
        #[clap(flatten)]
        target: TargetArgs,

        /// Print generated documents instead of writing them
        #[clap(long)]
        dry_run: bool,
    },

    /// Watch mode - regenerate on file changes
    Watch {
        #[clap(flatten)]
        target: TargetArgs,

        /// Debounce delay in milliseconds
        #[clap(long, default_value = "500")]
        debounce: u64,
    },

    /// List supported platforms
    Platforms {
        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Inputs and output settings shared by `generate` and `watch`
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Tree files or glob patterns
    #[clap(required = true, value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// Write generated files to this directory instead of beside each input
    #[clap(short, long, env = "PIPEWEAVE_OUT_DIR", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Maximum group/macro nesting during expansion
    #[clap(long, env = "PIPEWEAVE_MAX_DEPTH", value_name = "N")]
    pub max_depth: Option<usize>,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
