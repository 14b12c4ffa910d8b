// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Platforms command - list registered platform compilers

use colored::Colorize;
use miette::Result;

use super::OutputFormat;
use crate::errors::PipeweaveResult;
use crate::platform::{PlatformInfo, RendererRegistry};

/// Run the platforms command
pub async fn run(format: OutputFormat, verbose: bool) -> Result<()> {
    let registry = RendererRegistry::with_default_platforms();
    let platforms = registry.info();

    match format {
        OutputFormat::Text => print_text(&platforms, verbose),
        OutputFormat::Json => println!("{}", to_json(&platforms)?),
    }

    Ok(())
}

fn print_text(platforms: &[PlatformInfo], verbose: bool) {
    println!("{}", "Supported platforms".bold());
    println!("{}", "═".repeat(40));

    for platform in platforms {
        println!(
            "  {:<8} root {:<18} → *.generated.{}",
            platform.id.cyan(),
            platform.root_kind,
            platform.extension
        );
        if verbose {
            println!("           {}", platform.description.dimmed());
        }
    }
}

fn to_json(platforms: &[PlatformInfo]) -> PipeweaveResult<String> {
    Ok(serde_json::to_string_pretty(platforms)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_listing() {
        let json = to_json(&RendererRegistry::with_default_platforms().info()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["id"], "github");
        assert_eq!(parsed[0]["root_kind"], "github.workflow");
        assert_eq!(parsed[1]["extension"], "yaml");
    }

    #[tokio::test]
    async fn test_run_text() {
        assert!(run(OutputFormat::Text, true).await.is_ok());
    }
}
