// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Watch command - regenerate on file changes

use colored::Colorize;
use miette::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use super::generate::{generate_all, GenerateOptions};
use super::TargetArgs;
use crate::files;
use crate::platform::RendererRegistry;

/// Run the watch command
pub async fn run(target: TargetArgs, debounce_ms: u64, verbose: bool) -> Result<()> {
    let working_dir = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;
    let options = GenerateOptions::resolve(&target, &working_dir, false)?;
    let registry = RendererRegistry::with_default_platforms();

    println!("{}", "Starting watch mode...".bold());
    println!("Watching for changes (debounce: {}ms)", debounce_ms);
    println!("Press {} to exit.", "Ctrl+C".cyan());
    println!();

    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(debounce_ms), tx)
        .map_err(|e| miette::miette!("Failed to create file watcher: {}", e))?;

    debouncer
        .watcher()
        .watch(Path::new("."), RecursiveMode::Recursive)
        .map_err(|e| miette::miette!("Failed to start watching: {}", e))?;

    regenerate(&target, &working_dir, &registry, &options, verbose).await;

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path, &e.kind))
                    .collect();

                if !relevant.is_empty() {
                    println!();
                    println!("{}", "─".repeat(50).dimmed());
                    println!(
                        "{}: {} file(s) changed",
                        "Change detected".yellow(),
                        relevant.len()
                    );

                    if verbose {
                        for event in &relevant {
                            println!("  {}", event.path.display());
                        }
                    }

                    println!();
                    regenerate(&target, &working_dir, &registry, &options, verbose).await;
                }
            }
            Ok(Err(e)) => {
                eprintln!("{}: {:?}", "Watch error".red(), e);
            }
            Err(e) => {
                // Channel closed
                eprintln!("{}: {}", "Channel error".red(), e);
                break;
            }
        }
    }

    Ok(())
}

/// Our own outputs must not retrigger generation
fn is_relevant(path: &Path, kind: &DebouncedEventKind) -> bool {
    matches!(kind, DebouncedEventKind::Any) && !files::is_generated(path)
}

async fn regenerate(
    target: &TargetArgs,
    working_dir: &Path,
    registry: &RendererRegistry,
    options: &GenerateOptions,
    verbose: bool,
) {
    let start = std::time::Instant::now();

    // Re-resolve so files created while watching are picked up
    let inputs = match files::resolve_inputs(&target.inputs, working_dir) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("{}: {}", "Failed to resolve inputs".red(), e);
            return;
        }
    };

    match generate_all(&inputs, registry, options, verbose).await {
        Ok(count) => println!(
            "{} ({} file(s), {:.2}s)",
            "Generation completed".green(),
            count,
            start.elapsed().as_secs_f64()
        ),
        Err(e) => eprintln!("{}: {}", "Generation failed".red(), e),
    }
}
