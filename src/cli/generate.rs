// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Generate command - compile tree files into CI documents

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::TargetArgs;
use crate::config::Settings;
use crate::engine::CompileOptions;
use crate::errors::{PipeweaveError, PipeweaveResult, RecoverySuggestion};
use crate::files;
use crate::loader;
use crate::platform::{RenderOutcome, RendererRegistry};
use crate::utils;

/// Settings for one generate run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Directory outputs go to, or beside each input when unset
    pub out_dir: Option<PathBuf>,
    /// Compiler options
    pub compile: CompileOptions,
    /// Print documents instead of writing them
    pub dry_run: bool,
}

impl GenerateOptions {
    /// Combine command-line arguments with `.pipeweave.yaml` from `dir`
    pub fn resolve(target: &TargetArgs, dir: &Path, dry_run: bool) -> PipeweaveResult<Self> {
        let settings = Settings::discover(dir)?.merge(target.out_dir.clone(), target.max_depth);
        debug!(?settings, "resolved settings");

        Ok(Self {
            compile: settings.compile_options(),
            out_dir: settings.out_dir,
            dry_run,
        })
    }
}

/// A document produced from one input
#[derive(Debug, Clone)]
pub struct Generated {
    pub input: PathBuf,
    pub output: PathBuf,
    pub platform: &'static str,
    pub text: String,
}

/// Run the generate command
pub async fn run(target: TargetArgs, dry_run: bool, verbose: bool) -> Result<()> {
    let working_dir = std::env::current_dir()
        .map_err(|e| miette::miette!("Failed to get current directory: {}", e))?;

    let options = GenerateOptions::resolve(&target, &working_dir, dry_run)?;
    let inputs = files::resolve_inputs(&target.inputs, &working_dir).map_err(report)?;
    let registry = RendererRegistry::with_default_platforms();

    generate_all(&inputs, &registry, &options, verbose).await?;
    Ok(())
}

/// Generate every input, reporting each result as it happens
///
/// All inputs are attempted. Returns the number of documents generated, or
/// [`PipeweaveError::BatchFailed`] if any input failed.
pub async fn generate_all(
    inputs: &[PathBuf],
    registry: &RendererRegistry,
    options: &GenerateOptions,
    verbose: bool,
) -> PipeweaveResult<usize> {
    let mut failed = 0;

    for input in inputs {
        match generate_file(input, registry, options).await {
            Ok(generated) if options.dry_run => {
                println!("{} {}", "#".dimmed(), generated.output.display().to_string().dimmed());
                print!("{}", generated.text);
            }
            Ok(generated) => {
                utils::print_success(&format!(
                    "{} → {} ({})",
                    generated.input.display(),
                    generated.output.display(),
                    generated.platform
                ));
            }
            Err(e) => {
                failed += 1;
                utils::print_error(&format!("{}: {}", input.display(), e));
                if verbose {
                    if let Some(suggestion) = RecoverySuggestion::for_error(&e) {
                        eprintln!("{}", suggestion.to_string().dimmed());
                    }
                }
            }
        }
    }

    if failed > 0 {
        return Err(PipeweaveError::BatchFailed {
            failed,
            total: inputs.len(),
        });
    }

    Ok(inputs.len())
}

/// Load, compile and (unless dry-running) write one input
pub async fn generate_file(
    input: &Path,
    registry: &RendererRegistry,
    options: &GenerateOptions,
) -> PipeweaveResult<Generated> {
    let root = loader::load_file(input).await?;

    let (platform, extension, text) = match registry.render(&root, &options.compile)? {
        RenderOutcome::Rendered {
            platform,
            extension,
            text,
        } => (platform, extension, text),
        RenderOutcome::Empty => {
            return Err(PipeweaveError::NoOutput {
                path: input.to_path_buf(),
            })
        }
        RenderOutcome::NoRenderer { kind } => {
            return Err(PipeweaveError::NoRenderer {
                path: input.to_path_buf(),
                kind,
            })
        }
    };

    let output = files::output_path(input, extension, options.out_dir.as_deref());
    if !options.dry_run {
        files::write_output(&output, &text).await?;
        info!(input = %input.display(), output = %output.display(), platform, "generated");
    }

    Ok(Generated {
        input: input.to_path_buf(),
        output,
        platform,
        text,
    })
}

/// Print a recovery hint before handing the error to miette
fn report(error: PipeweaveError) -> PipeweaveError {
    if let Some(suggestion) = RecoverySuggestion::for_error(&error) {
        eprintln!("{}", suggestion);
    }
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WORKFLOW: &str = "\
root:
  github.workflow:
    name: CI
    children:
      - github.job:
          id: test
          runsOn: ubuntu-latest
          children:
            - github.step: { run: cargo test }
";

    const PIPELINE: &str = "\
root:
  azure.pipeline:
    trigger: none
    children:
      - azure.step: { script: make, timeoutMinutes: 5 }
";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_generate_writes_beside_input() {
        let dir = TempDir::new().unwrap();
        let input = write(dir.path(), "ci.yaml", WORKFLOW);
        let registry = RendererRegistry::with_default_platforms();

        let generated = generate_file(&input, &registry, &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(generated.output, dir.path().join("ci.generated.yml"));
        let written = std::fs::read_to_string(&generated.output).unwrap();
        assert!(written.contains("runs-on: ubuntu-latest"));
    }

    #[tokio::test]
    async fn test_generate_to_out_dir() {
        let dir = TempDir::new().unwrap();
        let input = write(dir.path(), "pipeline.yaml", PIPELINE);
        let options = GenerateOptions {
            out_dir: Some(dir.path().join("out")),
            ..Default::default()
        };

        let registry = RendererRegistry::with_default_platforms();
        let generated = generate_file(&input, &registry, &options).await.unwrap();

        assert_eq!(generated.platform, "azure");
        assert_eq!(generated.output, dir.path().join("out/pipeline.generated.yaml"));
        assert!(std::fs::read_to_string(&generated.output)
            .unwrap()
            .contains("timeoutInMinutes: 5"));
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write(dir.path(), "ci.yaml", WORKFLOW);
        let options = GenerateOptions {
            dry_run: true,
            ..Default::default()
        };

        let registry = RendererRegistry::with_default_platforms();
        let generated = generate_file(&input, &registry, &options).await.unwrap();

        assert!(generated.text.contains("jobs:"));
        assert!(!generated.output.exists());
    }

    #[tokio::test]
    async fn test_empty_root_is_no_output() {
        let dir = TempDir::new().unwrap();
        let input = write(dir.path(), "empty.yaml", "root:\n  azure.pipeline: { trigger: none }\n");
        let registry = RendererRegistry::with_default_platforms();

        let err = generate_file(&input, &registry, &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipeweaveError::NoOutput { .. }));
    }

    #[tokio::test]
    async fn test_non_root_is_no_renderer() {
        let dir = TempDir::new().unwrap();
        let input = write(dir.path(), "job.yaml", "root:\n  github.job: { id: x }\n");
        let registry = RendererRegistry::with_default_platforms();

        let err = generate_file(&input, &registry, &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PipeweaveError::NoRenderer { ref kind, .. } if kind == "github.job"));
    }

    #[tokio::test]
    async fn test_batch_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        let inputs = vec![
            write(dir.path(), "a.yaml", "root:\n  github.job: {}\n"),
            write(dir.path(), "b.yaml", WORKFLOW),
            write(dir.path(), "c.yaml", "root: [not, a, node]\n"),
        ];

        let err = generate_all(
            &inputs,
            &RendererRegistry::with_default_platforms(),
            &GenerateOptions::default(),
            false,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PipeweaveError::BatchFailed { failed: 2, total: 3 }));
        assert!(dir.path().join("b.generated.yml").exists());
    }

    #[test]
    fn test_resolve_prefers_cli_over_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".pipeweave.yaml", "out_dir: from-file\nmax_depth: 7\n");
        let target = TargetArgs {
            inputs: vec!["*.yaml".into()],
            out_dir: Some("from-cli".into()),
            max_depth: None,
        };

        let options = GenerateOptions::resolve(&target, dir.path(), false).unwrap();
        assert_eq!(options.out_dir, Some(PathBuf::from("from-cli")));
        assert_eq!(options.compile.max_depth, 7);
    }
}
