// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Input discovery and output paths

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::CONFIG_FILE;
use crate::errors::{PipeweaveError, PipeweaveResult};

/// Marker in the file name of every generated document
pub const GENERATED_MARKER: &str = ".generated.";

/// Whether a path names a generated document
pub fn is_generated(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(GENERATED_MARKER))
        .unwrap_or(false)
}

/// Whether a path names the project settings file
pub fn is_config_file(path: &Path) -> bool {
    path.file_name().map(|name| name == CONFIG_FILE).unwrap_or(false)
}

/// Resolve input paths and glob patterns relative to a base directory
///
/// Results are sorted and deduplicated. Generated documents and the
/// settings file are skipped, and wildcards never match a leading dot.
/// A pattern that matches nothing is an error.
pub fn resolve_inputs<S: AsRef<str>>(
    patterns: &[S],
    base_dir: &Path,
) -> PipeweaveResult<Vec<PathBuf>> {
    let match_options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };
    let mut files = BTreeSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            base_dir.join(pattern).to_string_lossy().to_string()
        };

        let matches: Vec<_> = glob::glob_with(&full_pattern, match_options)?
            .filter_map(Result::ok)
            .filter(|path| path.is_file() && !is_generated(path) && !is_config_file(path))
            .collect();

        if matches.is_empty() {
            return Err(PipeweaveError::NoInputFiles {
                pattern: pattern.to_string(),
            });
        }

        debug!(pattern, count = matches.len(), "resolved inputs");
        files.extend(matches);
    }

    Ok(files.into_iter().collect())
}

/// Where the document generated from `input` is written
///
/// `ci.yaml` becomes `ci.generated.<ext>`, beside the input or under
/// `out_dir` when one is given.
pub fn output_path(input: &Path, extension: &str, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}.generated.{}", stem, extension);

    match out_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// Write a generated document, creating parent directories as needed
pub async fn write_output(path: &Path, content: &str) -> PipeweaveResult<()> {
    let write_error = |e: std::io::Error| PipeweaveError::FileWriteError {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    tokio::fs::write(path, content).await.map_err(write_error)
}

/// Read an input file
pub async fn read_input(path: &Path) -> PipeweaveResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PipeweaveError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}
