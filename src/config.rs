// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Project configuration
//!
//! An optional `.pipeweave.yaml` in the working directory. Command-line
//! flags (and their environment variables) take precedence over it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::CompileOptions;
use crate::errors::{PipeweaveError, PipeweaveResult};

/// Default configuration file name
pub const CONFIG_FILE: &str = ".pipeweave.yaml";

/// Settings read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory generated files are written to (defaults to beside each input)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    /// Expansion depth limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl Settings {
    /// Load `.pipeweave.yaml` from a directory, or defaults if it is absent
    pub fn discover(dir: &Path) -> PipeweaveResult<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load settings from a file
    pub fn from_file(path: &Path) -> PipeweaveResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PipeweaveError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| PipeweaveError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Overlay command-line values on top of the file's
    pub fn merge(self, out_dir: Option<PathBuf>, max_depth: Option<usize>) -> Self {
        Self {
            out_dir: out_dir.or(self.out_dir),
            max_depth: max_depth.or(self.max_depth),
        }
    }

    /// Compile options derived from these settings
    pub fn compile_options(&self) -> CompileOptions {
        match self.max_depth {
            Some(depth) => CompileOptions::default().with_max_depth(depth),
            None => CompileOptions::default(),
        }
    }
}
