// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeweave contributors

//! Error types
//!
//! Compilation is all-or-nothing: every failure surfaces as a
//! [`PipeweaveError`] naming the offending entity and the violated rule.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeweave operations
pub type PipeweaveResult<T> = Result<T, PipeweaveError>;

/// Error raised by a user-defined expansion rule
pub type RuleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for pipeweave
#[derive(Error, Debug, Diagnostic)]
pub enum PipeweaveError {
    // ─────────────────────────────────────────────────────────────────────────
    // Compilation Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("{entity}: {message}")]
    #[diagnostic(code(pipeweave::validation))]
    Validation { entity: String, message: String },

    #[error("Expansion rule '{rule}' failed: {source}")]
    #[diagnostic(
        code(pipeweave::expansion_failed),
        help("The error was raised by the rule itself; check the properties passed to '{rule}'")
    )]
    ExpansionFailed {
        rule: String,
        #[source]
        source: RuleError,
    },

    #[error("Expansion exceeded the depth limit of {limit} while expanding '{rule}'")]
    #[diagnostic(
        code(pipeweave::expansion_depth),
        help("A macro probably expands into itself. Raise --max-depth only for deliberate nesting")
    )]
    ExpansionDepthExceeded { limit: usize, rule: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("No renderer recognizes root kind '{kind}' in {path}")]
    #[diagnostic(
        code(pipeweave::no_renderer),
        help("Run 'pipeweave platforms' to list the supported root kinds")
    )]
    NoRenderer { path: PathBuf, kind: String },

    #[error("{path} produced no output")]
    #[diagnostic(
        code(pipeweave::no_output),
        help("The root has no children, or none of them is a job, stage or step")
    )]
    NoOutput { path: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // Authoring File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Invalid tree: {reason}")]
    #[diagnostic(code(pipeweave::invalid_tree))]
    InvalidTree {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unknown macro '{name}'")]
    #[diagnostic(
        code(pipeweave::unknown_macro),
        help("Declare '{name}' under the top-level 'macros' key")
    )]
    UnknownMacro { name: String },

    #[error("Invalid configuration in {path}: {reason}")]
    #[diagnostic(code(pipeweave::invalid_config))]
    InvalidConfig { path: PathBuf, reason: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(pipeweave::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(pipeweave::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("No input files matched pattern: {pattern}")]
    #[diagnostic(
        code(pipeweave::no_input_files),
        help("Check that files matching '{pattern}' exist relative to the working directory")
    )]
    NoInputFiles { pattern: String },

    #[error("{failed} of {total} input(s) failed to generate")]
    #[diagnostic(code(pipeweave::batch_failed))]
    BatchFailed { failed: usize, total: usize },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(pipeweave::io_error))]
    Io { message: String },

    #[error("YAML error: {message}")]
    #[diagnostic(code(pipeweave::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(pipeweave::json_error))]
    Json { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(pipeweave::glob_error))]
    GlobPattern { message: String },

    #[error("Watch error: {message}")]
    #[diagnostic(code(pipeweave::watch_error))]
    Watch { message: String },
}

impl From<std::io::Error> for PipeweaveError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for PipeweaveError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for PipeweaveError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<glob::PatternError> for PipeweaveError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern { message: e.to_string() }
    }
}

impl From<notify::Error> for PipeweaveError {
    fn from(e: notify::Error) -> Self {
        Self::Watch { message: e.to_string() }
    }
}

impl PipeweaveError {
    /// Create a validation error for an entity
    pub fn validation(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-tree error without extra help
    pub fn invalid_tree(reason: impl Into<String>) -> Self {
        Self::InvalidTree {
            reason: reason.into(),
            help: None,
        }
    }
}
